use itertools::Itertools;

/// Formats a number the way an en-US locale renders it: thousands separated
/// by commas, at most three fraction digits, trailing zeros dropped.
pub fn format_thousands(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞".to_string() } else { "-∞".to_string() };
    }

    let rounded = format!("{:.3}", value.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let digits: Vec<char> = int_part.chars().collect();
    let grouped = digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect::<String>())
        .join(",");

    let sign = if value < 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

/// Formats an axis tick into a short dollar label with a unit suffix (K/M/B)
/// - For values >= 1: one decimal place at most, ".0" dropped
/// - For values < 1: as many decimals as the magnitude needs
pub fn format_tick(value: f64) -> String {
    match value {
        v if v >= 1_000_000_000.0 => format!("${}B", trim_decimal(v / 1_000_000_000.0)),
        v if v >= 1_000_000.0 => format!("${}M", trim_decimal(v / 1_000_000.0)),
        v if v >= 1_000.0 => format!("${}K", trim_decimal(v / 1_000.0)),
        v if v >= 1.0 => format!("${}", trim_decimal(v)),
        v if v > 0.0 => {
            let decimals = (-v.log10() - 1e-9).ceil().max(1.0) as usize;
            format!("${:.*}", decimals, v)
        }
        _ => "$0".to_string(),
    }
}

fn trim_decimal(value: f64) -> String {
    let text = format!("{:.1}", value);
    text.strip_suffix(".0").map(str::to_string).unwrap_or(text)
}
