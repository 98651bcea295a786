use std::fmt;

use serde::{Deserialize, Serialize};

/// Gradient stops for one series; `start` doubles as the border color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColors {
    pub start: &'static str,
    pub end: &'static str,
}

/// One of the three price scenarios plotted for every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Series {
    Bearish,
    Neutral,
    Bullish,
}

impl Series {
    /// Draw order, left to right within a token group.
    pub const ALL: [Series; 3] = [Series::Bearish, Series::Neutral, Series::Bullish];

    pub fn label(self) -> &'static str {
        match self {
            Series::Bearish => "Bearish",
            Series::Neutral => "Neutral",
            Series::Bullish => "Bullish",
        }
    }

    /// Months of the year the scenario is expected to play out in.
    pub fn window(self) -> &'static str {
        match self {
            Series::Bearish => "Jan–Mar",
            Series::Neutral => "Jun–Sep",
            Series::Bullish => "Oct–Dec",
        }
    }

    pub fn colors(self) -> SeriesColors {
        match self {
            Series::Bearish => SeriesColors { start: "#dc3545", end: "#ff6b6b" },
            Series::Neutral => SeriesColors { start: "#ffc107", end: "#ffda6a" },
            Series::Bullish => SeriesColors { start: "#28a745", end: "#34ce57" },
        }
    }

    pub fn index(self) -> usize {
        match self {
            Series::Bearish => 0,
            Series::Neutral => 1,
            Series::Bullish => 2,
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
