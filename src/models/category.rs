use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Token category shown as one of the switch buttons above the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Top10,
    #[serde(alias = "difi")]
    Defi,
    Meme,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Top10, Category::Defi, Category::Meme];

    pub fn key(self) -> &'static str {
        match self {
            Category::Top10 => "top10",
            Category::Defi => "defi",
            Category::Meme => "meme",
        }
    }

    /// Button caption.
    pub fn label(self) -> &'static str {
        match self {
            Category::Top10 => "Top 10",
            Category::Defi => "DEFI",
            Category::Meme => "MEME",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Category::Top10 => 0,
            Category::Defi => 1,
            Category::Meme => 2,
        }
    }

    pub fn next(self) -> Category {
        Category::ALL[(self.index() + 1) % Category::ALL.len()]
    }

    pub fn previous(self) -> Category {
        Category::ALL[(self.index() + Category::ALL.len() - 1) % Category::ALL.len()]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
