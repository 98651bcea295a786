use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::category::Category;
use crate::models::series::Series;

const BUILTIN_DATASET: &str = include_str!("../../data/price_targets.json");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{category}: {series} has {found} values but there are {expected} labels")]
    LengthMismatch {
        category: Category,
        series: Series,
        expected: usize,
        found: usize,
    },
    #[error("{category}: {series} price #{index} is not a valid USD price ({value})")]
    InvalidPrice {
        category: Category,
        series: Series,
        index: usize,
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesValues {
    pub bearish: Vec<f64>,
    pub neutral: Vec<f64>,
    pub bullish: Vec<f64>,
}

impl SeriesValues {
    pub fn get(&self, series: Series) -> &[f64] {
        match series {
            Series::Bearish => &self.bearish,
            Series::Neutral => &self.neutral,
            Series::Bullish => &self.bullish,
        }
    }
}

/// Token labels plus the three index-aligned price series for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryData {
    pub labels: Vec<String>,
    pub data: SeriesValues,
}

impl CategoryData {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn validate(&self, category: Category) -> Result<(), DatasetError> {
        let expected = self.labels.len();
        for series in Series::ALL {
            let values = self.data.get(series);
            if values.len() != expected {
                return Err(DatasetError::LengthMismatch {
                    category,
                    series,
                    expected,
                    found: values.len(),
                });
            }
            if let Some((index, &value)) = values
                .iter()
                .enumerate()
                .find(|(_, v)| !v.is_finite() || **v < 0.0)
            {
                return Err(DatasetError::InvalidPrice { category, series, index, value });
            }
        }
        Ok(())
    }
}

/// Pre-baked price targets for every category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub top10: CategoryData,
    #[serde(alias = "difi")]
    pub defi: CategoryData,
    pub meme: CategoryData,
}

impl Dataset {
    /// The dataset compiled into the binary.
    pub fn builtin() -> Result<Dataset, DatasetError> {
        Dataset::from_json(BUILTIN_DATASET)
    }

    pub fn load(path: &Path) -> Result<Dataset, DatasetError> {
        let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Dataset::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Dataset, DatasetError> {
        let dataset: Dataset = serde_json::from_str(raw)?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn category(&self, category: Category) -> &CategoryData {
        match category {
            Category::Top10 => &self.top10,
            Category::Defi => &self.defi,
            Category::Meme => &self.meme,
        }
    }

    pub fn validate(&self) -> Result<(), DatasetError> {
        Category::ALL
            .iter()
            .try_for_each(|&category| self.category(category).validate(category))
    }
}
