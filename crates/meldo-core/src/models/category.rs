use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// The fixed set of complaint categories citizens can pick from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Category {
    Pothole,
    Litter,
    StreetLighting,
    Vandalism,
    GreenSpace,
    Traffic,
    Water,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Pothole,
        Category::Litter,
        Category::StreetLighting,
        Category::Vandalism,
        Category::GreenSpace,
        Category::Traffic,
        Category::Water,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pothole => "pothole",
            Category::Litter => "litter",
            Category::StreetLighting => "street_lighting",
            Category::Vandalism => "vandalism",
            Category::GreenSpace => "green_space",
            Category::Traffic => "traffic",
            Category::Water => "water",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| CoreError::InvalidCategory(s.to_string()))
    }
}
