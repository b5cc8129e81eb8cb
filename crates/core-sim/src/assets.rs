use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AssetProfile {
    pub mean_return: f64,
    pub volatility: f64,
}

impl AssetProfile {
    pub const fn new(mean_return: f64, volatility: f64) -> Self {
        Self {
            mean_return,
            volatility,
        }
    }
}

/// Read-only mapping from asset identifier to its monthly return profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetCatalog {
    profiles: BTreeMap<String, AssetProfile>,
}

const STANDARD_PROFILES: [(&str, AssetProfile); 5] = [
    ("US Stocks (S&P 500 Index)", AssetProfile::new(0.01, 0.05)),
    (
        "International Stocks (MSCI World Index)",
        AssetProfile::new(0.015, 0.06),
    ),
    ("Bonds (US Treasury Bonds)", AssetProfile::new(0.005, 0.02)),
    ("Real Estate (REITs)", AssetProfile::new(0.02, 0.08)),
    ("Cash (US Treasury Bills)", AssetProfile::new(0.002, 0.001)),
];

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn standard() -> Self {
        STANDARD_PROFILES
            .iter()
            .map(|(id, profile)| ((*id).to_string(), *profile))
            .collect()
    }

    pub fn with_asset(mut self, id: impl Into<String>, profile: AssetProfile) -> Self {
        self.profiles.insert(id.into(), profile);
        self
    }

    pub fn get(&self, id: &str) -> Option<&AssetProfile> {
        self.profiles.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetProfile)> {
        self.profiles.iter().map(|(id, profile)| (id.as_str(), profile))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FromIterator<(String, AssetProfile)> for AssetCatalog {
    fn from_iter<T: IntoIterator<Item = (String, AssetProfile)>>(iter: T) -> Self {
        Self {
            profiles: iter.into_iter().collect(),
        }
    }
}
