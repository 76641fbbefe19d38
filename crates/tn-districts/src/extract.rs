//! District extraction from Census geography payloads.
//!
//! The geographies endpoint returns a JSON object keyed by layer name, each
//! value a list of feature objects. Layer names and field names have drifted
//! across vintages, so lookup is expressed as ordered lists: known layer keys
//! first, then a fuzzy key match; structured fields first, then a pattern
//! match against the feature's display name.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{district_from_label, normalize_district, Chamber};

/// Senate and house district identifiers for a point.
///
/// Both values, when present, are normalized digit strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub house: Option<String>,
}

impl DistrictInfo {
    /// District for the given chamber, if resolved.
    #[must_use]
    pub fn get(&self, chamber: Chamber) -> Option<&str> {
        match chamber {
            Chamber::Senate => self.senate.as_deref(),
            Chamber::House => self.house.as_deref(),
        }
    }

    /// True when neither chamber resolved.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.senate.is_none() && self.house.is_none()
    }
}

/// One way of reading a district number out of a feature object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStrategy {
    /// Read a structured field holding the number (string or integer).
    Field(&'static str),
    /// Match `District N` inside a free-text field.
    NamePattern(&'static str),
}

impl ExtractionStrategy {
    /// Apply this strategy to a single feature.
    #[must_use]
    pub fn apply(self, feature: &Value) -> Option<String> {
        match self {
            Self::Field(key) => match feature.get(key)? {
                Value::String(s) => normalize_district(s),
                Value::Number(n) => normalize_district(&n.to_string()),
                _ => None,
            },
            Self::NamePattern(key) => feature.get(key)?.as_str().and_then(district_from_label),
        }
    }
}

const SENATE_STRATEGIES: &[ExtractionStrategy] = &[
    ExtractionStrategy::Field("SLDUST"),
    ExtractionStrategy::Field("SLDU"),
    ExtractionStrategy::Field("BASENAME"),
    ExtractionStrategy::Field("DISTRICT"),
    ExtractionStrategy::NamePattern("NAME"),
];

const HOUSE_STRATEGIES: &[ExtractionStrategy] = &[
    ExtractionStrategy::Field("SLDLST"),
    ExtractionStrategy::Field("SLDL"),
    ExtractionStrategy::Field("BASENAME"),
    ExtractionStrategy::Field("DISTRICT"),
    ExtractionStrategy::NamePattern("NAME"),
];

const SENATE_LAYERS: &[&str] = &[
    "2024 State Legislative Districts - Upper",
    "2022 State Legislative Districts - Upper",
    "2020 State Legislative Districts - Upper",
    "State Legislative Districts - Upper",
    "Upper State Legislative Districts",
];

const HOUSE_LAYERS: &[&str] = &[
    "2024 State Legislative Districts - Lower",
    "2022 State Legislative Districts - Lower",
    "2020 State Legislative Districts - Lower",
    "State Legislative Districts - Lower",
    "Lower State Legislative Districts",
];

/// Extraction strategies for a chamber, in the order they are tried.
#[must_use]
pub const fn strategies(chamber: Chamber) -> &'static [ExtractionStrategy] {
    match chamber {
        Chamber::Senate => SENATE_STRATEGIES,
        Chamber::House => HOUSE_STRATEGIES,
    }
}

/// Known geography layer names for a chamber, newest vintage first.
#[must_use]
pub const fn layer_keys(chamber: Chamber) -> &'static [&'static str] {
    match chamber {
        Chamber::Senate => SENATE_LAYERS,
        Chamber::House => HOUSE_LAYERS,
    }
}

/// Find the feature list for a chamber's layer.
///
/// Tries each known key in order, then any key mentioning both
/// "Legislative" and "Upper" (senate) or "Lower" (house). Layers present
/// with no features are skipped.
#[must_use]
pub fn find_layer(geographies: &Map<String, Value>, chamber: Chamber) -> Option<&Vec<Value>> {
    let known = layer_keys(chamber)
        .iter()
        .find_map(|key| {
            geographies
                .get(*key)
                .and_then(Value::as_array)
                .filter(|features| !features.is_empty())
        });
    if known.is_some() {
        return known;
    }

    let side = match chamber {
        Chamber::Senate => "Upper",
        Chamber::House => "Lower",
    };
    geographies
        .iter()
        .filter(|(key, _)| key.contains("Legislative") && key.contains(side))
        .find_map(|(_, value)| value.as_array().filter(|features| !features.is_empty()))
}

fn extract_chamber(geographies: &Map<String, Value>, chamber: Chamber) -> Option<String> {
    let features = find_layer(geographies, chamber)?;
    features.iter().find_map(|feature| {
        strategies(chamber)
            .iter()
            .find_map(|strategy| strategy.apply(feature))
    })
}

/// Extract both chambers' districts from a `geographies` object.
#[must_use]
pub fn extract_districts(geographies: &Map<String, Value>) -> DistrictInfo {
    DistrictInfo {
        senate: extract_chamber(geographies, Chamber::Senate),
        house: extract_chamber(geographies, Chamber::House),
    }
}

/// Name of the county containing the point, for messaging when districts
/// cannot be determined.
#[must_use]
pub fn containing_county(geographies: &Map<String, Value>) -> Option<String> {
    geographies
        .get("Counties")?
        .as_array()?
        .first()?
        .get("NAME")?
        .as_str()
        .map(str::to_string)
}
