//! Legislator records parsed from the directory pages.

use serde::{Deserialize, Serialize};
use tn_districts::Chamber;

/// Party affiliation as printed on a directory card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Party {
    Republican,
    Democrat,
    Unknown,
}

impl Party {
    /// Infer party from a card's district label ("Republican - District 6").
    #[must_use]
    pub fn from_label(text: &str) -> Self {
        if text.contains("Republican") {
            Self::Republican
        } else if text.contains("Democrat") {
            Self::Democrat
        } else {
            Self::Unknown
        }
    }
}

/// Ways to reach a legislator. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// A state senator or representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegislatorRecord {
    /// `"{chamber}-{card index}"`, unique within one directory fetch.
    pub id: String,
    pub chamber: Chamber,
    pub name: String,
    /// Normalized district number (digits only).
    pub district: String,
    pub party: Party,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub committees: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biography: Option<String>,
}
