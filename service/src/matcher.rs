//! Matching resolved districts against the legislator directory.
//!
//! Strategies, tried per chamber until one yields a record:
//!
//! 1. **District** - first record whose `district` equals the resolved one.
//! 2. **Address text** - first record whose number appears in the formatted
//!    address as `"district N"` or `"districtN"` (case-insensitive).
//! 3. **Random** - any record of the chamber. Only when
//!    `demo_random_fallback` is enabled; the pick is not tied to the address.
//!
//! Strategies 1 and 2 are deterministic for a given directory and input.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tn_districts::{Chamber, DistrictInfo};

use crate::directory::LegislatorRecord;

/// The senator and representative for an address.
///
/// Unmatched chambers serialize as `null`. Both `null` means no legislator
/// could be determined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub senator: Option<LegislatorRecord>,
    pub representative: Option<LegislatorRecord>,
}

impl MatchResult {
    /// True when neither chamber matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.senator.is_none() && self.representative.is_none()
    }
}

/// Exact match on normalized district number.
#[must_use]
pub fn match_by_district<'a>(
    directory: &'a [LegislatorRecord],
    chamber: Chamber,
    district: &str,
) -> Option<&'a LegislatorRecord> {
    directory
        .iter()
        .find(|record| record.chamber == chamber && record.district == district)
}

/// First record whose district number appears in the address text.
///
/// `address_lower` must already be lower-cased.
#[must_use]
pub fn match_by_address_text<'a>(
    directory: &'a [LegislatorRecord],
    chamber: Chamber,
    address_lower: &str,
) -> Option<&'a LegislatorRecord> {
    directory
        .iter()
        .filter(|r| r.chamber == chamber)
        .find(|record| {
            address_lower.contains(&format!("district {}", record.district))
                || address_lower.contains(&format!("district{}", record.district))
        })
}

/// Matching policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegislatorMatcher {
    demo_random_fallback: bool,
}

impl LegislatorMatcher {
    #[must_use]
    pub const fn new(demo_random_fallback: bool) -> Self {
        Self {
            demo_random_fallback,
        }
    }

    /// Match using the thread-local RNG for the demo fallback.
    #[must_use]
    pub fn match_legislators(
        &self,
        directory: &[LegislatorRecord],
        formatted_address: &str,
        districts: Option<&DistrictInfo>,
    ) -> MatchResult {
        self.match_legislators_with(
            directory,
            formatted_address,
            districts,
            &mut rand::thread_rng(),
        )
    }

    /// Match using `rng` for the demo fallback.
    pub fn match_legislators_with<R: Rng + ?Sized>(
        &self,
        directory: &[LegislatorRecord],
        formatted_address: &str,
        districts: Option<&DistrictInfo>,
        rng: &mut R,
    ) -> MatchResult {
        let address_lower = formatted_address.to_lowercase();
        let mut pick = |chamber: Chamber| {
            self.match_chamber(directory, chamber, &address_lower, districts, &mut *rng)
                .cloned()
        };

        let result = MatchResult {
            senator: pick(Chamber::Senate),
            representative: pick(Chamber::House),
        };

        if result.is_empty() {
            tracing::info!(?districts, "no legislators matched");
        }
        result
    }

    fn match_chamber<'a, R: Rng + ?Sized>(
        &self,
        directory: &'a [LegislatorRecord],
        chamber: Chamber,
        address_lower: &str,
        districts: Option<&DistrictInfo>,
        rng: &mut R,
    ) -> Option<&'a LegislatorRecord> {
        if let Some(district) = districts.and_then(|d| d.get(chamber)) {
            if let Some(record) = match_by_district(directory, chamber, district) {
                return Some(record);
            }
            tracing::debug!(%chamber, district, "no directory record for resolved district");
        }

        if let Some(record) = match_by_address_text(directory, chamber, address_lower) {
            tracing::debug!(
                %chamber,
                district = %record.district,
                "matched district from address text"
            );
            return Some(record);
        }

        if self.demo_random_fallback {
            let candidates: Vec<&LegislatorRecord> = directory
                .iter()
                .filter(|r| r.chamber == chamber)
                .collect();
            let picked = candidates.choose(rng).copied();
            if let Some(record) = picked {
                tracing::warn!(
                    %chamber,
                    id = %record.id,
                    "demo fallback picked a random legislator"
                );
            }
            return picked;
        }

        None
    }
}
