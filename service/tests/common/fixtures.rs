//! Upstream response bodies shaped like the real services.

use serde_json::{json, Value};

pub const CENSUS_GEOCODER_PATH: &str = "/geocoder/locations/onelineaddress";
pub const CENSUS_GEOGRAPHIES_PATH: &str = "/geocoder/geographies/coordinates";
pub const SENATE_PATH: &str = "/directory/senate";
pub const HOUSE_PATH: &str = "/directory/house";

/// A single onelineaddress match.
pub fn census_match(matched_address: &str, state: &str, lng: f64, lat: f64) -> Value {
    json!({
        "result": {
            "input": {"address": {"address": matched_address}},
            "addressMatches": [{
                "matchedAddress": matched_address,
                "coordinates": {"x": lng, "y": lat},
                "addressComponents": {
                    "city": "NASHVILLE",
                    "state": state,
                    "zip": "37203"
                }
            }]
        }
    })
}

/// Nashville, 123 Main St.
pub fn census_nashville() -> Value {
    census_match("123 MAIN ST, NASHVILLE, TN, 37203", "TN", -86.781_6, 36.162_6)
}

pub fn census_no_matches() -> Value {
    json!({"result": {"addressMatches": []}})
}

/// Geographies listing resolving senate 6 and house 19 (zero-padded, as served).
pub fn geographies_6_19() -> Value {
    json!({
        "result": {
            "geographies": {
                "Counties": [{"NAME": "Davidson County", "GEOID": "47037"}],
                "2024 State Legislative Districts - Upper": [
                    {"SLDU": "006", "BASENAME": "6", "NAME": "State Senate District 6"}
                ],
                "2024 State Legislative Districts - Lower": [
                    {"SLDL": "019", "BASENAME": "19", "NAME": "State House District 19"}
                ]
            }
        }
    })
}

/// Geographies listing with only a county layer.
pub fn geographies_county_only() -> Value {
    json!({
        "result": {
            "geographies": {
                "Counties": [{"NAME": "Davidson County"}]
            }
        }
    })
}

pub const SENATE_PAGE: &str = r#"
<html><body>
  <div class="senatorContainer">
    <img src="/images/members/s5.jpg">
    <strong class="senator-name">Randy McNally</strong>
    <p class="senatorDistrict">Republican - District 5</p>
  </div>
  <div class="senatorContainer">
    <img src="/images/members/s6.jpg">
    <strong class="senator-name">Becky Duncan Massey</strong>
    <p class="senatorDistrict">Republican - District 6</p>
    <a href="tel:6157411648">(615) 741-1648</a>
    <a href="mailto:sen.becky.massey@capitol.tn.gov">sen.becky.massey@capitol.tn.gov</a>
  </div>
</body></html>
"#;

pub const HOUSE_PAGE: &str = r#"
<html><body>
  <div class="repContainer">
    <strong class="rep-name">Dave Wright</strong>
    <p class="repDistrict">Republican - District 19</p>
    <a href="tel:6157411234">615.741.1234</a>
    <a href="mailto:rep.dave.wright@capitol.tn.gov"></a>
  </div>
  <div class="repContainer">
    <strong class="rep-name">Vincent Dixie</strong>
    <p class="repDistrict">Democrat - District 54</p>
  </div>
</body></html>
"#;
