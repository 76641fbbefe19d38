//! Shareable contact details for matched legislators.
//!
//! The QR image itself is rendered by an external service; this module only
//! builds the text it encodes and the request URL.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::QrConfig;
use crate::directory::LegislatorRecord;
use crate::matcher::MatchResult;

/// Click-to-contact links for one legislator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ContactLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailto: Option<String>,
}

impl ContactLinks {
    fn for_record(record: &LegislatorRecord) -> Self {
        Self {
            tel: record.contact_info.phone.as_deref().and_then(tel_uri),
            mailto: record.contact_info.email.as_deref().map(mailto_uri),
        }
    }
}

/// Contact summary, its QR image URL, and per-legislator links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactCard {
    pub summary: String,
    pub qr_code_url: String,
    pub senator: Option<ContactLinks>,
    pub representative: Option<ContactLinks>,
}

/// `tel:` URI keeping only the digits of `phone`.
///
/// Returns `None` when the phone has no digits.
#[must_use]
pub fn tel_uri(phone: &str) -> Option<String> {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        None
    } else {
        Some(format!("tel:{digits}"))
    }
}

/// `mailto:` URI for an email address.
#[must_use]
pub fn mailto_uri(email: &str) -> String {
    format!("mailto:{}", email.trim())
}

fn write_legislator(out: &mut String, title: &str, record: &LegislatorRecord) {
    out.push_str(&format!(
        "{title} - DISTRICT {}\n{}\n",
        record.district, record.name
    ));
    if let Some(phone) = &record.contact_info.phone {
        out.push_str(&format!("Phone: {phone}\n"));
    }
    if let Some(email) = &record.contact_info.email {
        out.push_str(&format!("Email: {email}\n"));
    }
}

/// Plain-text contact summary encoded into the QR image.
#[must_use]
pub fn contact_summary(result: &MatchResult, address: &str) -> String {
    let mut out = String::from("LEGISLATOR CONTACT INFO\n\n");

    if let Some(senator) = &result.senator {
        write_legislator(&mut out, "STATE SENATOR", senator);
        out.push('\n');
    }
    if let Some(representative) = &result.representative {
        write_legislator(&mut out, "STATE REPRESENTATIVE", representative);
    }

    out.push_str("\nAddress: ");
    out.push_str(address);
    out
}

/// Image URL on the external QR service encoding `data`.
#[must_use]
pub fn qr_code_url(config: &QrConfig, data: &str) -> String {
    format!(
        "{}?data={}&size={size}x{size}&margin={}",
        config.base_url,
        urlencoding::encode(data),
        config.margin,
        size = config.size,
    )
}

/// Build the contact card, or `None` when nobody matched.
#[must_use]
pub fn contact_card(
    config: &QrConfig,
    result: &MatchResult,
    address: &str,
) -> Option<ContactCard> {
    if result.is_empty() {
        return None;
    }
    let summary = contact_summary(result, address);
    Some(ContactCard {
        qr_code_url: qr_code_url(config, &summary),
        senator: result.senator.as_ref().map(ContactLinks::for_record),
        representative: result.representative.as_ref().map(ContactLinks::for_record),
        summary,
    })
}
