//! HTML parsing for the General Assembly directory pages.
//!
//! Each legislator is a container element (`.senatorContainer` or
//! `.repContainer`). Cards are parsed independently: a card missing its
//! name or district is skipped and its siblings are still returned.

use scraper::{ElementRef, Html, Selector};
use tn_districts::{district_from_label, Chamber};

use super::types::{ContactInfo, LegislatorRecord, Party};
use super::DirectoryError;

#[derive(Debug, thiserror::Error)]
enum CardError {
    #[error("missing name")]
    MissingName,
    #[error("missing district label")]
    MissingDistrictLabel,
    #[error("no district number in label '{0}'")]
    MissingDistrictNumber(String),
}

struct CardSelectors {
    container: Selector,
    name: Selector,
    district: Selector,
    image: Selector,
    phone: Selector,
    email: Selector,
    facebook: Selector,
    twitter: Selector,
    instagram: Selector,
}

fn selector(css: &str) -> Result<Selector, DirectoryError> {
    Selector::parse(css).map_err(|e| DirectoryError::Selector(format!("{css}: {e}")))
}

impl CardSelectors {
    fn for_chamber(chamber: Chamber) -> Result<Self, DirectoryError> {
        let (container, name, district) = match chamber {
            Chamber::Senate => (
                ".senatorContainer",
                ".senator-name, strong",
                ".senatorDistrict, p",
            ),
            Chamber::House => (".repContainer", ".rep-name, strong", ".repDistrict, p"),
        };
        Ok(Self {
            container: selector(container)?,
            name: selector(name)?,
            district: selector(district)?,
            image: selector("img")?,
            phone: selector(r#"a[href^="tel:"]"#)?,
            email: selector(r#"a[href^="mailto:"]"#)?,
            facebook: selector(r#"a[href*="facebook.com"]"#)?,
            twitter: selector(r#"a[href*="twitter.com"]"#)?,
            instagram: selector(r#"a[href*="instagram.com"]"#)?,
        })
    }
}

/// Parser for one chamber's directory page.
pub struct DirectoryParser {
    chamber: Chamber,
    site_base_url: String,
    selectors: CardSelectors,
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(element_text)
        .filter(|text| !text.is_empty())
}

fn first_href<'a>(card: ElementRef<'a>, selector: &Selector) -> Option<&'a str> {
    card.select(selector).next().and_then(|a| a.value().attr("href"))
}

/// Anchor text, else the href with its scheme removed.
fn scheme_link(card: ElementRef<'_>, selector: &Selector, scheme: &str) -> Option<String> {
    let anchor = card.select(selector).next()?;
    let text = element_text(anchor);
    if !text.is_empty() {
        return Some(text);
    }
    anchor
        .value()
        .attr("href")
        .map(|href| href.trim_start_matches(scheme).trim().to_string())
        .filter(|value| !value.is_empty())
}

impl DirectoryParser {
    /// Create a parser for `chamber`. Relative image paths are joined to
    /// `site_base_url`.
    ///
    /// # Errors
    /// Returns [`DirectoryError::Selector`] if a selector fails to compile.
    pub fn new(chamber: Chamber, site_base_url: impl Into<String>) -> Result<Self, DirectoryError> {
        Ok(Self {
            chamber,
            site_base_url: site_base_url.into(),
            selectors: CardSelectors::for_chamber(chamber)?,
        })
    }

    /// Parse every legislator card on the page.
    #[must_use]
    pub fn parse_page(&self, html: &str) -> Vec<LegislatorRecord> {
        let document = Html::parse_document(html);
        document
            .select(&self.selectors.container)
            .enumerate()
            .filter_map(|(index, card)| match self.parse_card(index, card) {
                Ok(record) => Some(record),
                Err(reason) => {
                    tracing::debug!(
                        chamber = %self.chamber,
                        index,
                        %reason,
                        "skipping legislator card"
                    );
                    None
                }
            })
            .collect()
    }

    fn parse_card(
        &self,
        index: usize,
        card: ElementRef<'_>,
    ) -> Result<LegislatorRecord, CardError> {
        let s = &self.selectors;

        let name = first_text(card, &s.name).ok_or(CardError::MissingName)?;
        let label = first_text(card, &s.district).ok_or(CardError::MissingDistrictLabel)?;
        let district = district_from_label(&label)
            .ok_or_else(|| CardError::MissingDistrictNumber(label.clone()))?;

        let image_url = card
            .select(&s.image)
            .next()
            .and_then(|img| img.value().attr("src"))
            .filter(|src| !src.trim().is_empty())
            .map(|src| self.absolute_url(src.trim()));

        let contact_info = ContactInfo {
            phone: scheme_link(card, &s.phone, "tel:"),
            email: scheme_link(card, &s.email, "mailto:"),
            website: None,
            facebook: first_href(card, &s.facebook).map(str::to_string),
            twitter: first_href(card, &s.twitter).map(str::to_string),
            instagram: first_href(card, &s.instagram).map(str::to_string),
        };

        Ok(LegislatorRecord {
            id: format!("{}-{index}", self.chamber),
            chamber: self.chamber,
            name,
            district,
            party: Party::from_label(&label),
            image_url,
            contact_info,
            committees: None,
            biography: None,
        })
    }

    fn absolute_url(&self, src: &str) -> String {
        if src.starts_with("http://") || src.starts_with("https://") {
            return src.to_string();
        }
        let base = self.site_base_url.trim_end_matches('/');
        if src.starts_with('/') {
            format!("{base}{src}")
        } else {
            format!("{base}/{src}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SENATE_PAGE: &str = r#"
        <html><body>
          <div class="senatorContainer">
            <img src="/images/members/s6.jpg">
            <strong class="senator-name">Becky Duncan Massey</strong>
            <p class="senatorDistrict">Republican - District 6</p>
            <a href="tel:6157411648">(615) 741-1648</a>
            <a href="mailto:sen.becky.massey@capitol.tn.gov"></a>
            <a href="https://www.facebook.com/massey">Facebook</a>
            <a href="https://twitter.com/massey">Twitter</a>
          </div>
          <div class="senatorContainer">
            <p class="senatorDistrict">Democrat - District 19</p>
          </div>
          <div class="senatorContainer">
            <strong>Charlane Oliver</strong>
            <p>Democrat - District 19</p>
            <img src="https://cdn.example.com/s19.png">
          </div>
        </body></html>
    "#;

    fn senate_parser() -> DirectoryParser {
        DirectoryParser::new(Chamber::Senate, "https://wapp.capitol.tn.gov")
            .expect("selectors")
    }

    #[test]
    fn parses_full_card() {
        let records = senate_parser().parse_page(SENATE_PAGE);
        let first = &records[0];
        assert_eq!(first.id, "senate-0");
        assert_eq!(first.name, "Becky Duncan Massey");
        assert_eq!(first.district, "6");
        assert_eq!(first.party, Party::Republican);
        assert_eq!(
            first.image_url.as_deref(),
            Some("https://wapp.capitol.tn.gov/images/members/s6.jpg")
        );
        assert_eq!(first.contact_info.phone.as_deref(), Some("(615) 741-1648"));
        assert_eq!(
            first.contact_info.email.as_deref(),
            Some("sen.becky.massey@capitol.tn.gov")
        );
        assert_eq!(
            first.contact_info.facebook.as_deref(),
            Some("https://www.facebook.com/massey")
        );
        assert_eq!(
            first.contact_info.twitter.as_deref(),
            Some("https://twitter.com/massey")
        );
        assert!(first.contact_info.instagram.is_none());
    }

    #[test]
    fn malformed_card_does_not_stop_siblings() {
        let records = senate_parser().parse_page(SENATE_PAGE);
        assert_eq!(records.len(), 2);
        // index follows card position, so the skipped card leaves a gap
        assert_eq!(records[1].id, "senate-2");
        assert_eq!(records[1].name, "Charlane Oliver");
        assert_eq!(records[1].party, Party::Democrat);
        assert_eq!(
            records[1].image_url.as_deref(),
            Some("https://cdn.example.com/s19.png")
        );
    }

    #[test]
    fn card_without_district_number_is_skipped() {
        let html = r#"
            <div class="repContainer"><strong>Vacant</strong><p>District pending</p></div>
            <div class="repContainer"><strong class="rep-name">Sam Whitson</strong><p class="repDistrict">Republican - District 065</p></div>
        "#;
        let parser = DirectoryParser::new(Chamber::House, "https://wapp.capitol.tn.gov")
            .expect("selectors");
        let records = parser.parse_page(html);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "house-1");
        assert_eq!(records[0].district, "65");
    }

    #[test]
    fn senate_selectors_ignore_house_cards() {
        let html = r#"<div class="repContainer"><strong>Rep</strong><p>District 1</p></div>"#;
        assert!(senate_parser().parse_page(html).is_empty());
    }

    #[test]
    fn relative_image_without_slash_is_joined() {
        let parser = senate_parser();
        assert_eq!(
            parser.absolute_url("images/s1.jpg"),
            "https://wapp.capitol.tn.gov/images/s1.jpg"
        );
    }
}
