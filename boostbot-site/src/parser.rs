//! Card markup parser.

use boostbot_core::{CardSnapshot, SnapshotStatus};
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

use crate::descriptor::{CardSelectors, SelectorChain};
use crate::error::SiteError;
use crate::form::compile;

/// Compiled selector chain.
#[derive(Debug)]
struct Compiled {
    chain: Vec<(String, Selector)>,
}

impl Compiled {
    fn new(chain: &SelectorChain) -> Result<Self, SiteError> {
        let chain = chain
            .candidates()
            .map(|css| Ok((css.to_string(), compile(css)?)))
            .collect::<Result<Vec<_>, SiteError>>()?;
        Ok(Self { chain })
    }

    /// First element matched by the first selector that matches anything.
    fn first_in_document<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.chain.iter().find_map(|(css, selector)| {
            let found = document.select(selector).next();
            if found.is_some() {
                debug!(selector = %css, "Container matched");
            }
            found
        })
    }

    fn first_in<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.chain
            .iter()
            .find_map(|(_, selector)| scope.select(selector).next())
    }

    /// All elements matched by the first selector that matches anything.
    fn all_in<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.chain
            .iter()
            .map(|(_, selector)| scope.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }
}

/// Parses the boosted card out of the target page.
#[derive(Debug)]
pub struct CardParser {
    container: Compiled,
    heading: Compiled,
    owners: Compiled,
}

impl CardParser {
    /// Compiles the selectors. Fails if any selector is invalid.
    pub fn new(selectors: &CardSelectors) -> Result<Self, SiteError> {
        Ok(Self {
            container: Compiled::new(&selectors.container)?,
            heading: Compiled::new(&selectors.heading)?,
            owners: Compiled::new(&selectors.owners)?,
        })
    }

    /// Extracts the card name and owners.
    ///
    /// A missing container, or a container without a non-blank heading, is
    /// `SelectorMiss`. A container without owner items is `Ok` with no
    /// owners.
    pub fn parse(&self, html: &str) -> CardSnapshot {
        let document = Html::parse_document(html);

        let Some(container) = self.container.first_in_document(&document) else {
            warn!("Card container not found; page markup may have changed");
            return CardSnapshot::failed(SnapshotStatus::SelectorMiss);
        };

        let card_name = self
            .heading
            .first_in(container)
            .map(collapse_text)
            .unwrap_or_default();

        let owners: Vec<String> = self
            .owners
            .all_in(container)
            .into_iter()
            .map(collapse_text)
            .collect();

        match CardSnapshot::ok(card_name, owners) {
            Ok(snapshot) => {
                info!(
                    card = %snapshot.card_name(),
                    owners = snapshot.owners().len(),
                    "Card parsed"
                );
                snapshot
            }
            Err(e) => {
                warn!(error = %e, "Card heading missing or empty");
                CardSnapshot::failed(SnapshotStatus::SelectorMiss)
            }
        }
    }
}

/// Element text with surrounding whitespace trimmed.
fn collapse_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> CardParser {
        CardParser::new(&CardSelectors::default()).unwrap()
    }

    #[test]
    fn test_card_with_owners() {
        let html = r#"
            <div class="boost-card-info">
              <h3>  Sakura Card  </h3>
              <ul class="users-list"><li>UserA</li><li> UserB </li></ul>
            </div>"#;

        let snapshot = parser().parse(html);
        assert_eq!(snapshot.status(), SnapshotStatus::Ok);
        assert_eq!(snapshot.card_name(), "Sakura Card");
        assert_eq!(snapshot.owners(), ["UserA", "UserB"]);
    }

    #[test]
    fn test_duplicates_and_order_preserved() {
        let html = r#"
            <div class="boost-card-info"><h3>X</h3>
              <ul class="users-list"><li>b</li><li>a</li><li>b</li></ul>
            </div>"#;
        assert_eq!(parser().parse(html).owners(), ["b", "a", "b"]);
    }

    #[test]
    fn test_empty_owner_list_is_ok() {
        let html = r#"<div class="boost-card-info"><h3>Lonely</h3><ul class="users-list"></ul></div>"#;
        let snapshot = parser().parse(html);
        assert!(snapshot.is_ok());
        assert!(snapshot.has_no_owners());
    }

    #[test]
    fn test_missing_container_is_selector_miss() {
        let snapshot = parser().parse("<html><body><h3>Sakura</h3></body></html>");
        assert_eq!(snapshot.status(), SnapshotStatus::SelectorMiss);
        assert!(snapshot.owners().is_empty());
        assert!(snapshot.card_name().is_empty());
    }

    #[test]
    fn test_blank_heading_is_selector_miss() {
        let html = r#"<div class="boost-card-info"><h3>   </h3></div>"#;
        assert_eq!(parser().parse(html).status(), SnapshotStatus::SelectorMiss);
    }

    #[test]
    fn test_fallback_selectors() {
        let html = r#"
            <div class="club-boost__card">
              <span class="card-name">Fallback</span>
              <a class="club-boost__user">One</a>
            </div>"#;
        let snapshot = parser().parse(html);
        assert_eq!(snapshot.card_name(), "Fallback");
        assert_eq!(snapshot.owners(), ["One"]);
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let selectors = CardSelectors {
            container: SelectorChain::new("div[[["),
            ..CardSelectors::default()
        };
        assert!(matches!(
            CardParser::new(&selectors),
            Err(SiteError::InvalidSelector { .. })
        ));
    }
}
