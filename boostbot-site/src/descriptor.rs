//! Site descriptor.
//!
//! A descriptor contains all the static knowledge about the target site:
//! - Endpoints (login page, target page)
//! - Login form field names and fixed form values
//! - Card selectors, each with optional fallbacks for markup drift

use url::Url;

use crate::error::SiteError;

/// Default login endpoint.
pub const DEFAULT_LOGIN_URL: &str = "https://animestars.org/login";

/// Default target page (club boost page).
pub const DEFAULT_TARGET_URL: &str = "https://animestars.org/clubs/137/boost/";

// ============================================================================
// Selector Chain
// ============================================================================

/// A primary CSS selector plus fallbacks tried in order when it matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorChain {
    /// Selector tried first.
    pub primary: String,
    /// Selectors tried after the primary, in order.
    pub fallbacks: Vec<String>,
}

impl SelectorChain {
    /// Creates a chain with no fallbacks.
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallbacks: Vec::new(),
        }
    }

    /// Appends a fallback selector.
    pub fn or(mut self, fallback: impl Into<String>) -> Self {
        self.fallbacks.push(fallback.into());
        self
    }

    /// All selectors in the order they are tried.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary.as_str()).chain(self.fallbacks.iter().map(String::as_str))
    }
}

// ============================================================================
// Card Selectors
// ============================================================================

/// Where the card lives in the target page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSelectors {
    /// Card-info container.
    pub container: SelectorChain,
    /// Card name heading, relative to the container.
    pub heading: SelectorChain,
    /// Owner list items, relative to the container.
    pub owners: SelectorChain,
}

impl Default for CardSelectors {
    fn default() -> Self {
        Self {
            container: SelectorChain::new("div.boost-card-info").or("div.club-boost__card"),
            heading: SelectorChain::new("h3").or(".card-name"),
            owners: SelectorChain::new("ul.users-list li").or(".club-boost__user"),
        }
    }
}

// ============================================================================
// Site Descriptor
// ============================================================================

/// Static configuration for the site the bot reads from.
#[derive(Debug, Clone)]
pub struct SiteDescriptor {
    /// Short site name for logs.
    pub name: String,
    /// Login endpoint.
    pub login_url: Url,
    /// Page holding the boosted card.
    pub target_url: Url,
    /// Name of the username input.
    pub username_field: String,
    /// Name of the password input.
    pub password_field: String,
    /// Fixed values submitted unless the form already provides them.
    pub static_fields: Vec<(String, String)>,
    /// Card selectors.
    pub selectors: CardSelectors,
}

impl SiteDescriptor {
    /// Descriptor for animestars.org.
    pub fn animestars() -> Result<Self, SiteError> {
        Ok(Self {
            name: "animestars".to_string(),
            login_url: Url::parse(DEFAULT_LOGIN_URL)?,
            target_url: Url::parse(DEFAULT_TARGET_URL)?,
            username_field: "login_name".to_string(),
            password_field: "login_password".to_string(),
            static_fields: vec![("login_not_save".to_string(), "0".to_string())],
            selectors: CardSelectors::default(),
        })
    }

    /// Overrides the login endpoint.
    pub fn with_login_url(mut self, url: &str) -> Result<Self, SiteError> {
        self.login_url = Url::parse(url)?;
        Ok(self)
    }

    /// Overrides the target page.
    pub fn with_target_url(mut self, url: &str) -> Result<Self, SiteError> {
        self.target_url = Url::parse(url)?;
        Ok(self)
    }

    /// Drops the fixed form values.
    pub fn without_static_fields(mut self) -> Self {
        self.static_fields.clear();
        self
    }

    /// Root of the site the login endpoint lives on.
    pub fn site_root(&self) -> Url {
        let mut root = self.login_url.clone();
        root.set_path("/");
        root.set_query(None);
        root.set_fragment(None);
        root
    }

    /// Returns true if `url` points at the login endpoint.
    ///
    /// Host and path are compared; a trailing slash and the query string
    /// are ignored.
    pub fn is_login_location(&self, url: &Url) -> bool {
        url.host_str() == self.login_url.host_str()
            && url.port_or_known_default() == self.login_url.port_or_known_default()
            && url.path().trim_end_matches('/') == self.login_url.path().trim_end_matches('/')
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animestars_defaults() {
        let site = SiteDescriptor::animestars().unwrap();
        assert_eq!(site.login_url.as_str(), DEFAULT_LOGIN_URL);
        assert_eq!(site.target_url.as_str(), DEFAULT_TARGET_URL);
        assert_eq!(site.username_field, "login_name");
        assert_eq!(site.password_field, "login_password");
        assert_eq!(site.site_root().as_str(), "https://animestars.org/");
        assert_eq!(site.selectors.container.primary, "div.boost-card-info");
    }

    #[test]
    fn test_login_location_matching() {
        let site = SiteDescriptor::animestars().unwrap();
        let at = |s: &str| site.is_login_location(&Url::parse(s).unwrap());

        assert!(at("https://animestars.org/login"));
        assert!(at("https://animestars.org/login/"));
        assert!(at("https://animestars.org/login?return=/clubs/137/boost/"));
        assert!(!at("https://animestars.org/"));
        assert!(!at("https://animestars.org/clubs/137/boost/"));
        assert!(!at("https://other.org/login"));
    }

    #[test]
    fn test_selector_chain_order() {
        let chain = SelectorChain::new("a").or("b").or("c");
        assert_eq!(chain.candidates().collect::<Vec<_>>(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_invalid_override() {
        let site = SiteDescriptor::animestars().unwrap();
        assert!(matches!(
            site.with_login_url("not a url"),
            Err(SiteError::InvalidUrl(_))
        ));
    }
}
