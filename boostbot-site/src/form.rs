//! Login form discovery and payload assembly.

use boostbot_core::Credentials;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;
use url::Url;

use crate::descriptor::SiteDescriptor;
use crate::error::SiteError;

/// Hidden fields and submit target read from a login page.
///
/// Built once per login attempt and consumed by [`LoginFormState::payload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginFormState {
    /// Hidden inputs in document order. Missing values are empty strings.
    pub hidden_fields: Vec<(String, String)>,
    /// Where the form posts to.
    pub action_url: Url,
}

impl LoginFormState {
    /// Finds the login form in `html`, fetched from `page_url`.
    ///
    /// The login form is the first `<form>` holding an input named after
    /// the descriptor's username field.
    pub fn parse(html: &str, page_url: &Url, site: &SiteDescriptor) -> Result<Self, SiteError> {
        let document = Html::parse_document(html);
        let form_selector = compile("form")?;
        let input_selector = compile("input[name]")?;

        let form = document
            .select(&form_selector)
            .find(|form| {
                form.select(&input_selector)
                    .any(|input| input.value().attr("name") == Some(site.username_field.as_str()))
            })
            .ok_or(SiteError::FormNotFound)?;

        let hidden_fields: Vec<(String, String)> = form
            .select(&input_selector)
            .filter(|input| is_hidden(*input))
            .filter_map(|input| {
                let name = input.value().attr("name")?;
                let value = input.value().attr("value").unwrap_or_default();
                Some((name.to_string(), value.to_string()))
            })
            .collect();

        let action_url = match form.value().attr("action").map(str::trim) {
            Some(action) if !action.is_empty() => page_url.join(action)?,
            _ => site.login_url.clone(),
        };

        debug!(hidden = hidden_fields.len(), action = %action_url, "Login form located");
        Ok(Self {
            hidden_fields,
            action_url,
        })
    }

    /// Builds the submission payload.
    ///
    /// Hidden fields first, then the descriptor's fixed fields the form does
    /// not already carry, then the credentials, which replace anything of
    /// the same name.
    pub fn payload(
        &self,
        site: &SiteDescriptor,
        credentials: &Credentials,
    ) -> Vec<(String, String)> {
        let mut fields: Vec<(String, String)> = Vec::with_capacity(
            self.hidden_fields.len() + site.static_fields.len() + 2,
        );

        for (name, value) in &self.hidden_fields {
            if !fields.iter().any(|(existing, _)| existing == name) {
                fields.push((name.clone(), value.clone()));
            }
        }

        for (name, value) in &site.static_fields {
            if !fields.iter().any(|(existing, _)| existing == name) {
                fields.push((name.clone(), value.clone()));
            }
        }

        upsert(&mut fields, &site.username_field, credentials.username());
        upsert(&mut fields, &site.password_field, credentials.password());
        fields
    }
}

fn upsert(fields: &mut Vec<(String, String)>, name: &str, value: &str) {
    match fields.iter_mut().find(|(existing, _)| existing == name) {
        Some(slot) => slot.1 = value.to_string(),
        None => fields.push((name.to_string(), value.to_string())),
    }
}

fn is_hidden(input: ElementRef<'_>) -> bool {
    input
        .value()
        .attr("type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"))
}

pub(crate) fn compile(selector: &str) -> Result<Selector, SiteError> {
    Selector::parse(selector).map_err(|e| SiteError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    const LOGIN_PAGE: &str = r#"
        <html><body>
          <form action="/search" method="get"><input name="q"></form>
          <form method="post" action="/login/submit">
            <input type="hidden" name="csrf" value="abc">
            <input type="text" name="login_name">
            <input type="password" name="login_password">
            <button type="submit">Войти</button>
          </form>
        </body></html>
    "#;

    fn site() -> SiteDescriptor {
        SiteDescriptor::animestars().unwrap()
    }

    fn login_url() -> Url {
        Url::parse("https://animestars.org/login").unwrap()
    }

    fn as_map(fields: &[(String, String)]) -> BTreeMap<&str, &str> {
        fields.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_picks_form_with_username_field() {
        let state = LoginFormState::parse(LOGIN_PAGE, &login_url(), &site()).unwrap();
        assert_eq!(state.action_url.as_str(), "https://animestars.org/login/submit");
        assert_eq!(state.hidden_fields, vec![("csrf".to_string(), "abc".to_string())]);
    }

    #[test]
    fn test_payload_with_csrf_and_static_field() {
        let state = LoginFormState::parse(LOGIN_PAGE, &login_url(), &site()).unwrap();
        let payload = state.payload(&site(), &Credentials::new("alice", "secret"));

        let expected = BTreeMap::from([
            ("csrf", "abc"),
            ("login_name", "alice"),
            ("login_not_save", "0"),
            ("login_password", "secret"),
        ]);
        assert_eq!(as_map(&payload), expected);
        assert_eq!(payload.len(), 4);
    }

    #[test]
    fn test_payload_is_hidden_plus_credentials_without_static_fields() {
        let page = r#"<form>
            <input type="hidden" name="a" value="1">
            <input type="HIDDEN" name="b">
            <input type="hidden" name="c" value="">
            <input name="login_name"><input name="login_password" type="password">
        </form>"#;
        let site = site().without_static_fields();
        let state = LoginFormState::parse(page, &login_url(), &site).unwrap();
        let payload = state.payload(&site, &Credentials::new("alice", "secret"));

        assert_eq!(payload.len(), 3 + 2);
        let map = as_map(&payload);
        assert_eq!(map["a"], "1");
        assert_eq!(map["b"], "");
        assert_eq!(map["c"], "");
        assert_eq!(map["login_name"], "alice");
    }

    #[test]
    fn test_missing_action_falls_back_to_login_url() {
        let page = r#"<form action=""><input name="login_name"></form>"#;
        let state = LoginFormState::parse(page, &login_url(), &site()).unwrap();
        assert_eq!(state.action_url, login_url());
    }

    #[test]
    fn test_form_field_values_never_override_credentials() {
        let page = r#"<form>
            <input type="hidden" name="login_not_save" value="1">
            <input type="hidden" name="login_name" value="preset">
            <input name="login_name">
        </form>"#;
        let state = LoginFormState::parse(page, &login_url(), &site()).unwrap();
        let payload = state.payload(&site(), &Credentials::new("alice", "secret"));
        let map = as_map(&payload);

        assert_eq!(map["login_not_save"], "1");
        assert_eq!(map["login_name"], "alice");
        assert_eq!(payload.len(), 3);
    }

    #[test]
    fn test_form_not_found() {
        let page = r#"<form><input name="email"></form>"#;
        assert!(matches!(
            LoginFormState::parse(page, &login_url(), &site()),
            Err(SiteError::FormNotFound)
        ));
    }
}
