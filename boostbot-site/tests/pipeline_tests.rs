//! Login and extraction against a mock site.

use std::time::Duration;

use boostbot_core::{Credentials, SnapshotStatus};
use boostbot_fetch::{FetchSettings, StrategyKind, build_strategy};
use boostbot_site::{BoostFetcher, SiteDescriptor};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PAGE: &str = r#"<html><body>
  <form method="post" action="/login">
    <input type="hidden" name="csrf" value="abc">
    <input type="text" name="login_name">
    <input type="password" name="login_password">
  </form>
</body></html>"#;

const BOOST_PAGE: &str = r#"<html><body>
  <div class="boost-card-info">
    <h3>  Sakura Card  </h3>
    <ul class="users-list"><li>UserA</li><li>UserB</li></ul>
  </div>
</body></html>"#;

fn fetcher_for(server: &MockServer) -> BoostFetcher {
    let site = SiteDescriptor::animestars()
        .and_then(|site| site.with_login_url(&format!("{}/login", server.uri())))
        .and_then(|site| site.with_target_url(&format!("{}/clubs/137/boost/", server.uri())))
        .unwrap();
    let settings = FetchSettings::new(site.site_root())
        .with_strategy(StrategyKind::Plain)
        .with_timeout(Duration::from_secs(5));

    BoostFetcher::new(site, Credentials::new("alice", "secret"), build_strategy(&settings)).unwrap()
}

async fn mount_login_page(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_login_then_extract() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("csrf=abc"))
        .and(body_string_contains("login_name=alice"))
        .and(body_string_contains("login_password=secret"))
        .and(body_string_contains("login_not_save=0"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/")
                .insert_header("Set-Cookie", "dle_user_id=7; Path=/"),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>home</html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/clubs/137/boost/"))
        .and(header("cookie", "dle_user_id=7"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BOOST_PAGE))
        .expect(2)
        .mount(&server)
        .await;

    let mut fetcher = fetcher_for(&server);

    let snapshot = fetcher.fetch().await;
    assert_eq!(snapshot.status(), SnapshotStatus::Ok);
    assert_eq!(snapshot.card_name(), "Sakura Card");
    assert_eq!(snapshot.owners(), ["UserA", "UserB"]);

    // Second fetch reuses the session: the login POST is expected once.
    assert!(fetcher.fetch().await.is_ok());
}

#[tokio::test]
async fn test_bad_credentials_rerender_login_page() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGIN_PAGE))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/clubs/137/boost/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(BOOST_PAGE))
        .expect(0)
        .mount(&server)
        .await;

    let mut fetcher = fetcher_for(&server);
    let snapshot = fetcher.fetch().await;

    assert_eq!(snapshot.status(), SnapshotStatus::AuthFailed);
    assert!(!fetcher.has_session());
}

#[tokio::test]
async fn test_expired_session_redirects_to_login() {
    let server = MockServer::start().await;
    mount_login_page(&server).await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("home"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/clubs/137/boost/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/login"))
        .mount(&server)
        .await;

    let mut fetcher = fetcher_for(&server);
    let snapshot = fetcher.fetch().await;

    assert_eq!(snapshot.status(), SnapshotStatus::AuthFailed);
    assert!(snapshot.requires_reauth());
    assert!(!fetcher.has_session());
}
