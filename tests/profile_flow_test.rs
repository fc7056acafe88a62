// Full profile lifecycle through the public API: save, list, switch,
// confirm, and the gate behavior an agent sees.

use shopprobe::config::{BRAND_TOKEN, Config, DEFAULT_DOMAIN};
use shopprobe::cookies::CookieStore;
use shopprobe::session::SessionController;
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> Config {
    Config {
        data_dir: dir.path().to_path_buf(),
        default_domain: DEFAULT_DOMAIN.to_string(),
        brand_token: BRAND_TOKEN.to_string(),
        mock: false,
        capture: false,
        headless: true,
    }
}

const PERSONAL: &str = r#"[
    {"name":"session-id","value":"abc","domain":".amazon.com","sameSite":"lax"},
    {"name":"ubid-main","value":"def","domain":".amazon.com","sameSite":"no_restriction"}
]"#;

const WORK: &str = r#"[
    {"name":"session-id","value":"xyz","domain":".amazon.co.uk","sameSite":"unspecified"}
]"#;

#[tokio::test]
async fn save_list_switch_confirm_flow() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);

    let store = CookieStore::open(&config).unwrap();
    store.save("personal", PERSONAL).unwrap();
    store.save("work", WORK).unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].name, "personal");
    assert_eq!(listed[0].cookies, 2);
    assert_eq!(listed[0].domain.as_deref(), Some("amazon.com"));
    assert_eq!(listed[1].name, "work");
    assert_eq!(listed[1].cookies, 1);
    assert_eq!(listed[1].domain.as_deref(), Some("amazon.co.uk"));

    let session = SessionController::new(store, &config);

    // Same-site normalization survives the save/load roundtrip
    let cookies = session.cookies().await;
    assert_eq!(cookies.len(), 2);
    assert_eq!(cookies[0].name, "session-id");
    assert_eq!(cookies[0].value, "abc");

    // Identity-scoped work starts gated
    let prompt = session.require_confirmation().await.expect("prompt");
    assert_eq!(prompt.available_profiles, vec!["personal", "work"]);

    // The agent resubmits with a profile choice: switch + confirm in one step
    session.confirm_session(Some("work")).await.unwrap();
    assert!(session.require_confirmation().await.is_none());
    assert_eq!(session.active_profile().await, "work");
    assert_eq!(session.domain().await, "amazon.co.uk");

    // Switching identities drops the confirmation
    session.switch_profile("personal").await.unwrap();
    assert!(session.require_confirmation().await.is_some());
    assert_eq!(session.domain().await, "amazon.com");
}

#[tokio::test]
async fn unknown_profile_never_disturbs_state() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);
    let store = CookieStore::open(&config).unwrap();
    store.save("personal", PERSONAL).unwrap();

    let session = SessionController::new(store, &config);
    session.confirm_session(None).await.unwrap();

    assert!(session.switch_profile("missing").await.is_err());
    assert!(session.confirm_session(Some("missing")).await.is_err());

    assert_eq!(session.active_profile().await, "personal");
    assert!(session.is_confirmed().await);
    assert_eq!(session.cookies().await.len(), 2);
}
