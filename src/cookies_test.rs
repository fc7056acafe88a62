// Unit tests for the cookie model and profile store

use super::*;
use crate::config::{BRAND_TOKEN, DEFAULT_DOMAIN};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn test_store(dir: &TempDir) -> CookieStore {
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        default_domain: DEFAULT_DOMAIN.to_string(),
        brand_token: BRAND_TOKEN.to_string(),
        mock: false,
        capture: false,
        headless: true,
    };
    CookieStore::open(&config).unwrap()
}

fn cookie_json(name: &str, value: &str, domain: &str) -> String {
    format!(r#"{{"name":"{name}","value":"{value}","domain":"{domain}"}}"#)
}

#[test]
fn test_same_site_parse() {
    assert_eq!(SameSite::parse("strict"), Some(SameSite::Strict));
    assert_eq!(SameSite::parse("Lax"), Some(SameSite::Lax));
    assert_eq!(SameSite::parse("none"), Some(SameSite::None));
    // Legacy extension-export alias
    assert_eq!(SameSite::parse("no_restriction"), Some(SameSite::None));
    // Outside the recognized set collapses to unset, never an error
    assert_eq!(SameSite::parse("unspecified"), None);
    assert_eq!(SameSite::parse(""), None);
}

#[test]
fn test_cookie_same_site_deserialization() {
    let cookie: Cookie = serde_json::from_str(
        r#"{"name":"a","value":"b","domain":".amazon.com","sameSite":"no_restriction"}"#,
    )
    .unwrap();
    assert_eq!(cookie.same_site, Some(SameSite::None));

    let cookie: Cookie = serde_json::from_str(
        r#"{"name":"a","value":"b","domain":".amazon.com","sameSite":"unspecified"}"#,
    )
    .unwrap();
    assert_eq!(cookie.same_site, None);

    let cookie: Cookie =
        serde_json::from_str(r#"{"name":"a","value":"b","domain":".amazon.com","sameSite":null}"#)
            .unwrap();
    assert_eq!(cookie.same_site, None);

    // Missing path defaults to "/"
    assert_eq!(cookie.path, "/");
}

#[test]
fn test_valid_profile_name() {
    assert!(valid_profile_name("personal"));
    assert!(valid_profile_name("work-2"));

    assert!(!valid_profile_name(""));
    assert!(!valid_profile_name("Work"));
    assert!(!valid_profile_name("my profile"));
    assert!(!valid_profile_name("a_b"));
}

#[test]
fn test_storefront_domain_prefers_dotted_over_www() {
    let cookies = vec![
        serde_json::from_str::<Cookie>(&cookie_json("x", "1", "www.amazon.co.uk")).unwrap(),
        serde_json::from_str::<Cookie>(&cookie_json("y", "2", ".amazon.co.uk")).unwrap(),
        serde_json::from_str::<Cookie>(&cookie_json("z", "3", "cdn.example.com")).unwrap(),
    ];
    assert_eq!(
        storefront_domain(&cookies, BRAND_TOKEN),
        Some("amazon.co.uk".to_string())
    );
}

#[test]
fn test_storefront_domain_strips_www_when_no_dotted_match() {
    let cookies =
        vec![serde_json::from_str::<Cookie>(&cookie_json("x", "1", "www.amazon.de")).unwrap()];
    assert_eq!(
        storefront_domain(&cookies, BRAND_TOKEN),
        Some("amazon.de".to_string())
    );
}

#[test]
fn test_storefront_domain_absent_without_brand_cookies() {
    let cookies =
        vec![serde_json::from_str::<Cookie>(&cookie_json("x", "1", ".example.com")).unwrap()];
    assert_eq!(storefront_domain(&cookies, BRAND_TOKEN), None);
}

#[test]
fn test_save_then_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);

    let payload = format!(
        "[{},{}]",
        cookie_json("session-id", "abc123", ".amazon.com"),
        cookie_json("ubid-main", "xyz", "www.amazon.com")
    );
    let saved = store.save("personal", &payload).unwrap();
    assert_eq!(saved.len(), 2);

    let loaded = store.load("personal").unwrap();
    assert_eq!(loaded.len(), 2);
    for (left, right) in saved.iter().zip(loaded.iter()) {
        assert_eq!(left.name, right.name);
        assert_eq!(left.value, right.value);
        assert_eq!(left.domain, right.domain);
    }
}

#[test]
fn test_save_rejects_each_malformed_payload_distinctly() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);

    let not_json = store.save("p", "nonsense").unwrap_err();
    assert!(not_json.to_string().contains("not valid JSON"));

    let not_array = store.save("p", r#"{"name":"a"}"#).unwrap_err();
    assert!(not_array.to_string().contains("must be a JSON array"));

    let empty = store.save("p", "[]").unwrap_err();
    assert!(empty.to_string().contains("empty"));

    let missing = store
        .save("p", r#"[{"name":"a","value":"b"}]"#)
        .unwrap_err();
    assert!(missing.to_string().contains("missing required field 'domain'"));

    // No file was written by any failed attempt
    assert!(!store.profile_path("p").exists());
}

#[test]
fn test_save_rejects_bad_profile_name() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);

    let err = store
        .save("Bad Name", &format!("[{}]", cookie_json("a", "b", "c.com")))
        .unwrap_err();
    assert!(err.to_string().contains("lowercase"));
}

#[test]
fn test_load_missing_profile_reports_not_found() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);
    store
        .save("work", &format!("[{}]", cookie_json("a", "b", ".amazon.com")))
        .unwrap();

    let err = store.load("other").unwrap_err();
    let not_found = err.downcast_ref::<ShopprobeError>().unwrap();
    match not_found {
        ShopprobeError::ProfileNotFound { name, available } => {
            assert_eq!(name, "other");
            assert_eq!(available, &vec!["work".to_string()]);
        }
        other => panic!("expected ProfileNotFound, got {other:?}"),
    }
}

#[test]
fn test_load_corrupt_profile_is_a_parse_error_not_not_found() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);
    fs::write(store.profile_path("broken"), "{{{{").unwrap();

    let err = store.load("broken").unwrap_err();
    assert!(err.downcast_ref::<ShopprobeError>().is_none());
    assert!(err.to_string().contains("broken"));
}

#[test]
fn test_list_reports_counts_and_domains() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);

    store
        .save(
            "personal",
            &format!(
                "[{},{}]",
                cookie_json("a", "1", ".amazon.com"),
                cookie_json("b", "2", ".amazon.com")
            ),
        )
        .unwrap();
    store
        .save("work", &format!("[{}]", cookie_json("c", "3", ".amazon.co.uk")))
        .unwrap();
    fs::write(store.profile_path("corrupt"), "not json").unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 3);

    assert_eq!(listed[0].name, "corrupt");
    assert_eq!(listed[0].cookies, 0);
    assert_eq!(listed[0].domain, None);

    assert_eq!(listed[1].name, "personal");
    assert_eq!(listed[1].cookies, 2);
    assert_eq!(listed[1].domain, Some("amazon.com".to_string()));

    assert_eq!(listed[2].name, "work");
    assert_eq!(listed[2].cookies, 1);
    assert_eq!(listed[2].domain, Some("amazon.co.uk".to_string()));
}

#[test]
fn test_legacy_cookie_file_migrates_once() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);

    let legacy = dir.path().join("cookies.json");
    fs::write(&legacy, format!("[{}]", cookie_json("s", "t", ".amazon.com"))).unwrap();

    // Fallback applies only to the default profile
    assert!(store.exists(DEFAULT_PROFILE));
    assert!(!store.exists("work"));

    let cookies = store.load(DEFAULT_PROFILE).unwrap();
    assert_eq!(cookies.len(), 1);

    // The legacy content now lives in the new layout
    assert!(store.profile_path(DEFAULT_PROFILE).exists());
    let again = store.load(DEFAULT_PROFILE).unwrap();
    assert_eq!(again, cookies);
}

#[test]
fn test_load_drops_incomplete_cookies() {
    let dir = TempDir::new().unwrap();
    let store = test_store(&dir);

    fs::write(
        store.profile_path("padded"),
        format!(
            "[{},{}]",
            cookie_json("ok", "v", ".amazon.com"),
            cookie_json("", "v", ".amazon.com")
        ),
    )
    .unwrap();

    let cookies = store.load("padded").unwrap();
    assert_eq!(cookies.len(), 1);
    assert_eq!(cookies[0].name, "ok");
}
