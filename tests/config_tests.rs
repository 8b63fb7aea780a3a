//! Server configuration tests

use mevzuat_mcp::config::{
    DEFAULT_BEDESTEN_BASE_URL, DEFAULT_CACHE_TTL, DEFAULT_MAX_RETRIES, DEFAULT_MEVZUAT_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT, ENV_CACHE_TTL_SECS, ENV_MEVZUAT_BASE_URL, ENV_OCR_API_KEY,
    ENV_TIMEOUT_SECS,
};
use mevzuat_mcp::{ErrorKind, MevzuatError, ServerConfig};
use std::collections::HashMap;
use std::time::Duration;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name| map.get(name).cloned()
}

#[test]
fn builder_defaults() {
    let config = ServerConfig::builder().build().unwrap();
    assert_eq!(config.mevzuat_base_url(), DEFAULT_MEVZUAT_BASE_URL);
    assert_eq!(config.bedesten_base_url(), DEFAULT_BEDESTEN_BASE_URL);
    assert_eq!(config.request_timeout(), DEFAULT_REQUEST_TIMEOUT);
    assert_eq!(config.cache_ttl(), DEFAULT_CACHE_TTL);
    assert_eq!(config.max_retries(), DEFAULT_MAX_RETRIES);
    assert!(!config.ocr_enabled());
    assert_eq!(config.retry_config().max_retries, DEFAULT_MAX_RETRIES);
}

#[test]
fn trailing_slashes_are_dropped_from_base_urls() {
    let config = ServerConfig::builder()
        .mevzuat_base_url("http://127.0.0.1:8080/")
        .bedesten_base_url(" http://127.0.0.1:8080/mevzuat// ")
        .build()
        .unwrap();
    assert_eq!(config.mevzuat_base_url(), "http://127.0.0.1:8080");
    assert_eq!(config.bedesten_base_url(), "http://127.0.0.1:8080/mevzuat");
}

#[test]
fn invalid_values_are_rejected() {
    let cases = [
        ("mevzuat_base_url", ServerConfig::builder().mevzuat_base_url("not a url").build()),
        ("bedesten_base_url", ServerConfig::builder().bedesten_base_url("ftp://example.com").build()),
        ("request_timeout", ServerConfig::builder().request_timeout(Duration::ZERO).build()),
        ("cache_ttl", ServerConfig::builder().cache_ttl(Duration::ZERO).build()),
        ("max_retries", ServerConfig::builder().max_retries(11).build()),
    ];

    for (expected, result) in cases {
        let err = result.unwrap_err();
        assert!(
            matches!(err, MevzuatError::InvalidParameter { ref field, .. } if field == expected),
            "{expected}: {err}"
        );
    }
}

#[test]
fn blank_ocr_key_disables_ocr() {
    let config = ServerConfig::builder()
        .ocr_api_key(Some("   ".into()))
        .build()
        .unwrap();
    assert!(!config.ocr_enabled());
    assert_eq!(config.ocr_api_key(), None);

    let config = ServerConfig::builder()
        .ocr_api_key(Some("secret".into()))
        .build()
        .unwrap();
    assert!(config.ocr_enabled());
    assert_eq!(config.ocr_api_key(), Some("secret"));
}

#[test]
fn environment_overrides_defaults() {
    let config = ServerConfig::from_lookup(lookup(&[
        (ENV_MEVZUAT_BASE_URL, "http://localhost:9000"),
        (ENV_TIMEOUT_SECS, " 12 "),
        (ENV_CACHE_TTL_SECS, "60"),
        (ENV_OCR_API_KEY, "key"),
    ]))
    .unwrap();

    assert_eq!(config.mevzuat_base_url(), "http://localhost:9000");
    assert_eq!(config.bedesten_base_url(), DEFAULT_BEDESTEN_BASE_URL);
    assert_eq!(config.request_timeout(), Duration::from_secs(12));
    assert_eq!(config.cache_ttl(), Duration::from_secs(60));
    assert!(config.ocr_enabled());
}

#[test]
fn unparseable_environment_is_an_error() {
    let err = ServerConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "thirty")])).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert!(err.to_string().contains(ENV_TIMEOUT_SECS));

    let err = ServerConfig::from_lookup(lookup(&[(ENV_CACHE_TTL_SECS, "0")])).unwrap_err();
    assert!(matches!(err, MevzuatError::InvalidParameter { ref field, .. } if field == "cache_ttl"));
}
