use super::*;

#[test]
fn missing_values_mean_same_origin() {
    let cfg = ClientConfig::from_values(None, None);
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.api_url("/api/projects"), "/api/projects");
}

#[test]
fn trailing_slashes_and_whitespace_are_trimmed() {
    let cfg = ClientConfig::from_values(Some(" https://api.devhive.app/ "), Some("wss://rt.devhive.app//"));
    assert_eq!(cfg.api_base, "https://api.devhive.app");
    assert_eq!(cfg.ws_base, "wss://rt.devhive.app");
    assert_eq!(cfg.api_url("/api/auth/me"), "https://api.devhive.app/api/auth/me");
}

#[test]
fn ws_base_prefers_explicit_value() {
    let cfg = ClientConfig::from_values(Some("http://localhost:5000"), Some("ws://localhost:6000"));
    assert_eq!(cfg.resolve_ws_base("https://devhive.app"), "ws://localhost:6000");
}

#[test]
fn ws_base_follows_api_base_scheme() {
    let cfg = ClientConfig::from_values(Some("https://api.devhive.app"), None);
    assert_eq!(cfg.resolve_ws_base("http://ignored"), "wss://api.devhive.app");
}

#[test]
fn ws_base_falls_back_to_page_origin() {
    let cfg = ClientConfig::default();
    assert_eq!(cfg.resolve_ws_base("http://localhost:3000"), "ws://localhost:3000");
    assert_eq!(cfg.resolve_ws_base("https://devhive.app"), "wss://devhive.app");
}
