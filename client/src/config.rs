//! Build-time client configuration.
//!
//! The bundle is static, so endpoints are baked in at compile time through
//! `DEVHIVE_API_BASE` and `DEVHIVE_WS_BASE`. Empty values mean "same origin
//! as the page".

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Backend endpoints used by `net::api` and `net::message_stream`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClientConfig {
    /// REST base URL without trailing slash; empty for same-origin.
    pub api_base: String,
    /// WebSocket base URL without trailing slash; empty to derive from the
    /// page location.
    pub ws_base: String,
}

impl ClientConfig {
    /// Configuration baked into this build.
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("DEVHIVE_API_BASE"), option_env!("DEVHIVE_WS_BASE"))
    }

    pub fn from_values(api_base: Option<&str>, ws_base: Option<&str>) -> Self {
        Self {
            api_base: normalize_base(api_base),
            ws_base: normalize_base(ws_base),
        }
    }

    /// Absolute or same-origin URL for an `/api/...` path.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.api_base)
    }

    /// WebSocket base, derived from the page URL when not configured.
    ///
    /// `page_origin` is `window.location.origin`, e.g. `https://devhive.app`.
    pub fn resolve_ws_base(&self, page_origin: &str) -> String {
        if !self.ws_base.is_empty() {
            return self.ws_base.clone();
        }
        let source = if self.api_base.is_empty() { page_origin } else { self.api_base.as_str() };
        if let Some(rest) = source.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = source.strip_prefix("http://") {
            format!("ws://{rest}")
        } else {
            format!("ws://{source}")
        }
    }
}

fn normalize_base(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().trim_end_matches('/').to_owned()
}
