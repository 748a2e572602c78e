//! Backend base-URL resolution.
//!
//! The base URL is resolved once at startup, in strict priority order:
//!
//! 1. `BACKEND_URL` baked in at compile time (trailing slashes stripped)
//! 2. [`DEV_BACKEND_URL`] in development builds
//! 3. the current page origin when running in a browser
//! 4. root-relative (`""`), so paths resolve against whatever serves the page

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Local backend used by development builds when nothing is configured.
pub const DEV_BACKEND_URL: &str = "http://localhost:3002";

/// Inputs to base-URL resolution, gathered from the build and the page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BaseUrlSources {
    pub configured: Option<String>,
    pub dev_mode: bool,
    pub page_origin: Option<String>,
}

impl BaseUrlSources {
    /// Gather sources from the compile-time environment and the window.
    #[must_use]
    pub fn detect() -> Self {
        Self {
            configured: option_env!("BACKEND_URL").map(str::to_owned),
            dev_mode: cfg!(debug_assertions),
            page_origin: page_origin(),
        }
    }
}

/// Pick the base URL from `sources`. Never ends with `/`.
#[must_use]
pub fn resolve_base_url(sources: &BaseUrlSources) -> String {
    if let Some(configured) = non_blank(sources.configured.as_deref()) {
        return strip_trailing_slashes(configured);
    }
    if sources.dev_mode {
        return DEV_BACKEND_URL.to_owned();
    }
    if let Some(origin) = non_blank(sources.page_origin.as_deref()) {
        return strip_trailing_slashes(origin);
    }
    String::new()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn strip_trailing_slashes(url: &str) -> String {
    url.trim_end_matches('/').to_owned()
}

fn page_origin() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        let window = web_sys::window()?;
        match window.location().origin() {
            Ok(origin) => Some(origin),
            Err(err) => {
                log::warn!("page origin unavailable: {err:?}");
                None
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Immutable client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
}

impl ApiConfig {
    /// Use `base_url` as-is, minus trailing slashes.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self { base_url: strip_trailing_slashes(base_url.trim()) }
    }

    #[must_use]
    pub fn from_sources(sources: &BaseUrlSources) -> Self {
        Self { base_url: resolve_base_url(sources) }
    }

    /// Resolve from the running environment.
    #[must_use]
    pub fn detect() -> Self {
        let config = Self::from_sources(&BaseUrlSources::detect());
        log::info!("api base url resolved: {:?}", config.base_url);
        config
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join an absolute endpoint path (starting with `/`) onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }
}
