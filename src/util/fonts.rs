//! Web font loading and the persisted font preference.
//!
//! Web-safe families are assumed to be installed; everything else is pulled
//! from Google Fonts through a single stylesheet link that replaces any
//! previous one. The preference lives in `localStorage`. Outside the browser
//! every side effect is a no-op and reads return the default.

#[cfg(test)]
#[path = "fonts_test.rs"]
mod fonts_test;

pub const DEFAULT_FONT: &str = "Arial, sans-serif";
const GOOGLE_FONTS_HOST: &str = "fonts.googleapis.com";
const WEB_SAFE_FAMILIES: [&str; 5] = ["Arial", "Times New Roman", "Courier New", "Georgia", "Verdana"];
#[cfg(feature = "csr")]
const STORAGE_KEY: &str = "userFontPreference";

/// Stylesheet URL for the non-web-safe families in `fonts`.
///
/// Each entry is a CSS font stack; only its first family is requested.
/// Returns `None` when every stack is web-safe.
#[must_use]
pub fn google_fonts_href(fonts: &[&str]) -> Option<String> {
    let families: Vec<String> = fonts
        .iter()
        .filter(|stack| !WEB_SAFE_FAMILIES.iter().any(|safe| stack.contains(safe)))
        .map(|stack| primary_family(stack).replace(' ', "+"))
        .filter(|family| !family.is_empty())
        .collect();
    if families.is_empty() {
        return None;
    }
    Some(format!(
        "https://{GOOGLE_FONTS_HOST}/css2?family={}:wght@300;400;500;600;700&display=swap",
        families.join("|")
    ))
}

/// First family of a CSS font stack, trimmed.
#[must_use]
pub fn primary_family(stack: &str) -> &str {
    stack.split(',').next().unwrap_or_default().trim()
}

/// Replace any Google Fonts stylesheet with one covering `fonts`.
pub fn load_fonts(fonts: &[&str]) {
    #[cfg(feature = "csr")]
    {
        let Some(doc) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let selector = format!("link[rel=\"stylesheet\"][href*=\"{GOOGLE_FONTS_HOST}\"]");
        if let Ok(existing) = doc.query_selector_all(&selector) {
            for idx in 0..existing.length() {
                if let Some(node) = existing.item(idx) {
                    if let Some(parent) = node.parent_node() {
                        if let Err(err) = parent.remove_child(&node) {
                            log::warn!("could not remove font stylesheet: {err:?}");
                        }
                    }
                }
            }
        }
        let Some(href) = google_fonts_href(fonts) else {
            return;
        };
        let (Ok(link), Some(head)) = (doc.create_element("link"), doc.head()) else {
            log::warn!("could not create font stylesheet link");
            return;
        };
        let attached = link
            .set_attribute("rel", "stylesheet")
            .and_then(|()| link.set_attribute("href", &href))
            .and_then(|()| head.append_child(&link).map(|_| ()));
        if let Err(err) = attached {
            log::warn!("could not attach font stylesheet: {err:?}");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        log::trace!("load_fonts skipped outside the browser: {fonts:?}");
    }
}

/// Apply `font` as the document body's font family.
pub fn apply_font(font: &str) {
    #[cfg(feature = "csr")]
    {
        let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        else {
            return;
        };
        if let Err(err) = body.style().set_property("font-family", font) {
            log::warn!("could not apply font {font:?}: {err:?}");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        log::trace!("apply_font skipped outside the browser: {font}");
    }
}

/// Persist the chosen font stack.
pub fn save_font_preference(font: &str) {
    #[cfg(feature = "csr")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        if let Err(err) = storage.set_item(STORAGE_KEY, font) {
            log::warn!("could not save font preference: {err:?}");
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        log::trace!("save_font_preference skipped outside the browser: {font}");
    }
}

/// Stored font stack, or [`DEFAULT_FONT`].
pub fn font_preference() -> String {
    #[cfg(feature = "csr")]
    {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(STORAGE_KEY).ok().flatten())
            .filter(|font| !font.is_empty())
            .unwrap_or_else(|| DEFAULT_FONT.to_owned())
    }
    #[cfg(not(feature = "csr"))]
    {
        DEFAULT_FONT.to_owned()
    }
}

/// Load, apply and persist `font` in one step.
pub fn use_font(font: &str) {
    load_fonts(&[font]);
    apply_font(font);
    save_font_preference(font);
}
