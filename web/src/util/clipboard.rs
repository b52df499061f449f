//! Clipboard writes for copy buttons.

#[cfg(test)]
#[path = "clipboard_test.rs"]
mod clipboard_test;

/// Hand `text` to the browser clipboard. Returns false when no clipboard is
/// reachable (outside the browser, or an insecure context).
pub fn copy_text(text: &str) -> bool {
    #[cfg(feature = "csr")]
    {
        let Some(window) = web_sys::window() else {
            return false;
        };
        let Some(clipboard) = window.navigator().clipboard() else {
            return false;
        };
        // The write resolves asynchronously; a rejection surfaces in the console.
        let _pending = clipboard.write_text(text);
        true
    }
    #[cfg(not(feature = "csr"))]
    {
        log::debug!("clipboard unavailable; {} bytes not copied", text.len());
        false
    }
}

/// Current page URL, for "copy link".
#[must_use]
pub fn current_href() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        web_sys::window().and_then(|window| window.location().href().ok())
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}
