pub(crate) fn now_ms() -> i64 {
    js_sys::Date::now().round() as i64
}

/// Blocking browser alert. No-op outside a window (tests).
pub(crate) fn alert(message: &str) {
    if let Some(w) = web_sys::window() {
        let _ = w.alert_with_message(message);
    }
}

/// Blocking browser confirm. Treat an unavailable window as "No".
pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// Server error messages about duplicate addresses come back in a few
/// shapes ("Email already exists", "duplicate email", ...). Match the
/// word rather than a fixed phrase.
pub(crate) fn mentions_email(message: &str) -> bool {
    message.to_ascii_lowercase().contains("email")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mentions_email_is_case_insensitive() {
        assert!(mentions_email("Email already exists"));
        assert!(mentions_email("duplicate EMAIL for client"));
        assert!(!mentions_email("company name already exists"));
    }
}
