//! Error reporting helpers.
//!
//! The layout never propagates a failure it can degrade from: a stale checkout
//! turns into a fresh one, a failed contributor lookup turns into an error
//! string on the user state. Those swallowed errors are still captured to
//! Sentry here, and user actions leave breadcrumbs so the captured events
//! show how the visitor got there.

/// Capture an error the caller recovered from.
///
/// Logs at `warn` with the Sentry event ID so log lines and events can be
/// matched up.
pub fn report_degraded<E>(context: &str, error: &E)
where
    E: std::error::Error + ?Sized,
{
    let event_id = sentry::capture_error(error);
    tracing::warn!(
        error = %error,
        sentry_event_id = %event_id,
        "{context}"
    );
}

/// Add a breadcrumb for user actions.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added variant", Some(&[("variant_id", "gid://...")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
