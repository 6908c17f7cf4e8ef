//! Structured diagnostics for the encode/decode passes.
//!
//! The `log_metric!` macro renders a set of key/value pairs as one JSON-like
//! line and hands it to the `log` facade at debug level. The
//! `#[cfg(debug_assertions)]` gate compiles every call out of release builds.

/// Logs a structured key-value metric line through `log::debug!`, only in debug builds.
///
/// # Example
/// ```ignore
/// let runs = 12;
/// log_metric!("event"="encode_channel", "channel"=0, "runs"=runs);
/// ```
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!("CURVE_RLE_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}
