//! Observability for leafdb
//!
//! Lifecycle events are typed ([`Event`]) and emitted through `tracing`
//! under the `leafdb` target. The library never installs a subscriber or
//! prints on its own; applications decide where events go.
//!
//! # Usage
//!
//! ```ignore
//! use leafdb::observability::{log_event, Event};
//!
//! log_event(Event::FileSaved, &[("path", "data.pyn"), ("bytes", "42")]);
//! ```

mod events;

pub use events::{Event, Severity};

/// Renders fields as `key=value` pairs in key order
pub fn render_fields(fields: &[(&str, &str)]) -> String {
    let mut sorted: Vec<_> = fields.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Emit an event with fields
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    let rendered = render_fields(fields);
    match event.severity() {
        Severity::Debug => {
            tracing::debug!(target: "leafdb", event = event.as_str(), "{}", rendered)
        }
        Severity::Info => {
            tracing::info!(target: "leafdb", event = event.as_str(), "{}", rendered)
        }
        Severity::Warn => {
            tracing::warn!(target: "leafdb", event = event.as_str(), "{}", rendered)
        }
    }
}
