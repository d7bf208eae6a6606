//! Small helpers shared by the session and the CLI.

mod text;

pub use text::strip_control_chars;

/// Whether `value` is an absolute http(s) url rather than a bare id.
pub fn is_url(value: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}
