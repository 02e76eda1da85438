//! Frame formatting: resolved sensor values into two display lines.

use std::collections::HashMap;

use crate::core::page::OledPage;

/// Two text lines ready for transmission to the display service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub line1: String,
    pub line2: String,
}

impl Frame {
    pub fn blank() -> Self {
        Self {
            line1: " ".to_string(),
            line2: " ".to_string(),
        }
    }
}

/// Render the active page's first two selections into a frame.
///
/// `keys` is the per-page key list from
/// [`assign_frame_keys`](crate::core::selection::assign_frame_keys), parallel
/// to `page.sensors`. An unresolved selection (and a missing line) renders a
/// single space, never an empty string, so the display does not collapse the
/// line.
pub fn format_frame(page: &OledPage, keys: &[String], values: &HashMap<String, f64>) -> Frame {
    let render = |slot: usize| -> String {
        let (Some(sel), Some(key)) = (page.sensors.get(slot), keys.get(slot)) else {
            return " ".to_string();
        };
        match values.get(key) {
            Some(value) => format!(
                "{}{:.*}{}",
                sel.prefix, sel.decimal_places, value, sel.suffix
            ),
            None => " ".to_string(),
        }
    };
    Frame {
        line1: render(0),
        line2: render(1),
    }
}
