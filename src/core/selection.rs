//! Sensor selections and context-frame key assignment.
//!
//! A selection names one sensor by (name, hardware, type), matched
//! case-insensitively against whatever the hardware provider reports, plus
//! the formatting used when the reading is rendered on a display line.

use serde::{Deserialize, Serialize};

/// One configured sensor to read and how to render it.
///
/// Selections are immutable configuration; duplicate disambiguation lives in
/// [`assign_frame_keys`], not on the selection itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSelection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hardware: String,
    #[serde(default, rename = "type")]
    pub sensor_type: String,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default = "default_decimal_places")]
    pub decimal_places: usize,
}

fn default_decimal_places() -> usize {
    1
}

impl SensorSelection {
    pub fn new(name: &str, hardware: &str, sensor_type: &str) -> Self {
        Self {
            name: name.to_string(),
            hardware: hardware.to_string(),
            sensor_type: sensor_type.to_string(),
            prefix: String::new(),
            suffix: String::new(),
            decimal_places: 1,
        }
    }

    pub fn with_format(mut self, prefix: &str, suffix: &str, decimal_places: usize) -> Self {
        self.prefix = prefix.to_string();
        self.suffix = suffix.to_string();
        self.decimal_places = decimal_places;
        self
    }

    /// Normalized base key: `name_hardware_type` lowercased, with spaces and
    /// hyphens folded to underscores. All-empty fields collapse to `dummy`.
    fn base_key(&self) -> String {
        if self.name.trim().is_empty()
            && self.hardware.trim().is_empty()
            && self.sensor_type.trim().is_empty()
        {
            return "dummy".to_string();
        }
        format!("{}_{}_{}", self.name, self.hardware, self.sensor_type)
            .to_lowercase()
            .replace([' ', '-'], "_")
    }

    /// The key this selection occupies in a resolved value map.
    ///
    /// `instance` disambiguates repeated (name, hardware, type) tuples: the
    /// suffix is appended for instances past the first. The `dummy` key
    /// always carries its instance so placeholder slots never collide.
    pub fn context_frame_key(&self, instance: u32) -> String {
        let base = self.base_key();
        if base == "dummy" || instance > 1 {
            format!("{}_{}", base, instance)
        } else {
            base
        }
    }
}

/// Assign disambiguation instances for one pool of selections resolved
/// together, returning the context-frame key for each in input order.
///
/// The first occurrence of a base key gets instance 1, the next 2, and so
/// on. Pure function of the input sequence: the same selections in the same
/// order always yield the same keys.
pub fn assign_frame_keys(selections: &[SensorSelection]) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, u32> = std::collections::HashMap::new();
    selections
        .iter()
        .map(|sel| {
            let base = sel.base_key();
            let instance = seen.entry(base).and_modify(|n| *n += 1).or_insert(1);
            sel.context_frame_key(*instance)
        })
        .collect()
}
