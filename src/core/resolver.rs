//! Resolves sensor selections against the live hardware tree.

use std::collections::HashMap;

use crate::core::selection::SensorSelection;
use crate::platform::provider::{HardwareNode, HardwareProvider, ProviderError};

/// Walks the provider's hardware tree once per tick and extracts the current
/// value for each selection, keyed by its context-frame key.
pub struct SensorResolver {
    unhealthy_logged: bool,
}

impl Default for SensorResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorResolver {
    pub fn new() -> Self {
        Self {
            unhealthy_logged: false,
        }
    }

    /// Resolve `selections` (with their pre-assigned `keys`, parallel by
    /// index) to current numeric values.
    ///
    /// All top-level nodes are refreshed recursively exactly once, up front;
    /// refresh is assumed expensive. Selections that match nothing are
    /// absent from the result. A provider error while scanning for one
    /// selection is logged and leaves the remaining selections unaffected.
    pub fn resolve(
        &mut self,
        provider: &mut dyn HardwareProvider,
        selections: &[SensorSelection],
        keys: &[String],
    ) -> HashMap<String, f64> {
        let mut result = HashMap::new();

        if !provider.is_healthy() {
            if !self.unhealthy_logged {
                log::warn!(
                    "hardware provider failed to initialize; no sensor values will be reported"
                );
                self.unhealthy_logged = true;
            }
            return result;
        }

        for node in provider.hardware_mut() {
            update_recursive(node.as_mut());
        }

        for (sel, key) in selections.iter().zip(keys) {
            if result.contains_key(key) {
                continue;
            }
            for node in provider.hardware() {
                if result.contains_key(key) {
                    break;
                }
                match find_sensor_recursive(node.as_ref(), sel) {
                    Ok(Some(value)) => {
                        result.insert(key.clone(), value);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        log::warn!(
                            "sensor '{}' ({}/{}) could not be read; the program may need \
                             elevated privileges: {}",
                            sel.name,
                            sel.hardware,
                            sel.sensor_type,
                            e
                        );
                    }
                }
            }
        }

        result
    }
}

fn update_recursive(node: &mut dyn HardwareNode) {
    node.update();
    for sub in node.sub_hardware_mut() {
        update_recursive(sub.as_mut());
    }
}

/// Depth-first scan for the first sensor matching the selection
/// case-insensitively with a present value.
fn find_sensor_recursive(
    node: &dyn HardwareNode,
    sel: &SensorSelection,
) -> Result<Option<f64>, ProviderError> {
    if node.category().eq_ignore_ascii_case(&sel.hardware) {
        for sensor in node.sensors()? {
            if sensor.name.eq_ignore_ascii_case(&sel.name)
                && sensor.sensor_type.eq_ignore_ascii_case(&sel.sensor_type)
            {
                if let Some(value) = sensor.value {
                    return Ok(Some(value));
                }
            }
        }
    }
    for sub in node.sub_hardware() {
        if let Some(value) = find_sensor_recursive(sub.as_ref(), sel)? {
            return Ok(Some(value));
        }
    }
    Ok(None)
}
