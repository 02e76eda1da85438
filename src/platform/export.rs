//! Startup sensor export, a diagnostic aid for writing page configurations.

use std::fs;
use std::path::Path;

use serde::Serialize;

use super::provider::{HardwareProvider, SensorInfo};
use crate::error::Result;

#[derive(Serialize)]
struct SensorExport {
    generated_at: chrono::DateTime<chrono::Utc>,
    sensors: Vec<SensorInfo>,
}

/// Write every discovered sensor's name/hardware/type to `path` as pretty
/// JSON. An unhealthy provider yields an empty list, not an error.
pub fn export_sensors(provider: &dyn HardwareProvider, path: &Path) -> Result<()> {
    let export = SensorExport {
        generated_at: chrono::Utc::now(),
        sensors: provider.all_sensors(),
    };
    let json = serde_json::to_string_pretty(&export)?;
    fs::write(path, json)?;
    log::info!(
        "exported {} sensors to {}",
        export.sensors.len(),
        path.display()
    );
    Ok(())
}
