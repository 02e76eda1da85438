//! Hardware provider boundary.
//!
//! The enumeration library behind this seam is treated as a capability: a
//! forest of hardware nodes, each with its own sensors and optional
//! sub-hardware, plus an update operation that refreshes readings. This is
//! the only polymorphic seam in the pipeline.

use serde::Serialize;
use thiserror::Error;

/// Error raised by a provider while reading sensors, e.g. a privilege gate.
#[derive(Error, Debug)]
#[error("{0}")]
pub struct ProviderError(pub String);

impl ProviderError {
    pub fn new<S: Into<String>>(msg: S) -> Self {
        ProviderError(msg.into())
    }
}

/// One sensor reading as reported by a hardware node.
#[derive(Debug, Clone)]
pub struct SensorReading {
    pub name: String,
    pub sensor_type: String,
    pub value: Option<f64>,
}

/// Identity of a discovered sensor, for the startup export file.
#[derive(Debug, Clone, Serialize)]
pub struct SensorInfo {
    pub name: String,
    pub hardware: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
}

/// Access mode for opening the provider.
///
/// Safe mode disables sensor categories that require elevated or
/// kernel-level drivers, trading coverage for the ability to run
/// unprivileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Full,
    Safe,
}

/// A node in the hardware tree: a component with sensors and optional
/// sub-hardware.
pub trait HardwareNode {
    fn name(&self) -> &str;

    /// Hardware-category label, matched case-insensitively against
    /// selections ("Cpu", "Memory", "Motherboard", ...).
    fn category(&self) -> &str;

    /// Refresh this node's own readings. Does not recurse.
    fn update(&mut self);

    /// Current readings. Fails when the OS denies access to the underlying
    /// sensor source; callers treat that as "no value", not as fatal.
    fn sensors(&self) -> Result<Vec<SensorReading>, ProviderError>;

    fn sub_hardware(&self) -> &[Box<dyn HardwareNode>];

    fn sub_hardware_mut(&mut self) -> &mut [Box<dyn HardwareNode>];
}

/// The hardware enumeration capability.
pub trait HardwareProvider {
    /// False when the provider failed to open; the pipeline then degrades to
    /// "no sensors available" instead of crashing.
    fn is_healthy(&self) -> bool;

    fn hardware(&self) -> &[Box<dyn HardwareNode>];

    fn hardware_mut(&mut self) -> &mut [Box<dyn HardwareNode>];

    /// Every discovered sensor, walked depth-first. Empty when unhealthy.
    fn all_sensors(&self) -> Vec<SensorInfo> {
        let mut out = Vec::new();
        if !self.is_healthy() {
            return out;
        }
        for node in self.hardware() {
            collect_sensors(node.as_ref(), &mut out);
        }
        out
    }
}

fn collect_sensors(node: &dyn HardwareNode, out: &mut Vec<SensorInfo>) {
    if let Ok(readings) = node.sensors() {
        for reading in readings {
            out.push(SensorInfo {
                name: reading.name,
                hardware: node.category().to_string(),
                sensor_type: reading.sensor_type,
            });
        }
    }
    for sub in node.sub_hardware() {
        collect_sensors(sub.as_ref(), out);
    }
}
