// Platform boundary: hardware enumeration and diagnostics

pub mod export;
pub mod provider;
pub mod sysinfo_provider;

// Re-exports para imports limpios
pub use export::export_sensors;
pub use provider::{AccessMode, HardwareNode, HardwareProvider, SensorInfo, SensorReading};
pub use sysinfo_provider::SysinfoProvider;
