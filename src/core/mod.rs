// Core telemetry pipeline

pub mod config;
pub mod frame;
pub mod page;
pub mod resolver;
pub mod runtime;
pub mod selection;

// Re-export commonly used items
pub use config::Settings;
pub use frame::{format_frame, Frame};
pub use page::{OledPage, PageScheduler, PageSet};
pub use resolver::SensorResolver;
pub use selection::{assign_frame_keys, SensorSelection};
