//! End-to-end pipeline tests over the public provider seam: resolve,
//! rotate, format.

use std::time::{Duration, Instant};

use oledsense::core::{assign_frame_keys, format_frame, PageScheduler, SensorResolver, Settings};
use oledsense::platform::provider::{
    HardwareNode, HardwareProvider, ProviderError, SensorReading,
};

struct StaticNode {
    category: String,
    readings: Vec<SensorReading>,
    children: Vec<Box<dyn HardwareNode>>,
}

impl StaticNode {
    fn new(category: &str, readings: Vec<(&str, &str, f64)>) -> Self {
        Self {
            category: category.to_string(),
            readings: readings
                .into_iter()
                .map(|(name, ty, value)| SensorReading {
                    name: name.to_string(),
                    sensor_type: ty.to_string(),
                    value: Some(value),
                })
                .collect(),
            children: Vec::new(),
        }
    }
}

impl HardwareNode for StaticNode {
    fn name(&self) -> &str {
        &self.category
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn update(&mut self) {}

    fn sensors(&self) -> Result<Vec<SensorReading>, ProviderError> {
        Ok(self.readings.clone())
    }

    fn sub_hardware(&self) -> &[Box<dyn HardwareNode>] {
        &self.children
    }

    fn sub_hardware_mut(&mut self) -> &mut [Box<dyn HardwareNode>] {
        &mut self.children
    }
}

struct StaticProvider {
    nodes: Vec<Box<dyn HardwareNode>>,
}

impl StaticProvider {
    fn typical_machine() -> Self {
        Self {
            nodes: vec![
                Box::new(StaticNode::new(
                    "Cpu",
                    vec![
                        ("CPU Package", "Temperature", 42.7),
                        ("CPU Total", "Load", 17.3),
                    ],
                )),
                Box::new(StaticNode::new(
                    "GpuNvidia",
                    vec![("GPU Core", "Temperature", 55.0), ("GPU Core", "Load", 31.0)],
                )),
                Box::new(StaticNode::new(
                    "Memory",
                    vec![("Memory Used", "Data", 12.36)],
                )),
            ],
        }
    }
}

impl HardwareProvider for StaticProvider {
    fn is_healthy(&self) -> bool {
        true
    }

    fn hardware(&self) -> &[Box<dyn HardwareNode>] {
        &self.nodes
    }

    fn hardware_mut(&mut self) -> &mut [Box<dyn HardwareNode>] {
        &mut self.nodes
    }
}

#[test]
fn test_default_settings_render_against_a_typical_machine() {
    let settings = Settings::default();
    let pages = settings.page_set().unwrap();
    let mut provider = StaticProvider::typical_machine();
    let mut resolver = SensorResolver::new();

    // Page 1: temperatures.
    let page = pages.get(0);
    let keys = assign_frame_keys(&page.sensors);
    let values = resolver.resolve(&mut provider, &page.sensors, &keys);
    let frame = format_frame(page, &keys, &values);
    assert_eq!(frame.line1, "CPU: 43 °C");
    assert_eq!(frame.line2, "GPU: 55 °C");

    // Page 3: memory, one line configured, second renders a space.
    let page = pages.get(2);
    let keys = assign_frame_keys(&page.sensors);
    let values = resolver.resolve(&mut provider, &page.sensors, &keys);
    let frame = format_frame(page, &keys, &values);
    assert_eq!(frame.line1, "Mem: 12.4GB");
    assert_eq!(frame.line2, " ");
}

#[test]
fn test_rotation_walks_default_pages_in_order() {
    let settings = Settings::default();
    let mut scheduler = PageScheduler::new(settings.page_set().unwrap());
    let start = Instant::now();

    assert_eq!(scheduler.active_index(), 0);
    scheduler.advance_if_due(start + Duration::from_millis(5000));
    assert_eq!(scheduler.active_index(), 1);
    scheduler.advance_if_due(start + Duration::from_millis(8000));
    assert_eq!(scheduler.active_index(), 2);
    scheduler.advance_if_due(start + Duration::from_millis(11000));
    assert_eq!(scheduler.active_index(), 0);
}

#[test]
fn test_missing_gpu_degrades_to_blank_line_not_failure() {
    let settings = Settings::default();
    let pages = settings.page_set().unwrap();
    let mut provider = StaticProvider {
        nodes: vec![Box::new(StaticNode::new(
            "Cpu",
            vec![("CPU Package", "Temperature", 61.2)],
        ))],
    };
    let mut resolver = SensorResolver::new();

    let page = pages.get(0);
    let keys = assign_frame_keys(&page.sensors);
    let values = resolver.resolve(&mut provider, &page.sensors, &keys);
    let frame = format_frame(page, &keys, &values);
    assert_eq!(frame.line1, "CPU: 61 °C");
    assert_eq!(frame.line2, " ");
}
