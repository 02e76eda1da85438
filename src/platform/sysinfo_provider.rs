//! Hardware provider backed by the `sysinfo` crate.
//!
//! Exposes a small fixed tree: a Cpu node (load), a Memory node
//! (usage), and, in Full mode, a Motherboard node carrying the platform's
//! temperature components. Component access commonly needs elevated
//! privileges, so Safe mode leaves that node out entirely.

use sysinfo::{Components, CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use super::provider::{AccessMode, HardwareNode, HardwareProvider, ProviderError, SensorReading};

const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

pub struct SysinfoProvider {
    healthy: bool,
    nodes: Vec<Box<dyn HardwareNode>>,
}

impl SysinfoProvider {
    /// Open the provider. Initialization trouble degrades to an unhealthy
    /// provider rather than an error; polls then resolve nothing.
    pub fn open(mode: AccessMode) -> Self {
        let mut nodes: Vec<Box<dyn HardwareNode>> = vec![
            Box::new(CpuNode::new()),
            Box::new(MemoryNode::new()),
        ];
        if mode == AccessMode::Full {
            nodes.push(Box::new(MotherboardNode::new()));
        }
        Self {
            healthy: true,
            nodes,
        }
    }
}

impl HardwareProvider for SysinfoProvider {
    fn is_healthy(&self) -> bool {
        self.healthy
    }

    fn hardware(&self) -> &[Box<dyn HardwareNode>] {
        &self.nodes
    }

    fn hardware_mut(&mut self) -> &mut [Box<dyn HardwareNode>] {
        &mut self.nodes
    }
}

struct CpuNode {
    system: System,
}

impl CpuNode {
    fn new() -> Self {
        Self {
            system: System::new_with_specifics(
                RefreshKind::nothing().with_cpu(CpuRefreshKind::everything()),
            ),
        }
    }
}

impl HardwareNode for CpuNode {
    fn name(&self) -> &str {
        "CPU"
    }

    fn category(&self) -> &str {
        "Cpu"
    }

    fn update(&mut self) {
        self.system.refresh_cpu_usage();
    }

    fn sensors(&self) -> Result<Vec<SensorReading>, ProviderError> {
        let mut readings = vec![SensorReading {
            name: "CPU Total".to_string(),
            sensor_type: "Load".to_string(),
            value: Some(self.system.global_cpu_usage() as f64),
        }];
        for (i, cpu) in self.system.cpus().iter().enumerate() {
            readings.push(SensorReading {
                name: format!("CPU Core #{}", i + 1),
                sensor_type: "Load".to_string(),
                value: Some(cpu.cpu_usage() as f64),
            });
        }
        Ok(readings)
    }

    fn sub_hardware(&self) -> &[Box<dyn HardwareNode>] {
        &[]
    }

    fn sub_hardware_mut(&mut self) -> &mut [Box<dyn HardwareNode>] {
        &mut []
    }
}

struct MemoryNode {
    system: System,
}

impl MemoryNode {
    fn new() -> Self {
        Self {
            system: System::new_with_specifics(
                RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
            ),
        }
    }
}

impl HardwareNode for MemoryNode {
    fn name(&self) -> &str {
        "Memory"
    }

    fn category(&self) -> &str {
        "Memory"
    }

    fn update(&mut self) {
        self.system.refresh_memory();
    }

    fn sensors(&self) -> Result<Vec<SensorReading>, ProviderError> {
        let total = self.system.total_memory();
        let used = self.system.used_memory();
        let load = if total > 0 {
            Some(used as f64 / total as f64 * 100.0)
        } else {
            None
        };
        Ok(vec![
            SensorReading {
                name: "Memory Used".to_string(),
                sensor_type: "Data".to_string(),
                value: Some(used as f64 / BYTES_PER_GB),
            },
            SensorReading {
                name: "Memory Available".to_string(),
                sensor_type: "Data".to_string(),
                value: Some(self.system.available_memory() as f64 / BYTES_PER_GB),
            },
            SensorReading {
                name: "Memory".to_string(),
                sensor_type: "Load".to_string(),
                value: load,
            },
        ])
    }

    fn sub_hardware(&self) -> &[Box<dyn HardwareNode>] {
        &[]
    }

    fn sub_hardware_mut(&mut self) -> &mut [Box<dyn HardwareNode>] {
        &mut []
    }
}

/// Temperature components, grouped under one Motherboard node the way the
/// platform reports them (chipset, storage and CPU sensors all appear here
/// with their own labels).
struct MotherboardNode {
    components: Components,
}

impl MotherboardNode {
    fn new() -> Self {
        Self {
            components: Components::new_with_refreshed_list(),
        }
    }
}

impl HardwareNode for MotherboardNode {
    fn name(&self) -> &str {
        "Motherboard"
    }

    fn category(&self) -> &str {
        "Motherboard"
    }

    fn update(&mut self) {
        self.components.refresh(true);
    }

    fn sensors(&self) -> Result<Vec<SensorReading>, ProviderError> {
        Ok(self
            .components
            .iter()
            .map(|comp| SensorReading {
                name: comp.label().to_string(),
                sensor_type: "Temperature".to_string(),
                value: comp.temperature().map(|t| t as f64),
            })
            .collect())
    }

    fn sub_hardware(&self) -> &[Box<dyn HardwareNode>] {
        &[]
    }

    fn sub_hardware_mut(&mut self) -> &mut [Box<dyn HardwareNode>] {
        &mut []
    }
}
