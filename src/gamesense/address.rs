//! Discovery of the GameSense service address from coreProps.json.
//!
//! The engine writes its current listening address to a small JSON
//! descriptor; the port changes between engine restarts, so the file is
//! re-read on every resolution and never cached.

use std::env;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use url::Url;

use crate::error::{OledSenseError, Result};

#[derive(Deserialize)]
struct CoreProps {
    #[serde(default)]
    address: String,
}

/// Probes a fixed list of descriptor locations in priority order.
#[derive(Debug, Clone)]
pub struct CorePropsLocator {
    candidates: Vec<PathBuf>,
}

impl Default for CorePropsLocator {
    fn default() -> Self {
        let program_data =
            env::var("PROGRAMDATA").unwrap_or_else(|_| r"C:\ProgramData".to_string());
        let base = PathBuf::from(program_data).join("SteelSeries");
        Self {
            candidates: vec![
                base.join("GG").join("coreProps.json"),
                base.join("SteelSeries Engine 3").join("coreProps.json"),
            ],
        }
    }
}

impl CorePropsLocator {
    /// Locator over explicit candidate paths, first existing wins.
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// The descriptor path to read: the first candidate that exists, else
    /// the last one (whose read will fail fast with a useful path in the
    /// error).
    pub fn descriptor_path(&self) -> PathBuf {
        self.candidates
            .iter()
            .find(|p| p.exists())
            .or_else(|| self.candidates.last())
            .cloned()
            .unwrap_or_default()
    }

    /// Re-read the descriptor and return the service base address,
    /// scheme-qualified and without a trailing slash.
    pub fn resolve(&self) -> Result<String> {
        let path = self.descriptor_path();
        let data = fs::read_to_string(&path).map_err(|e| {
            OledSenseError::address(format!("cannot read {}: {}", path.display(), e))
        })?;
        let props: CoreProps = serde_json::from_str(&data).map_err(|e| {
            OledSenseError::address(format!("invalid coreProps at {}: {}", path.display(), e))
        })?;
        if props.address.is_empty() {
            return Err(OledSenseError::address(format!(
                "no address field in {}",
                path.display()
            )));
        }

        let mut address = props.address;
        if !address.starts_with("http://") && !address.starts_with("https://") {
            address = format!("http://{}", address);
        }
        Url::parse(&address).map_err(|e| {
            OledSenseError::address(format!("'{}' is not an absolute URI: {}", address, e))
        })?;
        Ok(address.trim_end_matches('/').to_string())
    }
}
