//! Build options shared by every stage of the pipeline.
//!
//! `BuildOptions` is built once (normally from command-line flags) and passed
//! by reference into the loader, assembler and renderer. Nothing in the
//! library reads process-wide state to decide how to behave.

use std::path::{Path, PathBuf};

use crate::defaults;
use crate::error::{Error, Result};

/// Inputs and policies for one configuration build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Directories scanned (non-recursively) for variable files, in order.
    pub source_dirs: Vec<PathBuf>,
    /// Whether later variable files may replace keys set by earlier ones.
    pub allow_override: bool,
    /// Device to build for. `None` renders with global variables only.
    pub device: Option<String>,
    /// Directory searched first for templates.
    pub template_dir: PathBuf,
    /// Directory holding platform base templates, searched second.
    pub platform_dir: PathBuf,
    /// Optional VLAN map file.
    pub vlan_map: Option<PathBuf>,
    /// Template used to build interfaces from the VLAN map.
    pub interface_template: Option<PathBuf>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            source_dirs: defaults::default_vars_dirs(),
            allow_override: false,
            device: None,
            template_dir: PathBuf::from(defaults::TEMPLATE_DIR),
            platform_dir: PathBuf::from(defaults::PLATFORM_DIR),
            vlan_map: None,
            interface_template: None,
        }
    }
}

impl BuildOptions {
    /// Check that the options are consistent with each other.
    ///
    /// A VLAN map is useless without an interface template to expand it, so
    /// supplying one without the other is a usage error.
    pub fn validate(&self) -> Result<()> {
        if self.vlan_map.is_some() && self.interface_template.is_none() {
            return Err(Error::Usage {
                message: "You must supply an interface template if you are using a vlan map"
                    .to_string(),
            });
        }
        if self.source_dirs.is_empty() {
            return Err(Error::Usage {
                message: "At least one config directory is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Reduce a device given as a path to its bare device name.
///
/// Accepts `rtr1`, `./rtr1`, `vars/rtr1` and `vars/rtr1_device_specific.yaml`,
/// all of which name the device `rtr1`.
pub fn normalize_device_name(raw: &str) -> String {
    let name = Path::new(raw)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(raw);
    let name = strip_data_extension(name);
    name.strip_suffix(defaults::DEVICE_SPECIFIC_SUFFIX)
        .unwrap_or(name)
        .to_string()
}

/// Reduce a template argument to the template file name to look up.
///
/// Tab completion often hands us `all.yaml` or `./all.j2`; all of them
/// select `all.j2`.
pub fn normalize_template_name(raw: &str) -> String {
    let stem = Path::new(raw)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(raw);
    format!("{}.{}", stem, defaults::TEMPLATE_EXTENSION)
}

fn strip_data_extension(name: &str) -> &str {
    defaults::DATA_EXTENSIONS
        .iter()
        .find_map(|ext| name.strip_suffix(&format!(".{}", ext)))
        .unwrap_or(name)
}
