//! Default values for confgen.
//!
//! This module provides centralized default values and naming conventions
//! used across the loader, assembler and renderer.

use std::path::PathBuf;

/// Directory searched for variable files when none is given.
pub const VARS_DIR: &str = "vars";

/// Directory searched first for templates.
pub const TEMPLATE_DIR: &str = ".";

/// Directory holding the platform base templates.
pub const PLATFORM_DIR: &str = "junos";

/// File stem suffix marking a device-specific variable file.
pub const DEVICE_SPECIFIC_SUFFIX: &str = "_device_specific";

/// Extensions recognised as variable files.
pub const DATA_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Extension of template files.
pub const TEMPLATE_EXTENSION: &str = "j2";

/// Description used for VLAN map interfaces that carry none.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Key in a device overlay holding the interface records.
pub const INTERFACES_KEY: &str = "interfaces";

/// Key in an interface record naming the interface.
pub const INTERFACE_NAME_KEY: &str = "interface";

/// Returns the default list of variable directories.
pub fn default_vars_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from(VARS_DIR)]
}
