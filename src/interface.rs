//! Interface records built from the VLAN map
//!
//! Each VLAN map assignment becomes one interface record by rendering a
//! small standalone template and reading the result back as YAML. The
//! template sees exactly three variables and nothing from the global or
//! device configuration:
//!
//! - `interface`: the interface name, e.g. `ge-0/0/1`
//! - `vlan_name`: the VLAN the interface is an access port in
//! - `desc`: the description from the VLAN map
//!
//! A typical template:
//!
//! ```text
//! interface: {{ interface }}
//! description: "{{ desc }}"
//! unit:
//!   - name: 0
//!     vlan: {{ vlan_name }}
//! ```

use std::path::Path;

use log::debug;
use serde_yaml::Value;
use tera::{Context, Tera};

use crate::defaults::DEFAULT_DESCRIPTION;
use crate::error::{Error, Result};
use crate::render::describe_tera_error;

/// A structured interface entry appended to a device's `interfaces` list.
pub type InterfaceRecord = Value;

/// Build one interface record from the template at `template_path`.
///
/// The template is read fresh on every call. `description` falls back to
/// "No description" when `None`.
pub fn synthesize(
    template_path: &Path,
    interface: &str,
    vlan_name: &str,
    description: Option<&str>,
) -> Result<InterfaceRecord> {
    let label = template_path.display().to_string();
    let source = std::fs::read_to_string(template_path).map_err(|e| Error::Template {
        name: label.clone(),
        message: format!("Could not read interface template: {}", e),
    })?;
    if source.trim().is_empty() {
        return Err(Error::Template {
            name: label,
            message: "Could not load interface template. Invalid template or empty file"
                .to_string(),
        });
    }

    let mut context = Context::new();
    context.insert("interface", interface);
    context.insert("vlan_name", vlan_name);
    context.insert("desc", description.unwrap_or(DEFAULT_DESCRIPTION));

    let rendered = Tera::one_off(&source, &context, false).map_err(|e| Error::Template {
        name: label.clone(),
        message: describe_tera_error(&e),
    })?;

    let record: InterfaceRecord =
        serde_yaml::from_str(&rendered).map_err(|e| Error::ParseFailure {
            path: template_path.to_path_buf(),
            message: format!("rendered interface {} is not valid YAML: {}", interface, e),
        })?;
    if record.is_null() {
        return Err(Error::ParseFailure {
            path: template_path.to_path_buf(),
            message: format!("rendered interface {} is empty", interface),
        });
    }

    debug!("Built interface {} in {} from {}", interface, vlan_name, label);
    Ok(record)
}
