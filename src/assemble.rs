//! Assembly of device overlays and global configuration
//!
//! Assembly runs every step short of rendering:
//!
//! 1. Read and pivot the VLAN map, if one was given.
//! 2. Load all source directories into device overlays and global config.
//! 3. For each device in the VLAN map, build one interface record per
//!    assigned interface and append it to the device's `interfaces` list.
//!
//! VLAN map interfaces only ever extend an existing `interfaces` list in an
//! existing device file. A device without a `_device_specific` file, or one
//! whose file has no `interfaces` list, stops the build.

use std::path::Path;

use log::{debug, info};
use serde_yaml::Value;

use crate::defaults::{INTERFACES_KEY, INTERFACE_NAME_KEY};
use crate::error::{Error, Result};
use crate::interface::synthesize;
use crate::loader::{load_sources, DeviceOverlays, LoadedSources};
use crate::options::BuildOptions;
use crate::vars::type_name;
use crate::vlan::{self, DeviceVlanMap};

/// Load everything `options` points at and attach VLAN map interfaces.
pub fn assemble(options: &BuildOptions) -> Result<LoadedSources> {
    options.validate()?;

    let vlan_map = match &options.vlan_map {
        Some(path) => {
            info!("Reading VLAN map from {}", path.display());
            Some(vlan::load(path)?)
        }
        None => None,
    };

    let mut loaded = load_sources(&options.source_dirs, options.allow_override)?;
    info!(
        "Loaded {} global variables and {} device overlays",
        loaded.global.len(),
        loaded.devices.len()
    );

    if let (Some(vlan_map), Some(template)) = (&vlan_map, options.interface_template.as_deref())
    {
        attach_vlan_interfaces(&mut loaded.devices, vlan_map, template)?;
    }

    Ok(loaded)
}

/// Append one synthesized interface per VLAN map assignment to each device.
pub fn attach_vlan_interfaces(
    devices: &mut DeviceOverlays,
    vlan_map: &DeviceVlanMap,
    interface_template: &Path,
) -> Result<()> {
    for assignments in vlan_map.devices() {
        let device = assignments.device.as_str();
        let overlay = devices
            .get_mut(device)
            .ok_or_else(|| Error::MissingDeviceOverlay {
                device: device.to_string(),
            })?;
        let interfaces = overlay
            .get_mut(INTERFACES_KEY)
            .and_then(Value::as_sequence_mut)
            .ok_or_else(|| Error::MissingInterfaceField {
                device: device.to_string(),
            })?;

        for iface in &assignments.interfaces {
            for existing in interfaces.iter() {
                if declares_interface(existing, &iface.interface, device)? {
                    return Err(Error::InterfaceCollision {
                        device: device.to_string(),
                        interface: iface.interface.clone(),
                    });
                }
            }

            let assignment = iface
                .single()
                .ok_or_else(|| Error::AmbiguousVlanAssignment {
                    device: device.to_string(),
                    interface: iface.interface.clone(),
                    assignments: iface.describe(),
                })?;

            let record = synthesize(
                interface_template,
                &iface.interface,
                &assignment.vlan,
                Some(&assignment.description),
            )?;
            interfaces.push(record);
        }
        debug!(
            "Added {} VLAN map interfaces to {}",
            assignments.interfaces.len(),
            device
        );
    }
    Ok(())
}

/// Whether `record` already declares `interface`.
///
/// The check is containment, not equality: a string `interface` field
/// matches if it contains the name, a list matches if it has the name as an
/// element, and a mapping matches if it has the name as a key. This means
/// `ge-0/0/1` collides with an existing `ge-0/0/10`.
fn declares_interface(record: &Value, interface: &str, device: &str) -> Result<bool> {
    let malformed = |message: String| Error::MalformedInterface {
        device: device.to_string(),
        message,
    };

    let field = record
        .as_mapping()
        .ok_or_else(|| {
            malformed(format!(
                "expected each interface to be a mapping, found {}",
                type_name(record)
            ))
        })?
        .get(INTERFACE_NAME_KEY)
        .ok_or_else(|| {
            malformed(format!(
                "interface entry without an '{}' key",
                INTERFACE_NAME_KEY
            ))
        })?;

    Ok(match field {
        Value::String(name) => name.contains(interface),
        Value::Sequence(items) => items.iter().any(|item| item.as_str() == Some(interface)),
        Value::Mapping(map) => map.contains_key(interface),
        _ => false,
    })
}
