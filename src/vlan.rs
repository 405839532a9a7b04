//! VLAN map loading and pivoting
//!
//! A VLAN map is written VLAN first, because that is how people think about
//! access ports:
//!
//! ```yaml
//! mapping:
//!   - name: VLAN2
//!     devices:
//!       sw1:
//!         ge-1/1/1: To bob
//!   - name: VLAN99
//!     devices:
//!       sw1:
//!         ge-1/2/2: To fred
//! ```
//!
//! Building a device needs the opposite view, device first. [`pivot`] turns
//! the map above into `sw1 -> ge-1/1/1 -> "To bob" -> VLAN2` and
//! `sw1 -> ge-1/2/2 -> "To fred" -> VLAN99`. Every (vlan, device, interface,
//! description) entry of the input shows up exactly once in the output, in
//! input order.

use std::path::Path;

use log::debug;
use serde_yaml::Value;

use crate::defaults::DEFAULT_DESCRIPTION;
use crate::error::{Error, Result};
use crate::vars::{self, scalar_text, type_name, ConfigMapping};

/// Top-level key holding the list of VLAN entries.
pub const MAPPING_KEY: &str = "mapping";

/// One description/VLAN pair assigned to an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanAssignment {
    pub description: String,
    pub vlan: String,
}

/// Everything the VLAN map assigns to one interface of a device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceAssignments {
    pub interface: String,
    pub assignments: Vec<VlanAssignment>,
}

impl InterfaceAssignments {
    /// The single assignment for this interface, if there is exactly one.
    pub fn single(&self) -> Option<&VlanAssignment> {
        match self.assignments.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// `description -> vlan` pairs joined for error messages.
    pub fn describe(&self) -> String {
        self.assignments
            .iter()
            .map(|a| format!("{} -> {}", a.description, a.vlan))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The interfaces of one device named in the VLAN map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAssignments {
    pub device: String,
    pub interfaces: Vec<InterfaceAssignments>,
}

/// A VLAN map pivoted to device -> interface -> description -> VLAN.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceVlanMap {
    devices: Vec<DeviceAssignments>,
}

impl DeviceVlanMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `vlan` carries `interface` on `device`, described as
    /// `description`. Missing intermediate levels are created.
    pub fn insert(&mut self, device: &str, interface: &str, description: &str, vlan: &str) {
        let device_pos = match self.devices.iter().position(|d| d.device == device) {
            Some(pos) => pos,
            None => {
                self.devices.push(DeviceAssignments {
                    device: device.to_string(),
                    interfaces: Vec::new(),
                });
                self.devices.len() - 1
            }
        };
        let interfaces = &mut self.devices[device_pos].interfaces;

        let interface_pos = match interfaces.iter().position(|i| i.interface == interface) {
            Some(pos) => pos,
            None => {
                interfaces.push(InterfaceAssignments {
                    interface: interface.to_string(),
                    assignments: Vec::new(),
                });
                interfaces.len() - 1
            }
        };

        interfaces[interface_pos].assignments.push(VlanAssignment {
            description: description.to_string(),
            vlan: vlan.to_string(),
        });
    }

    /// Look up the VLAN for (device, interface, description).
    pub fn get(&self, device: &str, interface: &str, description: &str) -> Option<&str> {
        self.device(device)?
            .interfaces
            .iter()
            .find(|i| i.interface == interface)?
            .assignments
            .iter()
            .find(|a| a.description == description)
            .map(|a| a.vlan.as_str())
    }

    /// Assignments for one device.
    pub fn device(&self, device: &str) -> Option<&DeviceAssignments> {
        self.devices.iter().find(|d| d.device == device)
    }

    /// Devices in the order they first appear in the VLAN map.
    pub fn devices(&self) -> &[DeviceAssignments] {
        &self.devices
    }

    /// Total number of (device, interface, description, vlan) entries.
    pub fn len(&self) -> usize {
        self.devices
            .iter()
            .flat_map(|d| &d.interfaces)
            .map(|i| i.assignments.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// Read a VLAN map file and pivot it.
pub fn load<P: AsRef<Path>>(path: P) -> Result<DeviceVlanMap> {
    let path = path.as_ref();
    let raw = vars::from_file(path)?;
    debug!("Read {} elements from {}", raw.len(), path.display());
    pivot(&raw, path)
}

/// Pivot a VLAN-first map into a [`DeviceVlanMap`].
///
/// `path` is only used to label errors.
pub fn pivot(raw: &ConfigMapping, path: &Path) -> Result<DeviceVlanMap> {
    let bad = |message: String| Error::ParseFailure {
        path: path.to_path_buf(),
        message,
    };

    let entries = raw
        .get(MAPPING_KEY)
        .ok_or_else(|| bad(format!("missing top-level '{}' key", MAPPING_KEY)))?
        .as_sequence()
        .ok_or_else(|| bad(format!("'{}' must be a list of VLAN entries", MAPPING_KEY)))?;

    let mut pivoted = DeviceVlanMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        let vlan = entry
            .get("name")
            .and_then(scalar_text)
            .ok_or_else(|| bad(format!("VLAN entry {} has no name", idx)))?;
        let devices = entry
            .get("devices")
            .and_then(Value::as_mapping)
            .ok_or_else(|| bad(format!("VLAN {} has no 'devices' mapping", vlan)))?;

        for (device, interfaces) in devices {
            let device = scalar_text(device)
                .ok_or_else(|| bad(format!("VLAN {} has a non-scalar device name", vlan)))?;
            let interfaces = interfaces.as_mapping().ok_or_else(|| {
                bad(format!(
                    "VLAN {} device {}: expected a mapping of interface to description, found {}",
                    vlan,
                    device,
                    type_name(interfaces)
                ))
            })?;

            for (interface, description) in interfaces {
                let interface = scalar_text(interface).ok_or_else(|| {
                    bad(format!(
                        "VLAN {} device {} has a non-scalar interface name",
                        vlan, device
                    ))
                })?;
                let description = match description {
                    Value::Null => DEFAULT_DESCRIPTION.to_string(),
                    other => scalar_text(other).ok_or_else(|| {
                        bad(format!(
                            "VLAN {} device {} interface {}: description must be a scalar",
                            vlan, device, interface
                        ))
                    })?,
                };
                pivoted.insert(&device, &interface, &description, &vlan);
            }
        }
    }

    debug!(
        "Pivoted {} VLAN assignments across {} devices",
        pivoted.len(),
        pivoted.devices().len()
    );
    Ok(pivoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const EXAMPLE: &str = r#"
mapping:
  - name: VLAN2
    devices:
      sw1:
        ge-1/1/1: "To bob"
  - name: VLAN99
    devices:
      sw1:
        ge-1/2/2: "To fred"
"#;

    fn pivot_str(yaml: &str) -> Result<DeviceVlanMap> {
        let raw = vars::parse_mapping(yaml, Path::new("vlans.yaml"))?;
        pivot(&raw, Path::new("vlans.yaml"))
    }

    #[test]
    fn test_pivot_example() {
        let pivoted = pivot_str(EXAMPLE).unwrap();

        assert_eq!(pivoted.devices().len(), 1);
        assert_eq!(pivoted.len(), 2);
        assert_eq!(pivoted.get("sw1", "ge-1/1/1", "To bob"), Some("VLAN2"));
        assert_eq!(pivoted.get("sw1", "ge-1/2/2", "To fred"), Some("VLAN99"));

        let sw1 = pivoted.device("sw1").unwrap();
        let names: Vec<_> = sw1.interfaces.iter().map(|i| i.interface.as_str()).collect();
        assert_eq!(names, vec!["ge-1/1/1", "ge-1/2/2"]);
    }

    #[test]
    fn test_pivot_multiple_devices_keep_order() {
        let pivoted = pivot_str(
            r#"
mapping:
  - name: USERS
    devices:
      sw2:
        eth1: desk
      sw1:
        eth1: printer
"#,
        )
        .unwrap();

        let devices: Vec<_> = pivoted.devices().iter().map(|d| d.device.as_str()).collect();
        assert_eq!(devices, vec!["sw2", "sw1"]);
        assert_eq!(pivoted.get("sw2", "eth1", "desk"), Some("USERS"));
        assert_eq!(pivoted.get("sw1", "eth1", "printer"), Some("USERS"));
    }

    #[test]
    fn test_pivot_keeps_duplicate_interface_assignments() {
        let pivoted = pivot_str(
            r#"
mapping:
  - name: VLAN2
    devices:
      sw1:
        ge-0/0/1: "To bob"
  - name: VLAN3
    devices:
      sw1:
        ge-0/0/1: "To bob"
"#,
        )
        .unwrap();

        let iface = &pivoted.device("sw1").unwrap().interfaces[0];
        assert_eq!(iface.assignments.len(), 2);
        assert!(iface.single().is_none());
        assert_eq!(iface.describe(), "To bob -> VLAN2, To bob -> VLAN3");
    }

    #[test]
    fn test_pivot_null_description_uses_default() {
        let pivoted = pivot_str("mapping:\n  - name: V10\n    devices:\n      sw1:\n        eth3:\n")
            .unwrap();
        assert_eq!(pivoted.get("sw1", "eth3", DEFAULT_DESCRIPTION), Some("V10"));
    }

    #[test]
    fn test_pivot_numeric_vlan_name() {
        let pivoted =
            pivot_str("mapping:\n  - name: 100\n    devices:\n      sw1:\n        eth1: x\n").unwrap();
        assert_eq!(pivoted.get("sw1", "eth1", "x"), Some("100"));
    }

    #[test]
    fn test_pivot_missing_mapping_key() {
        let err = pivot_str("vlans: []\n").unwrap_err();
        assert!(matches!(err, Error::ParseFailure { .. }));
        assert!(err.to_string().contains("mapping"));
    }

    #[test]
    fn test_pivot_devices_not_mapping() {
        let err = pivot_str("mapping:\n  - name: V1\n    devices: [sw1]\n").unwrap_err();
        assert!(err.to_string().contains("devices"));
    }

    #[test]
    fn test_pivot_empty_mapping_list() {
        let pivoted = pivot_str("mapping: []\n").unwrap();
        assert!(pivoted.is_empty());
        assert_eq!(pivoted.len(), 0);
    }

    #[test]
    fn test_load_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vlans.yaml");
        fs::write(&path, "").unwrap();

        let err = load(&path).unwrap_err();
        match err {
            Error::ParseFailure { path: p, .. } => assert_eq!(p, PathBuf::from(&path)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("vlans.yaml");
        fs::write(&path, EXAMPLE).unwrap();

        let pivoted = load(&path).unwrap();
        assert_eq!(pivoted.len(), 2);
    }
}
