//! # confgen
//!
//! This library assembles network device configuration from layered YAML
//! variable files and a template. It is used by the `confgen` command-line
//! tool but can be driven directly from other programs.
//!
//! ## Quick Example
//!
//! ```
//! use confgen::loader::DeviceOverlays;
//! use confgen::render::{build_context, Renderer};
//!
//! let global = serde_yaml::from_str("syslog: host1").unwrap();
//! let mut overlays = DeviceOverlays::new();
//! overlays.insert(
//!     "rtr1".to_string(),
//!     serde_yaml::from_str("hostname: rtr1\ninterfaces: []").unwrap(),
//! );
//!
//! let context = build_context(Some("rtr1"), &overlays, &global).unwrap();
//!
//! let mut renderer = Renderer::new();
//! renderer
//!     .add_raw_template("all.j2", "host-name {{ hostname }}; syslog {{ syslog }};")
//!     .unwrap();
//! let text = renderer.render("all.j2", &context).unwrap();
//! assert_eq!(text, "host-name rtr1; syslog host1;");
//! ```
//!
//! ## Core Concepts
//!
//! - **Variables (`vars`)**: Every data file is one YAML mapping. Values are
//!   kept as `serde_yaml::Value` all the way into the template.
//! - **Sources (`loader`)**: Files named `<device>_device_specific.yaml`
//!   form per-device overlays; every other file feeds the global config.
//! - **Merging (`merge`)**: Combines two mappings, rejecting duplicate keys
//!   unless overrides are allowed.
//! - **VLAN maps (`vlan`)**: A VLAN-first description of access ports,
//!   pivoted into a device-first view.
//! - **Interfaces (`interface`)**: Turns one VLAN map assignment into a
//!   structured interface record through a small template.
//! - **Assembly (`assemble`)**: Loads everything and attaches VLAN map
//!   interfaces to their device overlays.
//! - **Rendering (`render`)**: Merges the device overlay over the global
//!   config and renders the main template with `tera`.
//!
//! ## Execution Flow
//!
//! [`pipeline::build`] runs the whole thing:
//!
//! 1.  **VLAN map**: Read and pivot the VLAN map, if any.
//! 2.  **Sources**: Load and classify every variable file.
//! 3.  **Interfaces**: Append VLAN map interfaces to device overlays.
//! 4.  **Context**: Merge the chosen device overlay over the global config.
//! 5.  **Render**: Render the main template with that context.

pub mod assemble;
pub mod defaults;
pub mod error;
pub mod interface;
pub mod loader;
pub mod merge;
pub mod options;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod vars;
pub mod vlan;

#[cfg(test)]
mod proptests;
