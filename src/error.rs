//! # Error Handling
//!
//! This module defines the single error type used by every stage of the
//! assembly pipeline. It uses the `thiserror` library to derive readable
//! messages for each failure mode.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failures the library can report. Every
//!   variant is fatal; the binary converts any of them into an `ABORT:`
//!   line on stderr and a non-zero exit status.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The variants cover:
//!
//! - Variable, VLAN map and interface files that fail to parse.
//! - Duplicate keys when overrides are not allowed.
//! - VLAN map entries pointing at devices or interfaces that cannot take them.
//! - Template loading, rendering and explicit in-template aborts.
//! - Inconsistent command-line input.
//!
//! Wrapped errors from `std::io`, `serde_yaml` and `glob` are converted with
//! `#[from]` so callers can use `?` directly.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for configuration assembly
#[derive(Error, Debug)]
pub enum Error {
    /// A data file parsed to nothing, or to something other than a mapping.
    #[error("Could not load configuration from {}: {message}", path.display())]
    ParseFailure { path: PathBuf, message: String },

    /// A variable is defined twice and overrides are not allowed.
    #[error("The variable \"{key}\" loaded from {source_label} already exists in the config data")]
    Conflict { key: String, source_label: String },

    /// A device was referenced but no `<device>_device_specific` file exists.
    #[error("Couldn't find a _device_specific file for {device}")]
    MissingDeviceOverlay { device: String },

    /// The overlay for the requested device has no variables in it.
    #[error("The device specific data for {device} is empty. Perhaps an empty file?")]
    EmptyDeviceOverlay { device: String },

    /// A device in the VLAN map has no `interfaces` sequence to extend.
    #[error("Looks like {device} had no interfaces. Refusing to continue")]
    MissingInterfaceField { device: String },

    /// An existing interface entry cannot be checked for collisions.
    #[error("Malformed interface entry on {device}: {message}")]
    MalformedInterface { device: String, message: String },

    /// The same interface is declared in a device file and in the VLAN map.
    #[error("Looks like {device} already had an interface {interface}. You cannot define it in both _device_specific and the vlan map")]
    InterfaceCollision { device: String, interface: String },

    /// More than one VLAN was mapped onto a single device interface.
    #[error("{device} had more than one VLAN defined for interface {interface} in the VLAN map ({assignments}). This is not supported")]
    AmbiguousVlanAssignment {
        device: String,
        interface: String,
        /// Human readable list of the competing `description -> vlan` pairs
        assignments: String,
    },

    /// A template called `raise(message=...)`.
    #[error("Template aborted: {message}")]
    TemplateAbort { message: String },

    /// A template could not be loaded or rendered.
    #[error("Template error for {name}: {message}")]
    Template { name: String, message: String },

    /// Required command-line inputs are missing or inconsistent.
    #[error("Usage error: {message}")]
    Usage { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML error, wrapped from `serde_yaml::Error`.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
