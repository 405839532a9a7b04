//! Discovery and classification of variable files
//!
//! Every `*.yaml` (or `*.yml`) file directly inside a source directory is
//! read as a mapping of variables. Files named `<device>_device_specific.yaml`
//! only apply to `<device>` and accumulate into that device's overlay; all
//! other files accumulate into the shared global configuration.
//!
//! Files are visited directory by directory, in the order the directories
//! are given, and alphabetically within a directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::{debug, warn};

use crate::defaults::{DATA_EXTENSIONS, DEVICE_SPECIFIC_SUFFIX};
use crate::error::Result;
use crate::merge::merge;
use crate::vars::{self, ConfigMapping};

/// Device name -> overlay of device-specific variables.
pub type DeviceOverlays = BTreeMap<String, ConfigMapping>;

/// How a variable file applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Shared by every device.
    Global,
    /// Only applies to the named device.
    Device(String),
}

/// Everything read from the source directories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedSources {
    pub devices: DeviceOverlays,
    pub global: ConfigMapping,
}

/// Classify a variable file by its name.
pub fn classify(path: &Path) -> SourceKind {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    match stem.strip_suffix(DEVICE_SPECIFIC_SUFFIX) {
        Some(device) if !device.is_empty() => SourceKind::Device(device.to_string()),
        _ => SourceKind::Global,
    }
}

/// List the variable files directly inside `dir`, sorted by path.
pub fn discover(dir: &Path) -> Result<Vec<PathBuf>> {
    let escaped = Pattern::escape(&dir.to_string_lossy());
    let mut files = Vec::new();
    for ext in DATA_EXTENSIONS {
        for entry in glob::glob(&format!("{}/*.{}", escaped, ext))? {
            let path = entry.map_err(glob::GlobError::into_error)?;
            if path.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

/// Read every variable file in `dirs` into device overlays and global config.
///
/// Duplicate keys across files of the same kind (two global files, or two
/// files for the same device) are an error unless `allow_override` is set,
/// in which case the later file wins.
pub fn load_sources(dirs: &[PathBuf], allow_override: bool) -> Result<LoadedSources> {
    let mut loaded = LoadedSources::default();

    for dir in dirs {
        if !dir.is_dir() {
            warn!("Config directory {} does not exist, skipping", dir.display());
            continue;
        }

        for path in discover(dir)? {
            let new = vars::from_file(&path)?;
            debug!("Read {} elements from {}", new.len(), path.display());
            let label = path.display().to_string();

            match classify(&path) {
                SourceKind::Device(device) => match loaded.devices.get_mut(&device) {
                    Some(overlay) => merge(overlay, new, &label, allow_override)?,
                    None => {
                        debug!("Found device specific variables for {}", device);
                        loaded.devices.insert(device, new);
                    }
                },
                SourceKind::Global => merge(&mut loaded.global, new, &label, allow_override)?,
            }
        }
    }

    Ok(loaded)
}
