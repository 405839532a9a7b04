//! Merging of variable mappings
//!
//! Every place two sources of variables meet goes through [`merge`]: global
//! file into global file, device file into device file, and device overlay
//! into global variables at render time.
//!
//! The merge is shallow. A key holding a mapping or a sequence is replaced
//! wholesale, never merged recursively.

use log::debug;

use crate::error::{Error, Result};
use crate::vars::{key_display, ConfigMapping};

/// Merge `incoming` into `base`.
///
/// When `allow_override` is false, any key of `incoming` already present in
/// `base` fails the merge with [`Error::Conflict`] naming the key and
/// `source_label`; `base` is left untouched in that case. When it is true,
/// values from `incoming` replace those in `base`.
pub fn merge(
    base: &mut ConfigMapping,
    incoming: ConfigMapping,
    source_label: &str,
    allow_override: bool,
) -> Result<()> {
    if !allow_override {
        if let Some(key) = incoming.keys().find(|key| base.contains_key(*key)) {
            return Err(Error::Conflict {
                key: key_display(key),
                source_label: source_label.to_string(),
            });
        }
    }

    debug!("Merging {} variables from {}", incoming.len(), source_label);
    for (key, value) in incoming {
        let name = key_display(&key);
        if base.insert(key, value).is_some() {
            debug!("{}: overriding \"{}\"", source_label, name);
        }
    }
    Ok(())
}
