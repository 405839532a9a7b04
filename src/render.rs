//! Render context construction and template rendering
//!
//! The render context is the global configuration with the target device's
//! overlay merged on top. Device values always win over global ones, no
//! matter how source files were allowed to override each other.
//!
//! Rendering uses `tera`. Templates are looked up in the template directory
//! first and then in the platform directory, so a site can shadow any base
//! template by dropping a file with the same name next to its own.
//!
//! Templates can stop a build on purpose:
//!
//! ```text
//! {% if not syslog %}{{ raise(message="syslog server is required") }}{% endif %}
//! ```
//!
//! which surfaces as [`Error::TemplateAbort`] with the given message.
//!
//! Every `*.j2` file found is checked on its own. A file that does not parse
//! is skipped with a warning and only fails the build when it is the
//! requested template or something the requested template includes.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use log::{debug, warn};
use tera::{Context, Template, Tera, Value as TeraValue};
use walkdir::WalkDir;

use crate::defaults::TEMPLATE_EXTENSION;
use crate::error::{Error, Result};
use crate::loader::DeviceOverlays;
use crate::merge::merge;
use crate::vars::ConfigMapping;

/// Name of the template function that aborts rendering.
pub const RAISE_FUNCTION: &str = "raise";

/// Build the context for `device`, or the global context if `device` is `None`.
pub fn build_context(
    device: Option<&str>,
    overlays: &DeviceOverlays,
    global: &ConfigMapping,
) -> Result<ConfigMapping> {
    let mut context = global.clone();
    let Some(device) = device else {
        return Ok(context);
    };

    debug!("Device we are building for: {}", device);
    let overlay = overlays
        .get(device)
        .ok_or_else(|| Error::MissingDeviceOverlay {
            device: device.to_string(),
        })?;
    if overlay.is_empty() {
        return Err(Error::EmptyDeviceOverlay {
            device: device.to_string(),
        });
    }

    merge(&mut context, overlay.clone(), device, true)?;
    Ok(context)
}

/// Flatten a tera error and its sources into one line.
pub fn describe_tera_error(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

/// Template engine with the `raise` function registered
pub struct Renderer {
    tera: Tera,
    abort: Arc<Mutex<Option<String>>>,
    /// Template name -> parse error, for files that were skipped
    broken: BTreeMap<String, String>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Create a renderer with no templates loaded.
    pub fn new() -> Self {
        let abort = Arc::new(Mutex::new(None));
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);

        let slot = Arc::clone(&abort);
        tera.register_function(
            RAISE_FUNCTION,
            move |args: &HashMap<String, TeraValue>| -> tera::Result<TeraValue> {
                let message = match args.get("message") {
                    Some(TeraValue::String(s)) => s.clone(),
                    Some(other) => other.to_string(),
                    None => {
                        return Err(tera::Error::msg(
                            "raise() requires a `message` argument",
                        ))
                    }
                };
                if let Ok(mut pending) = slot.lock() {
                    *pending = Some(message.clone());
                }
                Err(tera::Error::msg(message))
            },
        );

        Self {
            tera,
            abort,
            broken: BTreeMap::new(),
        }
    }

    /// Load every template under `template_dir` and `platform_dir`.
    ///
    /// Both directories are walked recursively and templates are named by
    /// their path relative to the directory they were found in. Where both
    /// directories hold a template of the same name, the one from
    /// `template_dir` is used.
    pub fn from_dirs(template_dir: &Path, platform_dir: &Path) -> Result<Self> {
        let mut found = BTreeMap::new();
        for dir in [resolve_platform_dir(platform_dir), template_dir.to_path_buf()] {
            collect_templates(&dir, &mut found)?;
        }
        debug!("Found {} templates", found.len());

        let mut renderer = Self::new();
        let mut sources = Vec::with_capacity(found.len());
        for (name, path) in found {
            match check_template(&name, &path) {
                Ok(source) => sources.push((name, source)),
                Err(message) => {
                    warn!("Skipping template {}: {}", path.display(), message);
                    renderer.broken.insert(name, message);
                }
            }
        }

        renderer
            .tera
            .add_raw_templates(sources)
            .map_err(|e| Error::Template {
                name: template_dir.display().to_string(),
                message: describe_tera_error(&e),
            })?;
        Ok(renderer)
    }

    /// Register a template from a string.
    pub fn add_raw_template(&mut self, name: &str, content: &str) -> Result<()> {
        self.tera
            .add_raw_template(name, content)
            .map_err(|e| Error::Template {
                name: name.to_string(),
                message: describe_tera_error(&e),
            })
    }

    /// Whether a template called `name` is loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Render template `name` with `context` as its variables.
    pub fn render(&self, name: &str, context: &ConfigMapping) -> Result<String> {
        if let Some(message) = self.broken.get(name) {
            return Err(Error::Template {
                name: name.to_string(),
                message: message.clone(),
            });
        }
        if !self.has_template(name) {
            return Err(Error::Template {
                name: name.to_string(),
                message: "template not found".to_string(),
            });
        }

        let context = Context::from_serialize(context).map_err(|e| Error::Template {
            name: name.to_string(),
            message: describe_tera_error(&e),
        })?;

        self.take_abort();
        self.tera.render(name, &context).map_err(|e| {
            if let Some(message) = self.take_abort() {
                return Error::TemplateAbort { message };
            }
            let message = describe_tera_error(&e);
            match self.broken_reference(&message) {
                Some((broken, cause)) => Error::Template {
                    name: broken.clone(),
                    message: cause.clone(),
                },
                None => Error::Template {
                    name: name.to_string(),
                    message,
                },
            }
        })
    }

    /// A skipped template named in a render error, with its parse error.
    fn broken_reference(&self, message: &str) -> Option<(&String, &String)> {
        self.broken
            .iter()
            .find(|(broken, _)| message.contains(&format!("'{}'", broken)))
    }

    fn take_abort(&self) -> Option<String> {
        self.abort.lock().ok().and_then(|mut pending| pending.take())
    }
}

/// Resolve a relative platform directory that is not under the working
/// directory against the directory of the running executable.
fn resolve_platform_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() || dir.is_dir() {
        return dir.to_path_buf();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|parent| parent.join(dir)))
        .filter(|candidate| candidate.is_dir())
        .unwrap_or_else(|| dir.to_path_buf())
}

fn collect_templates(dir: &Path, found: &mut BTreeMap<String, PathBuf>) -> Result<()> {
    if !dir.is_dir() {
        debug!("Template directory {} does not exist, skipping", dir.display());
        return Ok(());
    }

    let walker = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));
    for entry in walker {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXTENSION)
        {
            continue;
        }
        let Ok(relative) = path.strip_prefix(dir) else {
            continue;
        };
        let name = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        found.insert(name, path.to_path_buf());
    }
    Ok(())
}

/// Read and parse one template in isolation, returning its source.
fn check_template(name: &str, path: &Path) -> std::result::Result<String, String> {
    let source = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    Template::new(name, Some(path.display().to_string()), &source)
        .map_err(|e| describe_tera_error(&e))?;
    Ok(source)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().is_some_and(|n| n.starts_with('.'))
}
