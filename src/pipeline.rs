//! End-to-end build of one device configuration
//!
//! This module coordinates the stages to provide a small API for the binary:
//!
//! 1. Assemble device overlays and global config (VLAN map included)
//! 2. Build the render context for the requested device
//! 3. Load templates and render the main template

use log::info;

use crate::assemble::assemble;
use crate::error::Result;
use crate::options::{normalize_template_name, BuildOptions};
use crate::render::{build_context, Renderer};
use crate::vars::ConfigMapping;

/// Assemble the variables the main template will see.
pub fn render_context(options: &BuildOptions) -> Result<ConfigMapping> {
    let loaded = assemble(options)?;
    build_context(options.device.as_deref(), &loaded.devices, &loaded.global)
}

/// Build the configuration text for `options.device` from `template`.
///
/// `template` may be given with or without an extension; see
/// [`normalize_template_name`].
pub fn build(options: &BuildOptions, template: &str) -> Result<String> {
    let context = render_context(options)?;

    let name = normalize_template_name(template);
    info!(
        "Rendering {} from {} and {}",
        name,
        options.template_dir.display(),
        options.platform_dir.display()
    );
    let renderer = Renderer::from_dirs(&options.template_dir, &options.platform_dir)?;
    renderer.render(&name, &context)
}
