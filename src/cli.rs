//! CLI argument parsing and dispatch

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use confgen::defaults;
use confgen::options::{normalize_device_name, BuildOptions};
use confgen::output::{self, OutputConfig};
use confgen::pipeline;

const LONG_ABOUT: &str = "\
Build device configuration from YAML variables and templates.

All *.yaml files in the config directories are combined into one set of
variables. Files called <device>_device_specific.yaml are the exception: they
only apply to <device>, and only when building for it with --router.

Example:
    confgen -r rtr1 all.j2
      Reads ./vars/*.yaml plus rtr1_device_specific.yaml and renders all.j2
      with the result.";

/// confgen - Build device configuration from layered variables
#[derive(Parser, Debug)]
#[command(name = "confgen")]
#[command(version, about, long_about = LONG_ABOUT)]
pub struct Cli {
    /// Main template to render, e.g. all.j2
    #[arg(value_name = "TEMPLATE")]
    template: String,

    /// Directory containing config variables (.yaml files). Can be repeated.
    #[arg(
        short = 'c',
        long = "config-dir",
        value_name = "DIR",
        env = "CONFGEN_CONFIG_DIRS",
        value_delimiter = ','
    )]
    config_dirs: Vec<PathBuf>,

    /// Make config for this specific device
    #[arg(
        short = 'r',
        long = "router",
        visible_alias = "device",
        value_name = "DEVICE",
        env = "CONFGEN_DEVICE"
    )]
    device: Option<String>,

    /// Directory containing templates
    #[arg(
        short = 't',
        long = "templates",
        value_name = "DIR",
        env = "CONFGEN_TEMPLATES",
        default_value = defaults::TEMPLATE_DIR
    )]
    template_dir: PathBuf,

    /// Directory containing base templates for the platform
    #[arg(
        short = 'p',
        long = "platform",
        value_name = "DIR",
        env = "CONFGEN_PLATFORM",
        default_value = defaults::PLATFORM_DIR
    )]
    platform_dir: PathBuf,

    /// File containing the VLAN map
    #[arg(short = 'm', long = "map", value_name = "FILE", env = "CONFGEN_VLAN_MAP")]
    vlan_map: Option<PathBuf>,

    /// File containing the interface template. Required with --map.
    #[arg(
        short = 'i',
        long = "interface-template",
        value_name = "FILE",
        env = "CONFGEN_INTERFACE_TEMPLATE"
    )]
    interface_template: Option<PathBuf>,

    /// Allow variables from later files to override earlier ones
    #[arg(short = 'O', long = "allow-override", env = "CONFGEN_ALLOW_OVERRIDE")]
    allow_override: bool,

    /// Print the assembled variables as YAML instead of rendering
    #[arg(long)]
    dump_context: bool,

    /// Be more verbose in output (log level info)
    #[arg(short, long)]
    verbose: bool,

    /// Debug output (log level debug)
    #[arg(short, long)]
    debug: bool,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: LevelFilter,

    /// Colorize log output (always, never, auto)
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    color: String,
}

impl Cli {
    /// Turn the parsed flags into build options.
    pub fn build_options(&self) -> BuildOptions {
        let source_dirs = if self.config_dirs.is_empty() {
            defaults::default_vars_dirs()
        } else {
            self.config_dirs.clone()
        };

        BuildOptions {
            source_dirs,
            allow_override: self.allow_override,
            device: self
                .device
                .as_deref()
                .filter(|d| !d.is_empty())
                .map(normalize_device_name),
            template_dir: self.template_dir.clone(),
            platform_dir: self.platform_dir.clone(),
            vlan_map: self.vlan_map.clone(),
            interface_template: self.interface_template.clone(),
        }
    }

    /// Execute the build
    pub fn execute(self) -> Result<()> {
        let output_config = OutputConfig::from_env_and_flag(&self.color);
        output::init_logging(
            output::effective_level(self.log_level, self.verbose, self.debug),
            &output_config,
        );

        let options = self.build_options();
        options.validate()?;
        log::debug!("Build options: {:?}", options);

        let text = if self.dump_context {
            let context = pipeline::render_context(&options)?;
            serde_yaml::to_string(&context).context("Failed to serialize the render context")?
        } else {
            pipeline::build(&options, &self.template)?
        };

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text).context("Failed to write output")?;
        Ok(())
    }
}
