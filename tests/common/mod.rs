//! Shared test utilities for CLI end-to-end tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_var("global.yaml", "syslog: host1\n");
//!     fixture.command().arg("all").assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::vars;
    pub use super::TestFixture;
}

/// Common variable and template snippets for testing.
#[allow(dead_code)]
pub mod vars {
    /// Global variables shared by every device.
    pub const GLOBAL: &str = "syslog: host1\n";

    /// Device file for rtr1 with no interfaces yet.
    pub const RTR1: &str = "hostname: rtr1\ninterfaces: []\n";

    /// Main template printing the hostname and syslog server.
    pub const ALL_TEMPLATE: &str = "host-name {{ hostname }};\nsyslog {{ syslog }};";

    /// Interface template used with VLAN maps.
    pub const INTERFACE_TEMPLATE: &str = r#"interface: {{ interface }}
description: "{{ desc }}"
vlan: {{ vlan_name }}
"#;

    /// VLAN map putting two access ports on sw1.
    pub const VLAN_MAP: &str = r#"
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
}

/// A test fixture that provides a temporary working directory with a
/// `vars/` directory for variable files.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_var("global.yaml", vars::GLOBAL)
///     .with_file("all.j2", vars::ALL_TEMPLATE);
///
/// fixture.command().arg("all").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty `vars/` directory.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("vars")
            .create_dir_all()
            .expect("Failed to create vars directory");
        Self { temp_dir }
    }

    /// Add a variable file under `vars/`.
    pub fn with_var(self, name: &str, content: &str) -> Self {
        self.with_file(&format!("vars/{}", name), content)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a command configured to run in this fixture's directory.
    ///
    /// Environment variables that would change the build are cleared so the
    /// host environment cannot leak into tests.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("confgen");
        cmd.current_dir(self.path())
            .env_remove("RUST_LOG")
            .env_remove("CONFGEN_CONFIG_DIRS")
            .env_remove("CONFGEN_DEVICE")
            .env_remove("CONFGEN_TEMPLATES")
            .env_remove("CONFGEN_PLATFORM")
            .env_remove("CONFGEN_VLAN_MAP")
            .env_remove("CONFGEN_INTERFACE_TEMPLATE")
            .env_remove("CONFGEN_ALLOW_OVERRIDE");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
