//! Where golden tables live and which platform's tolerances to use.

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding the tables root.
pub const TABLES_ENV: &str = "SPECIAL_FNS_TABLES";
/// Environment variable overriding the platform tag of tolerance files.
pub const PLATFORM_ENV: &str = "SPECIAL_FNS_PLATFORM";

/// Harness configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    /// Directory holding one sub-directory of tables per function.
    pub tables_root: PathBuf,
    /// Platform tag used to pick `Err_<sig>_<platform>.json`.
    pub platform: String,
    /// Factor applied to the tolerance of rows flagged as fallback.
    pub fallback_widening: f64,
}

/// The three aligned files making up one golden table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePaths {
    pub input: PathBuf,
    pub output: PathBuf,
    pub tolerance: PathBuf,
}

/// `<os>-<arch>` of the running build.
pub fn default_platform() -> String {
    format!("{}-{}", env::consts::OS, env::consts::ARCH)
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            tables_root: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data"),
            platform: default_platform(),
            fallback_widening: 1.0,
        }
    }
}

impl HarnessConfig {
    /// Defaults, overridden by `SPECIAL_FNS_TABLES` and `SPECIAL_FNS_PLATFORM`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(root) = env::var(TABLES_ENV) {
            config.tables_root = PathBuf::from(root);
        }
        if let Ok(platform) = env::var(PLATFORM_ENV) {
            if !platform.is_empty() {
                config.platform = platform;
            }
        }
        log::debug!(
            "golden tables at {} (platform {})",
            config.tables_root.display(),
            config.platform
        );
        config
    }

    #[must_use]
    pub fn with_tables_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.tables_root = root.into();
        self
    }

    #[must_use]
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    #[must_use]
    pub fn with_fallback_widening(mut self, factor: f64) -> Self {
        self.fallback_widening = factor;
        self
    }

    /// Directory of the tables for `function`.
    pub fn table_dir(&self, function: &str) -> PathBuf {
        self.tables_root.join(function)
    }

    /// Files for `function` with type signature `signature` (e.g. `d_d-d`).
    ///
    /// The platform-specific tolerance file is preferred; if it does not
    /// exist the platform-independent `Err_<sig>.json` is used.
    pub fn paths(&self, function: &str, signature: &str) -> TablePaths {
        let dir = self.table_dir(function);
        let platform = dir.join(format!("Err_{signature}_{}.json", self.platform));
        let tolerance = if platform.is_file() {
            platform
        } else {
            dir.join(format!("Err_{signature}.json"))
        };
        TablePaths {
            input: dir.join(format!("In_{signature}.json")),
            output: dir.join(format!("Out_{signature}.json")),
            tolerance,
        }
    }
}

impl TablePaths {
    /// All three paths, in input, output, tolerance order.
    pub fn all(&self) -> [&Path; 3] {
        [&self.input, &self.output, &self.tolerance]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_independent_fallback() {
        let config = HarnessConfig::default()
            .with_tables_root("/nonexistent")
            .with_platform("plan9-mips");
        let paths = config.paths("chdtr", "d_d-d");
        assert_eq!(paths.input, PathBuf::from("/nonexistent/chdtr/In_d_d-d.json"));
        assert_eq!(paths.output, PathBuf::from("/nonexistent/chdtr/Out_d_d-d.json"));
        assert_eq!(paths.tolerance, PathBuf::from("/nonexistent/chdtr/Err_d_d-d.json"));
    }

    #[test]
    fn builder() {
        let config = HarnessConfig::default().with_fallback_widening(8.0);
        assert_eq!(config.fallback_widening, 8.0);
        assert!(config.tables_root.ends_with("tests/data"));
        assert!(config.platform.contains('-'));
    }
}
