use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level for the tracing filter ("info", "debug", ...).
    pub level: String,
    /// Directory for the rolling log file. Defaults to "logs".
    pub log_directory: Option<String>,
    /// Per-module overrides, e.g. `{"roadmap_catalog::api": "debug"}`.
    pub module_levels: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_directory: None,
            module_levels: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive string for `tracing_subscriber::EnvFilter`.
    pub fn filter_directive(&self) -> String {
        let mut filter = self.level.clone();
        let mut modules: Vec<_> = self.module_levels.iter().collect();
        modules.sort();
        for (module, level) in modules {
            filter.push_str(&format!(",{}={}", module, level));
        }
        filter
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Scheme and host the catalog pages are served from.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Site path of the manifest.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,
    /// Site path prefix every card links under.
    #[serde(default = "default_pages_prefix")]
    pub pages_prefix: String,
    /// Initial sort selector token: "default", "alphabetical" or "recent".
    #[serde(default = "default_sort")]
    pub default_sort: String,
    /// Overrides the platform location of the preferences file.
    pub preferences_file: Option<String>,
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_manifest_path() -> String {
    "/roadmaps/pages.json".to_string()
}

fn default_pages_prefix() -> String {
    "/roadmaps/".to_string()
}

fn default_sort() -> String {
    "default".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            manifest_path: default_manifest_path(),
            pages_prefix: default_pages_prefix(),
            default_sort: default_sort(),
            preferences_file: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        // Look for config.ron in current directory or next to executable
        let mut candidates = vec![PathBuf::from("config.ron")];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if let Some(config) = Self::load_from(&path) {
                return config;
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }

    /// Read one candidate file. Missing or unparsable files yield `None`.
    pub fn load_from(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Failed to read config at {}: {}", path.display(), e);
                return None;
            }
        };
        match ron::from_str::<AppConfig>(&content) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                Some(config)
            }
            Err(e) => {
                tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        let pretty = ron::ser::PrettyConfig::default().depth_limit(2);
        let content = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, content)?;
        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn log_directory(&self) -> &str {
        self.logging.log_directory.as_deref().unwrap_or("logs")
    }
}
