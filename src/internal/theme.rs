use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use strum_macros::{Display, EnumString};
use tracing::{info, warn};

/// Preference key under which the theme is stored.
pub const THEME_KEY: &str = "theme";

/// Light/dark display preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(&self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Glyph shown on the theme toggle: the theme a press switches to.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Light => "☾",
            Self::Dark => "☀",
        }
    }
}

/// Key-value storage for user preferences.
pub trait PreferenceStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Session-only preferences. Used in tests and whenever the file store is
/// unavailable.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    /// Resolve `<config_dir>/roadmap-catalog/preferences.json`.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("roadmap-catalog");
        Ok(config_dir.join("preferences.json"))
    }

    /// Open the store, creating the parent directory when needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
            && !dir.exists()
        {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create preferences directory {}", dir.display())
            })?;
            info!(dir = %dir.display(), "Created preferences directory");
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read preferences {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse preferences {}", self.path.display()))
    }
}

impl PreferenceStore for FilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self.read_all()?;
        Ok(values
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking the write.
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), Value::String(value.to_string()));
        let content =
            serde_json::to_string_pretty(&values).context("Failed to serialize preferences")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write preferences {}", self.path.display()))?;
        Ok(())
    }
}

/// Two-state theme machine backed by a preference store.
///
/// Storage errors never escape: a failed read falls back to [`Theme::Light`],
/// a failed write swaps the store for an in-memory one so the rest of the
/// session keeps working.
pub struct ThemeController {
    theme: Theme,
    store: Box<dyn PreferenceStore>,
    persistent: bool,
}

impl ThemeController {
    pub fn init(store: Box<dyn PreferenceStore>) -> Self {
        let theme = match store.get(THEME_KEY) {
            Ok(Some(raw)) => Theme::from_str(raw.trim()).unwrap_or_else(|_| {
                warn!(value = %raw, "Ignoring unknown persisted theme");
                Theme::default()
            }),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read theme preference");
                Theme::default()
            }
        };
        info!(%theme, "Theme initialized");
        Self {
            theme,
            store,
            persistent: true,
        }
    }

    /// Controller without any backing file.
    pub fn in_memory() -> Self {
        let mut controller = Self::init(Box::new(MemoryPreferences::new()));
        controller.persistent = false;
        controller
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn icon(&self) -> &'static str {
        self.theme.icon()
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Value currently held by the backing store, if any.
    pub fn persisted(&self) -> Option<Theme> {
        self.store
            .get(THEME_KEY)
            .ok()
            .flatten()
            .and_then(|raw| Theme::from_str(&raw).ok())
    }

    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        if let Err(e) = self.store.set(THEME_KEY, &self.theme.to_string()) {
            warn!(error = %e, "Failed to persist theme; keeping it for this session only");
            let mut memory = MemoryPreferences::new();
            let _ = memory.set(THEME_KEY, &self.theme.to_string());
            self.store = Box::new(memory);
            self.persistent = false;
        }
        info!(theme = %self.theme, "Theme toggled");
        self.theme
    }
}
