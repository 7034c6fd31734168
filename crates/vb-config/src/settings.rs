use std::fmt;
use std::path::PathBuf;

use anyhow::{bail, Result};
use serde_json::Value;
use vb_schemas::ImportMode;

/// Overrides `cellar_path` when set.
pub const ENV_CELLAR_PATH: &str = "VB_CELLAR_PATH";
/// Overrides `owner_id` when set.
pub const ENV_OWNER_ID: &str = "VB_OWNER_ID";

const DEFAULT_OWNER_ID: &str = "local";
const DEFAULT_CELLAR_PATH: &str = "cellar.json";

/// Configured import mode. `Auto` defers to the payload's suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModeSetting {
    #[default]
    Auto,
    Fixed(ImportMode),
}

impl ModeSetting {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(ModeSetting::Auto),
            other => ImportMode::parse(other).map(ModeSetting::Fixed),
        }
    }

    /// The mode to run with, given what the payload suggests.
    pub fn resolve(self, suggested: ImportMode) -> ImportMode {
        match self {
            ModeSetting::Auto => suggested,
            ModeSetting::Fixed(m) => m,
        }
    }
}

impl fmt::Display for ModeSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModeSetting::Auto => write!(f, "auto"),
            ModeSetting::Fixed(m) => write!(f, "{m}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VinboardConfig {
    pub owner_id: String,
    pub cellar_path: PathBuf,
    pub default_mode: ModeSetting,
    /// Pin the classification year (reproducible reports); `None` = today.
    pub now_year: Option<i32>,
}

impl Default for VinboardConfig {
    fn default() -> Self {
        Self {
            owner_id: DEFAULT_OWNER_ID.to_string(),
            cellar_path: PathBuf::from(DEFAULT_CELLAR_PATH),
            default_mode: ModeSetting::Auto,
            now_year: None,
        }
    }
}

fn opt_str<'a>(v: &'a Value, ptr: &str) -> Result<Option<&'a str>> {
    match v.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim())),
        Some(other) => bail!("CONFIG_INVALID {ptr}: expected a string, got {other}"),
    }
}

impl VinboardConfig {
    /// Typed view over a merged config document. Missing keys take defaults;
    /// present keys of the wrong shape are errors.
    pub fn from_json(v: &Value) -> Result<Self> {
        if !v.is_object() {
            bail!("CONFIG_INVALID /: config root must be a mapping");
        }
        let mut cfg = Self::default();

        if let Some(owner) = opt_str(v, "/owner_id")? {
            cfg.owner_id = owner.to_string();
        }
        if let Some(path) = opt_str(v, "/cellar_path")? {
            cfg.cellar_path = PathBuf::from(path);
        }
        if let Some(mode) = opt_str(v, "/import/default_mode")? {
            cfg.default_mode = match ModeSetting::parse(mode) {
                Some(m) => m,
                None => bail!(
                    "CONFIG_INVALID /import/default_mode: expected merge|sync|auto, got {mode:?}"
                ),
            };
        }
        match v.pointer("/status/now_year") {
            None | Some(Value::Null) => {}
            Some(Value::Number(n)) => {
                let year = n
                    .as_i64()
                    .and_then(|y| i32::try_from(y).ok())
                    .filter(|y| *y > 0);
                match year {
                    Some(y) => cfg.now_year = Some(y),
                    None => bail!("CONFIG_INVALID /status/now_year: {n} is not a year"),
                }
            }
            Some(other) => bail!("CONFIG_INVALID /status/now_year: expected a year, got {other}"),
        }

        Ok(cfg)
    }

    /// Apply environment overrides through `lookup` (normally `std::env::var`).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(p) = lookup(ENV_CELLAR_PATH).filter(|s| !s.trim().is_empty()) {
            self.cellar_path = PathBuf::from(p.trim());
        }
        if let Some(o) = lookup(ENV_OWNER_ID).filter(|s| !s.trim().is_empty()) {
            self.owner_id = o.trim().to_string();
        }
    }

    pub fn with_process_env(mut self) -> Self {
        self.apply_env(|k| std::env::var(k).ok());
        self
    }
}
