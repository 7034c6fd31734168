//! Command handlers for the `vb` binary.
//!
//! Shared context (config, cellar path, classification year) lives here;
//! command-specific logic lives in the submodules.

pub mod cellar;
pub mod import;

use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use serde_json::Value;
use std::fs;
use tracing::warn;
use vb_config::{UnusedKeyPolicy, VinboardConfig};
use vb_store::Cellar;

/// Resolved settings for one invocation.
pub struct Ctx {
    pub cfg: VinboardConfig,
}

impl Ctx {
    /// Load layered config (if any), then apply env overrides.
    pub fn load(config_paths: &[String]) -> Result<Self> {
        let cfg = if config_paths.is_empty() {
            VinboardConfig::default()
        } else {
            let refs: Vec<&str> = config_paths.iter().map(|s| s.as_str()).collect();
            let loaded = vb_config::load_layered_yaml(&refs)?;
            let report = vb_config::report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
            for ptr in &report.unused_leaf_pointers {
                warn!(pointer = %ptr, "unused config key");
            }
            loaded.settings()?
        };
        Ok(Self {
            cfg: cfg.with_process_env(),
        })
    }

    pub fn owner(&self) -> &str {
        &self.cfg.owner_id
    }

    pub fn now_year(&self) -> i32 {
        self.cfg.now_year.unwrap_or_else(|| Utc::now().year())
    }

    pub fn open_cellar(&self) -> Result<Cellar> {
        Cellar::load(&self.cfg.cellar_path)
            .with_context(|| format!("open cellar failed: {}", self.cfg.cellar_path.display()))
    }

    pub async fn save_cellar(&self, cellar: &Cellar) -> Result<()> {
        cellar
            .save(&self.cfg.cellar_path)
            .await
            .with_context(|| format!("save cellar failed: {}", self.cfg.cellar_path.display()))
    }
}

/// Read a JSON document, tolerating a UTF-8 BOM (spreadsheet exports).
pub fn load_json_file(path: &str) -> Result<Value> {
    let bytes = fs::read(path).with_context(|| format!("read file failed: {}", path))?;
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);
    let raw = std::str::from_utf8(bytes).context("import file must be UTF-8 text")?;
    serde_json::from_str(raw.trim()).context("import file must contain valid JSON")
}

/// `-` for absent values in key=value output.
pub fn opt<T: std::fmt::Display>(v: &Option<T>) -> String {
    v.as_ref()
        .map(|x| x.to_string())
        .unwrap_or_else(|| "-".to_string())
}
