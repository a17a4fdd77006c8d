use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use launcher_core::{color::DEFAULT_HUE_SHIFT, drag::DEFAULT_ACTIVATION_DISTANCE, SymbolCatalog};
use serde::Deserialize;
use shared::domain::DEFAULT_CATEGORY_COLOR;

pub const DEFAULT_CONFIG_FILE: &str = "launcher.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub hue_shift_degrees: f64,
    pub default_category_color: String,
    pub drag_activation_distance: f64,
    pub log_filter: String,
    pub extra_symbols: Vec<String>,
    pub symbol_aliases: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/launcher.db".into(),
            hue_shift_degrees: DEFAULT_HUE_SHIFT,
            default_category_color: DEFAULT_CATEGORY_COLOR.into(),
            drag_activation_distance: DEFAULT_ACTIVATION_DISTANCE,
            log_filter: "info".into(),
            extra_symbols: Vec::new(),
            symbol_aliases: HashMap::new(),
        }
    }
}

/// Keys accepted in the config file. Everything is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    database_url: Option<String>,
    hue_shift_degrees: Option<f64>,
    default_category_color: Option<String>,
    drag_activation_distance: Option<f64>,
    log_filter: Option<String>,
    #[serde(default)]
    extra_symbols: Vec<String>,
    #[serde(default)]
    symbol_aliases: HashMap<String, String>,
}

impl Settings {
    /// Built-in icon vocabulary plus configured names and aliases.
    pub fn symbol_catalog(&self) -> SymbolCatalog {
        let mut catalog = SymbolCatalog::builtin();
        catalog.extend_symbols(self.extra_symbols.iter().map(String::as_str));
        for (alias, target) in &self.symbol_aliases {
            catalog.insert_alias(alias, target);
        }
        catalog
    }

    fn apply_file(&mut self, file_cfg: FileConfig) {
        if let Some(v) = file_cfg.database_url {
            self.database_url = v;
        }
        if let Some(v) = file_cfg.hue_shift_degrees {
            self.hue_shift_degrees = v;
        }
        if let Some(v) = file_cfg.default_category_color {
            self.default_category_color = v;
        }
        if let Some(v) = file_cfg.drag_activation_distance {
            self.drag_activation_distance = v;
        }
        if let Some(v) = file_cfg.log_filter {
            self.log_filter = v;
        }
        self.extra_symbols.extend(file_cfg.extra_symbols);
        self.symbol_aliases.extend(file_cfg.symbol_aliases);
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("LAUNCHER_DATABASE_URL") {
            self.database_url = v;
        }
        if let Some(v) = var("APP__DATABASE_URL") {
            self.database_url = v;
        }

        if let Some(v) = var("APP__HUE_SHIFT_DEGREES") {
            if let Ok(parsed) = v.trim().parse::<f64>() {
                self.hue_shift_degrees = parsed;
            }
        }
        if let Some(v) = var("APP__DEFAULT_CATEGORY_COLOR") {
            self.default_category_color = v;
        }
        if let Some(v) = var("APP__DRAG_ACTIVATION_DISTANCE") {
            if let Ok(parsed) = v.trim().parse::<f64>() {
                self.drag_activation_distance = parsed;
            }
        }
        if let Some(v) = var("APP__LOG_FILTER") {
            self.log_filter = v;
        }
    }
}

/// Defaults, then the config file, then environment overrides. A missing
/// file is only an error when it was asked for explicitly.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    match fs::read_to_string(&path) {
        Ok(raw) => {
            let file_cfg: FileConfig = toml::from_str(&raw)
                .with_context(|| format!("invalid config file '{}'", path.display()))?;
            settings.apply_file(file_cfg);
        }
        Err(err) if required => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()));
        }
        Err(_) => {}
    }

    settings.apply_env(|key| std::env::var(key).ok());
    Ok(settings)
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}
