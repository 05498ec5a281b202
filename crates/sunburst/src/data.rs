//! Chart data documents: the item list plus its chart and style tables.

use crate::config::{ChartConfig, ChartStyle};
use crate::string_newtype;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_DATA: &str = include_str!("default_chart.toml");
pub const ENV_PREFIX: &str = "CORONA";
pub const NO_DESCRIPTION: &str = "No description available.";

string_newtype!(
    #[derive(Serialize, Deserialize)]
    #[serde(transparent)]
    pub ItemName
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: ItemName,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub icon_file: Option<String>,
}

impl Item {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: ItemName::new(name),
            description: None,
            icon_file: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(NO_DESCRIPTION)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ChartData {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub style: ChartStyle,
}

impl ChartData {
    /// Four anonymous services and the fallback palette.
    pub fn fallback() -> Self {
        Self {
            items: (1..=4).map(|i| Item::named(format!("Service {i}"))).collect(),
            chart: ChartConfig::fallback(),
            style: ChartStyle::default(),
        }
    }

    /// The bundled document with the default service offerings.
    pub fn bundled() -> Result<Self, DataError> {
        let s = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_DATA, config::FileFormat::Toml))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    pub fn find(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name.as_str() == name)
    }
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Data file not found: {0}")]
    NotFound(PathBuf),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Reads a data document, letting `CORONA_*` environment variables override scalar fields
/// (`CORONA_STYLE__INNER_RADIUS=80`).
pub fn load(path: &Path) -> Result<ChartData, DataError> {
    if !path.exists() {
        return Err(DataError::NotFound(path.to_path_buf()));
    }

    let s = config::Config::builder()
        .add_source(config::File::from(path).required(true))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Like [`load`], but never fails: any error is logged and the built-in fallback is returned.
pub fn load_or_fallback(path: &Path) -> ChartData {
    match load(path) {
        Ok(data) => {
            log::info!("Loaded {} items from {}", data.items.len(), path.display());
            data
        }
        Err(e) => {
            log::error!("Error loading chart data: {e}");
            log::warn!("Using fallback items");
            ChartData::fallback()
        }
    }
}

/// Writes the bundled document to `path` unless a file is already there.
pub fn write_default(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs::write(path, DEFAULT_DATA)?;
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Easing;

    #[test]
    fn test_bundled_document() {
        let data = ChartData::bundled().unwrap();
        assert_eq!(data.items.len(), 7);
        assert_eq!(data.items[4].name.as_str(), "Offensive Security");
        assert_eq!(
            data.items[0].icon_file.as_deref(),
            Some("cyber_strategy_executive_risk.svg")
        );
        assert_eq!(data.chart.colors.primary.len(), 5);
        assert_eq!(data.chart.colors.secondary.len(), 9);
        assert_eq!(data.style.surface_size, 600.0);
        assert_eq!(data.chart.validate(), Ok(()));
    }

    #[test]
    fn test_fallback_has_no_descriptions() {
        let data = ChartData::fallback();
        assert_eq!(data.items.len(), 4);
        assert!(data.items.iter().all(|i| i.description.is_none()));
        assert_eq!(data.items[0].description_or_default(), NO_DESCRIPTION);
        assert!(data.find("Service 3").is_some());
        assert!(data.find("Service 5").is_none());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let path = std::env::temp_dir().join("sunburst-test-does-not-exist.toml");
        assert!(matches!(load(&path), Err(DataError::NotFound(_))));
        assert_eq!(load_or_fallback(&path), ChartData::fallback());
    }

    #[test]
    fn test_write_then_load() {
        let dir = std::env::temp_dir().join(format!("sunburst-data-{}", std::process::id()));
        let path = dir.join("chart.toml");
        write_default(&path).unwrap();
        let data = load(&path).unwrap();
        assert_eq!(data.items.len(), 7);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_unknown_easing_keeps_items() {
        let dir = std::env::temp_dir().join(format!("sunburst-easing-{}", std::process::id()));
        let path = dir.join("chart.toml");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            &path,
            "[[items]]\nname = \"A\"\n\n[style]\neasing = \"cubic-bezier(0.4, 0, 0.2, 1)\"\n",
        )
        .unwrap();

        let data = load(&path).unwrap();
        assert_eq!(data.items, vec![Item::named("A")]);
        assert_eq!(data.style.easing, Easing::EaseOut);
        assert_eq!(load_or_fallback(&path).items, vec![Item::named("A")]);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_item_json_shape() {
        let item: Item = serde_json::from_str(r#"{ "name": "Offensive Security" }"#).unwrap();
        assert_eq!(item, Item::named("Offensive Security"));

        let item = Item::named("A").with_description("  ");
        assert_eq!(item.description_or_default(), NO_DESCRIPTION);
    }
}
