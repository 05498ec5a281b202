use crate::events::AppEvent;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use sunburst::data::{self, ChartData, DataError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error(transparent)]
    Data(#[from] DataError),
}

pub fn get_data_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "corona").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("chart.toml"))
}

pub fn load_data() -> Result<ChartData, ConfigError> {
    Ok(data::load(&get_data_path()?)?)
}

/// Loads the user's chart, writing the bundled one first if there is none yet.
pub fn load_or_setup() -> ChartData {
    let path = match get_data_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("{e}, using fallback items");
            return ChartData::fallback();
        }
    };

    if !path.exists() {
        match data::write_default(&path) {
            Ok(p) => log::info!("Wrote default chart to {}", p.display()),
            Err(e) => log::warn!("Could not write default chart: {e}"),
        }
    }

    data::load_or_fallback(&path)
}

/// Whether a watcher event concerns the data file.
fn touches(event: &Event, path: &Path) -> bool {
    let meaningful_event = matches!(
        event.kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    );
    meaningful_event && event.paths.iter().any(|p| p == path)
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let data_path = match get_data_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Data watcher error: {}", e);
            return;
        }
    };
    let data_dir = match data_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&data_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&data_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }
    log::debug!("Watching {}", data_path.display());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if touches(&event, &data_path) && tx.send(AppEvent::DataReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    #[test]
    fn test_only_data_file_changes_trigger_reload() {
        let path = PathBuf::from("/tmp/corona/chart.toml");
        let cases = vec![
            (Event::new(EventKind::Modify(ModifyKind::Any)).add_path(path.clone()), true),
            (Event::new(EventKind::Create(CreateKind::File)).add_path(path.clone()), true),
            (Event::new(EventKind::Access(AccessKind::Any)).add_path(path.clone()), false),
            (
                Event::new(EventKind::Modify(ModifyKind::Any))
                    .add_path(PathBuf::from("/tmp/corona/other.toml")),
                false,
            ),
        ];

        for (event, expected) in cases {
            assert_eq!(touches(&event, &path), expected, "{event:?}");
        }
    }

    #[test]
    fn test_data_path_file_name() {
        if let Ok(path) = get_data_path() {
            assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("chart.toml"));
        }
    }
}
