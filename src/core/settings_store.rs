use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{ensure, Context};

use super::models::RuntimeSettings;

const SETTINGS_DIR: &str = "cv-ranker";
const SETTINGS_FILE: &str = "settings.json";

/// JSON-backed [`RuntimeSettings`]. A missing file means defaults.
pub struct SettingsStore {
    file_path: PathBuf,
}

impl SettingsStore {
    /// Uses `explicit` when given, otherwise the per-user config location.
    pub fn locate(explicit: Option<PathBuf>) -> Self {
        Self {
            file_path: explicit.unwrap_or_else(default_settings_path),
        }
    }

    pub async fn load(&self) -> anyhow::Result<RuntimeSettings> {
        let content = match tokio::fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(RuntimeSettings::default()),
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read settings file {}", self.file_path.display())
                })
            }
        };

        let settings = serde_json::from_str::<RuntimeSettings>(&content).with_context(|| {
            format!("invalid JSON in settings file {}", self.file_path.display())
        })?;
        validate(&settings)
            .with_context(|| format!("invalid settings in {}", self.file_path.display()))?;
        Ok(settings)
    }

    pub async fn save(&self, settings: &RuntimeSettings) -> anyhow::Result<()> {
        validate(settings)?;
        if let Some(parent) = self.file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.file_path, serde_json::to_string_pretty(settings)?).await?;
        Ok(())
    }
}

/// `<config dir>/cv-ranker/settings.json`, relative to the working directory
/// when the platform has no config dir.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(SETTINGS_DIR)
        .join(SETTINGS_FILE)
}

fn validate(settings: &RuntimeSettings) -> anyhow::Result<()> {
    ensure!(
        settings.max_concurrent_documents > 0,
        "maxConcurrentDocuments must be at least 1"
    );
    ensure!(
        settings.retry_delay_seconds.is_finite() && settings.retry_delay_seconds >= 0.0,
        "retryDelaySeconds must be a non-negative number"
    );
    ensure!(
        settings.remote_timeout_seconds > 0,
        "remoteTimeoutSeconds must be at least 1"
    );
    Ok(())
}
