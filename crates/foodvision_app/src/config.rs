use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use foodvision_engine::ClientSettings;
use foodvision_logging::fv_info;

pub(crate) const DEFAULT_CONFIG_FILENAME: &str = "foodvision.ron";

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Clone, Default)]
pub(crate) struct SettingsOverrides {
    pub upload_url: Option<String>,
    pub status_url: Option<String>,
    pub enrichment_url: Option<String>,
    pub enrichment_api_key: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub max_poll_attempts: Option<u32>,
    pub unbounded_polling: bool,
}

impl SettingsOverrides {
    pub(crate) fn apply(self, mut settings: ClientSettings) -> ClientSettings {
        if let Some(url) = self.upload_url {
            settings.upload_url = url;
        }
        if let Some(url) = self.status_url {
            settings.status_url = url;
        }
        if let Some(url) = self.enrichment_url {
            settings.enrichment_url = url;
        }
        if let Some(key) = self.enrichment_api_key {
            settings.enrichment_api_key = Some(key);
        }
        if let Some(interval) = self.poll_interval_ms {
            settings.poll_interval_ms = interval;
        }
        if let Some(max) = self.max_poll_attempts {
            settings.max_poll_attempts = Some(max);
        }
        if self.unbounded_polling {
            settings.max_poll_attempts = None;
        }
        settings
    }
}

/// Load client settings.
///
/// With no explicit path, `./foodvision.ron` is used when present and the
/// built-in defaults otherwise. An explicit path must exist and parse.
pub(crate) fn load_settings(explicit: Option<&Path>) -> anyhow::Result<ClientSettings> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_FILENAME),
    };

    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound && explicit.is_none() => {
            fv_info!("No settings file at {:?}; using defaults", path);
            return Ok(ClientSettings::default());
        }
        Err(err) => {
            return Err(err).with_context(|| format!("failed to read settings from {:?}", path));
        }
    };

    let settings: ClientSettings = ron::from_str(&content)
        .with_context(|| format!("failed to parse settings from {:?}", path))?;
    fv_info!("Loaded settings from {:?}", path);
    Ok(settings)
}

/// Write `settings` as pretty RON. Refuses to replace an existing file.
pub(crate) fn write_settings(path: &Path, settings: &ClientSettings) -> anyhow::Result<()> {
    if path.exists() {
        bail!("refusing to overwrite existing settings file {:?}", path);
    }
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(settings, pretty)
        .context("failed to serialize settings")?;
    fs::write(path, content)
        .with_context(|| format!("failed to write settings to {:?}", path))?;
    fv_info!("Wrote settings to {:?}", path);
    Ok(())
}
