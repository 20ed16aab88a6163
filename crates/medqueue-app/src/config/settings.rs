//! Loading and initialising `.medqueue/config.toml`

use std::path::{Path, PathBuf};

use medqueue_core::prelude::*;

use super::types::Settings;

pub const CONFIG_DIR: &str = ".medqueue";
pub const CONFIG_FILENAME: &str = "config.toml";

/// Default config location under `base`
pub fn config_path(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR).join(CONFIG_FILENAME)
}

/// Load settings from `<base>/.medqueue/config.toml`
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(base: &Path) -> Settings {
    load_settings_from(&config_path(base))
}

/// Load settings from an explicit file path
pub fn load_settings_from(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create `.medqueue/config.toml` with commented defaults if it is missing.
///
/// Returns the path of the config file.
pub fn init_config_dir(base: &Path) -> Result<PathBuf> {
    let dir = base.join(CONFIG_DIR);

    if !dir.exists() {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let path = dir.join(CONFIG_FILENAME);
    if !path.exists() {
        std::fs::write(&path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Created default config at {}", path.display());
    }

    Ok(path)
}

const DEFAULT_CONFIG: &str = r#"# medqueue configuration

[remote]
# "memory" keeps the queue in-process; "postgrest" talks to a hosted table
backend = "memory"
# url = "https://your-project.example.co"
# api_key = ""            # MEDQUEUE_API_KEY overrides this
table = "queue"
realtime = true
seed_demo = true

[location]
# Terminal position used by "Use Live Location"; leave unset to disable it
# latitude = 12.9716
# longitude = 77.5946
high_accuracy = true
timeout_ms = 10000
maximum_age_ms = 0
poll_interval_ms = 3000
geocoder = "offline"      # or "osm"

[booking]
fee = 75
currency = "₹"

[auth]
access_code = "1234"

[ui]
icons = "unicode"         # or "nerd_fonts"
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeocoderKind, RemoteBackend};
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(config_path(dir.path()), "[remote\nbackend = ").unwrap();

        assert_eq!(load_settings(dir.path()), Settings::default());
    }

    #[test]
    fn test_load_custom_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            r#"
            [booking]
            fee = 120.5

            [auth]
            access_code = "9999"
            "#,
        )
        .unwrap();

        let settings = load_settings_from(&path);
        assert_eq!(settings.booking.fee, 120.5);
        assert_eq!(settings.auth.access_code, "9999");
        assert_eq!(settings.booking.currency, "₹");
    }

    #[test]
    fn test_init_writes_parseable_defaults() {
        let dir = tempdir().unwrap();
        let path = init_config_dir(dir.path()).unwrap();
        assert!(path.exists());

        let settings = load_settings(dir.path());
        assert_eq!(settings.remote.backend, RemoteBackend::Memory);
        assert_eq!(settings.location.geocoder, GeocoderKind::Offline);
        assert_eq!(settings.location.fixed_position(), None);
        assert_eq!(settings.booking.fee, 75.0);
    }

    #[test]
    fn test_init_keeps_existing_file() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join(CONFIG_DIR)).unwrap();
        std::fs::write(config_path(dir.path()), "[auth]\naccess_code = \"0000\"\n").unwrap();

        init_config_dir(dir.path()).unwrap();
        assert_eq!(load_settings(dir.path()).auth.access_code, "0000");
    }

    #[test]
    fn test_init_reports_unwritable_base() {
        let dir = tempdir().unwrap();
        let not_a_dir = dir.path().join("plain-file");
        std::fs::write(&not_a_dir, "").unwrap();

        let err = init_config_dir(&not_a_dir).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
