use std::{
    fs, io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "pet_cli.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    /// Environment variable the host puts the session credential in.
    pub credential_env: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000/api".into(),
            credential_env: "PET_INIT_DATA".into(),
        }
    }
}

/// Defaults, then the config file, then environment overrides.
///
/// An explicitly requested file must exist; the default `pet_cli.toml` is
/// optional.
pub fn load_settings(explicit_path: Option<&Path>) -> anyhow::Result<Settings> {
    let path = explicit_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let mut settings = match fs::read_to_string(&path) {
        Ok(raw) => toml::from_str::<Settings>(&raw)
            .with_context(|| format!("failed to parse config file '{}'", path.display()))?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && explicit_path.is_none() => {
            Settings::default()
        }
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_env_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("PET_API_URL") {
        settings.api_base_url = v;
    }
    if let Some(v) = lookup("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    if let Some(v) = lookup("PET_CREDENTIAL_ENV") {
        settings.credential_env = v;
    }
    if let Some(v) = lookup("APP__CREDENTIAL_ENV") {
        settings.credential_env = v;
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, io::Write};

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_partial_config_file_over_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "api_base_url = \"https://pets.example.com/api\"").expect("write");

        let settings = load_settings(Some(file.path())).expect("settings");
        assert_eq!(settings.api_base_url, "https://pets.example.com/api");
        assert_eq!(settings.credential_env, Settings::default().credential_env);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_settings(Some(dir.path().join("absent.toml").as_path())).expect_err("missing");
        assert!(err.to_string().contains("absent.toml"), "{err}");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "api_base_url = [").expect("write");
        assert!(load_settings(Some(file.path())).is_err());
    }

    #[test]
    fn app_prefixed_env_wins_over_short_name() {
        let mut settings = Settings::default();
        apply_env_overrides(
            &mut settings,
            lookup_from(&[
                ("PET_API_URL", "http://short/api"),
                ("APP__API_BASE_URL", "http://prefixed/api"),
                ("PET_CREDENTIAL_ENV", "TG_INIT_DATA"),
            ]),
        );
        assert_eq!(settings.api_base_url, "http://prefixed/api");
        assert_eq!(settings.credential_env, "TG_INIT_DATA");
    }

    #[test]
    fn no_env_keeps_settings() {
        let mut settings = Settings::default();
        apply_env_overrides(&mut settings, lookup_from(&[]));
        assert_eq!(settings, Settings::default());
    }
}
