use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "minimzd.toml";
pub const ENV_PREFIX: &str = "MINIMZD_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub keybind: KeybindConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Период опроса списка окон
    pub poll_interval_ms: u64,
    /// Таймаут поиска, если в командной строке указан 0 или ничего
    pub default_timeout_ms: u64,
}

/// Сочетания по умолчанию, если их не удалось (или не просили) прочитать из gsettings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeybindConfig {
    pub minimize: String,
    pub close: String,
    pub device_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
            default_timeout_ms: 10_000,
        }
    }
}

impl Default for KeybindConfig {
    fn default() -> Self {
        Self {
            minimize: "<Super><H>".to_string(),
            close: "<Alt><F4>".to_string(),
            device_name: "minimzd".to_string(),
        }
    }
}

impl Config {
    /// Значения по умолчанию, затем файл (если есть), затем переменные `MINIMZD_*`.
    /// Вложенные ключи в переменных разделяются `__`: `MINIMZD_WINDOW__POLL_INTERVAL_MS`.
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment
            .extract()
            .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.window.poll_interval_ms < 50 {
            anyhow::bail!("poll_interval_ms должно быть минимум 50");
        }

        if self.window.default_timeout_ms == 0 {
            anyhow::bail!("default_timeout_ms должно быть больше 0");
        }

        if self.keybind.device_name.trim().is_empty() {
            anyhow::bail!("keybind.device_name не может быть пустым");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window.poll_interval_ms, 500);
        assert_eq!(config.window.default_timeout_ms, 10_000);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.keybind.close, "<Alt><F4>");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_file_overrides_only_given_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[window]\npoll_interval_ms = 250\n\n[keybind]\nminimize = \"<Super><M>\""
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.window.poll_interval_ms, 250);
        assert_eq!(config.window.default_timeout_ms, 10_000);
        assert_eq!(config.keybind.minimize, "<Super><M>");
        assert_eq!(config.keybind.device_name, "minimzd");
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[window]\npoll_interval_ms = 10").unwrap();
        assert!(Config::load(file.path()).is_err());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nformat = \"xml\"").unwrap();
        assert!(Config::load(file.path()).is_err());
    }

    #[test]
    fn test_validation_rules() {
        let mut config = Config::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.window.default_timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.keybind.device_name = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
