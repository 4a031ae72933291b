use std::time::Duration;

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "config/fashion-recognition";
const ENV_PREFIX: &str = "FASHION_RECOGNITION";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub cors: CorsSettings,
    pub limits: LimitSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    pub max_age_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitSettings {
    pub max_upload_bytes: usize,
    pub decode_timeout_ms: Option<u64>,
    pub max_decode_alloc_bytes: Option<u64>,
    pub max_concurrent_extractions: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allow_credentials: true,
            max_age_secs: 600,
        }
    }
}

impl Default for LimitSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            decode_timeout_ms: None,
            max_decode_alloc_bytes: None,
            max_concurrent_extractions: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Loads settings from the optional config file, then `FASHION_RECOGNITION_*` env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name(CONFIG_FILE).required(false))
                .add_source(environment()),
        )
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// `FASHION_RECOGNITION_SERVER__PORT=9000` sets `server.port`; origins are comma separated.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("cors.allowed_origins")
        .try_parsing(true)
}

impl LimitSettings {
    pub fn decode_timeout(&self) -> Option<Duration> {
        self.decode_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_builder(Config::builder()).unwrap();
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.bind_address(), "0.0.0.0:8000");
        assert_eq!(settings.cors.allowed_origins, vec!["*".to_string()]);
        assert!(settings.cors.allow_credentials);
        assert_eq!(settings.limits.max_upload_bytes, 10 * 1024 * 1024);
        assert!(settings.limits.decode_timeout().is_none());
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_file_overrides_keep_other_defaults() {
        let toml = r#"
            [server]
            port = 9100

            [cors]
            allowed_origins = ["http://localhost:3000"]

            [limits]
            decode_timeout_ms = 2500
        "#;
        let settings =
            Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
                .unwrap();
        assert_eq!(settings.server.port, 9100);
        assert_eq!(settings.server.host, "0.0.0.0");
        assert_eq!(
            settings.cors.allowed_origins,
            vec!["http://localhost:3000".to_string()]
        );
        assert_eq!(settings.cors.max_age_secs, 600);
        assert_eq!(
            settings.limits.decode_timeout(),
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn test_environment_overrides_file() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9100
        "#;
        let mut vars = config::Map::new();
        for (key, value) in [
            ("FASHION_RECOGNITION_SERVER__PORT", "9200"),
            (
                "FASHION_RECOGNITION_CORS__ALLOWED_ORIGINS",
                "http://a.example,http://b.example",
            ),
            ("FASHION_RECOGNITION_CORS__ALLOW_CREDENTIALS", "false"),
            ("FASHION_RECOGNITION_LIMITS__MAX_CONCURRENT_EXTRACTIONS", "4"),
            ("FASHION_RECOGNITION_LOGGING__LEVEL", "debug"),
            ("OTHER_SERVER__PORT", "1"),
        ] {
            vars.insert(key.to_string(), value.to_string());
        }

        let settings = Settings::from_builder(
            Config::builder()
                .add_source(File::from_str(toml, FileFormat::Toml))
                .add_source(environment().source(Some(vars))),
        )
        .unwrap();
        assert_eq!(settings.bind_address(), "127.0.0.1:9200");
        assert_eq!(
            settings.cors.allowed_origins,
            vec!["http://a.example".to_string(), "http://b.example".to_string()]
        );
        assert!(!settings.cors.allow_credentials);
        assert_eq!(settings.limits.max_concurrent_extractions, Some(4));
        assert_eq!(settings.limits.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(settings.logging.level, "debug");
    }
}
