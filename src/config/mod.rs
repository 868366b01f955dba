use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::workflows::recruiting::{JoinMissPolicy, NameCorrections};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for a sync run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub adp: AdpConfig,
    pub storage: StorageConfig,
    pub reconciliation: ReconciliationConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let adp = AdpConfig {
            api_base: env::var("ADP_API_BASE")
                .unwrap_or_else(|_| "https://api.adp.com".to_string()),
            token_url: env::var("ADP_TOKEN_URL").unwrap_or_else(|_| {
                "https://accounts.adp.com/auth/oauth/v2/token".to_string()
            }),
            client_id: optional_var("ADP_CLIENT_ID"),
            client_secret: optional_var("ADP_CLIENT_SECRET"),
            cert_path: optional_var("ADP_CERT_PATH").map(PathBuf::from),
            key_path: optional_var("ADP_KEY_PATH").map(PathBuf::from),
        };

        let storage = StorageConfig {
            data_dir: PathBuf::from(
                env::var("RECRUIT_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            ),
            table_path: PathBuf::from(
                env::var("RECRUIT_TABLE_PATH").unwrap_or_else(|_| "data/main.csv".to_string()),
            ),
        };

        let corrections = match optional_var("RECRUIT_NAME_CORRECTIONS") {
            Some(path) => load_corrections(PathBuf::from(path))?,
            None => NameCorrections::default(),
        };

        let join_miss = match optional_var("RECRUIT_JOIN_MISS") {
            Some(value) => JoinMissPolicy::parse(&value).ok_or(ConfigError::InvalidJoinMiss {
                value: value.clone(),
            })?,
            None => JoinMissPolicy::default(),
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            adp,
            storage,
            reconciliation: ReconciliationConfig {
                corrections,
                join_miss,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn optional_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn load_corrections(path: PathBuf) -> Result<NameCorrections, ConfigError> {
    let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::CorrectionsIo {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::CorrectionsFormat { path, source })
}

/// Connection settings for the upstream HR API.
#[derive(Debug, Clone)]
pub struct AdpConfig {
    pub api_base: String,
    pub token_url: String,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub cert_path: Option<PathBuf>,
    pub key_path: Option<PathBuf>,
}

/// Credential bundle required for a live pull.
#[derive(Debug, Clone)]
pub struct AdpCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl AdpConfig {
    /// Credentials are only needed for live pulls, so they are checked here rather than at load.
    pub fn credentials(&self) -> Result<AdpCredentials, ConfigError> {
        Ok(AdpCredentials {
            client_id: self
                .client_id
                .clone()
                .ok_or(ConfigError::MissingVar("ADP_CLIENT_ID"))?,
            client_secret: self
                .client_secret
                .clone()
                .ok_or(ConfigError::MissingVar("ADP_CLIENT_SECRET"))?,
            cert_path: self
                .cert_path
                .clone()
                .ok_or(ConfigError::MissingVar("ADP_CERT_PATH"))?,
            key_path: self
                .key_path
                .clone()
                .ok_or(ConfigError::MissingVar("ADP_KEY_PATH"))?,
        })
    }
}

/// Where snapshots and the published table live.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub table_path: PathBuf,
}

/// Tunables for the reconciliation and metrics stages.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationConfig {
    pub corrections: NameCorrections,
    pub join_miss: JoinMissPolicy,
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidJoinMiss {
        value: String,
    },
    CorrectionsIo {
        path: PathBuf,
        source: std::io::Error,
    },
    CorrectionsFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingVar(key) => write!(f, "{key} must be set for a live pull"),
            ConfigError::InvalidJoinMiss { value } => write!(
                f,
                "RECRUIT_JOIN_MISS must be 'unknown' or 'carry-over', got '{value}'"
            ),
            ConfigError::CorrectionsIo { path, .. } => {
                write!(f, "unable to read name corrections from {}", path.display())
            }
            ConfigError::CorrectionsFormat { path, .. } => {
                write!(f, "name corrections in {} are not valid JSON", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::MissingVar(_) | ConfigError::InvalidJoinMiss { .. } => None,
            ConfigError::CorrectionsIo { source, .. } => Some(source),
            ConfigError::CorrectionsFormat { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_LOG_LEVEL",
            "ADP_API_BASE",
            "ADP_TOKEN_URL",
            "ADP_CLIENT_ID",
            "ADP_CLIENT_SECRET",
            "ADP_CERT_PATH",
            "ADP_KEY_PATH",
            "RECRUIT_DATA_DIR",
            "RECRUIT_TABLE_PATH",
            "RECRUIT_NAME_CORRECTIONS",
            "RECRUIT_JOIN_MISS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.adp.api_base, "https://api.adp.com");
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert_eq!(config.storage.table_path, PathBuf::from("data/main.csv"));
        assert_eq!(config.reconciliation.join_miss, JoinMissPolicy::Unknown);
        assert_eq!(config.reconciliation.corrections, NameCorrections::default());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn credentials_report_first_missing_variable() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("ADP_CLIENT_ID", "client");
        let config = AppConfig::load().expect("config loads");
        match config.adp.credentials() {
            Err(ConfigError::MissingVar(key)) => assert_eq!(key, "ADP_CLIENT_SECRET"),
            other => panic!("expected missing secret, got {other:?}"),
        }
        reset_env();
    }

    #[test]
    fn rejects_unknown_join_miss_policy() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("RECRUIT_JOIN_MISS", "guess");
        let error = AppConfig::load().expect_err("invalid policy rejected");
        assert!(matches!(error, ConfigError::InvalidJoinMiss { .. }));
        reset_env();
    }

    #[test]
    fn loads_corrections_from_json_file() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{"recruiters":[{{"fragment":"Ana","canonical":"Ana Ruiz"}}],"line_managers":[]}}"#
        )
        .expect("write corrections");
        env::set_var("RECRUIT_NAME_CORRECTIONS", file.path());
        env::set_var("RECRUIT_JOIN_MISS", "carry-over");

        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.reconciliation.join_miss, JoinMissPolicy::CarryOver);
        assert_eq!(
            config.reconciliation.corrections.recruiter("Ruiz, Ana"),
            Some("Ana Ruiz")
        );
        reset_env();
    }
}
