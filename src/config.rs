/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, AUTH_SCHEME, API_KEYS, GREETING など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// An API key and the roles it grants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKey {
    pub key: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub auth_scheme: String,
    pub api_keys: Vec<ApiKey>,

    pub greeting: String,
    pub admin_greeting: String,

    pub request_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = parse_or("PORT", std::env::var("PORT").ok().as_deref(), 3000)?;

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let auth_scheme = std::env::var("AUTH_SCHEME").unwrap_or_else(|_| "Bearer".to_string());
        if auth_scheme.trim().is_empty() || auth_scheme.contains(' ') {
            return Err(ConfigError::Invalid("AUTH_SCHEME"));
        }

        let api_keys = parse_api_keys(&std::env::var("API_KEYS").unwrap_or_default())?;
        if app_env.is_production() && api_keys.is_empty() {
            return Err(ConfigError::Missing("API_KEYS"));
        }

        let greeting = std::env::var("GREETING").unwrap_or_else(|_| "hello".to_string());
        let admin_greeting = std::env::var("ADMIN_GREETING")
            .unwrap_or_else(|_| "hello, administrator".to_string());

        let request_timeout_seconds = parse_timeout_seconds(
            std::env::var("REQUEST_TIMEOUT_SECONDS").ok().as_deref(),
        )?;

        Ok(Self {
            addr,
            app_env,
            auth_scheme,
            api_keys,
            greeting,
            admin_greeting,
            request_timeout_seconds,
        })
    }
}

/// 未設定なら default、設定済みで parse できなければ起動失敗
fn parse_or<T: FromStr>(key: &'static str, raw: Option<&str>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
    }
}

fn parse_timeout_seconds(raw: Option<&str>) -> Result<u64, ConfigError> {
    match parse_or("REQUEST_TIMEOUT_SECONDS", raw, 30)? {
        0 => Err(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS")),
        secs => Ok(secs),
    }
}

/// `key=role|role,key2=role` (roles optional: `key3=`)
pub fn parse_api_keys(raw: &str) -> Result<Vec<ApiKey>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| -> Result<ApiKey, ConfigError> {
            let (key, roles) = entry
                .split_once('=')
                .ok_or(ConfigError::Invalid("API_KEYS"))?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::Invalid("API_KEYS"));
            }

            Ok(ApiKey {
                key: key.to_string(),
                roles: roles
                    .split('|')
                    .map(|r| r.trim().to_string())
                    .filter(|r| !r.is_empty())
                    .collect(),
            })
        })
        .collect()
}
