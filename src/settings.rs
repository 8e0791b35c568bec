//! Process settings from the environment (`.env` is honoured via dotenvy).

use crate::error::SettingsError;
use crate::web::DEFAULT_BODY_LIMIT;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub body_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            database_url: "sqlite://autocrud.db?mode=rwc".into(),
            host: "127.0.0.1".into(),
            port: 13373,
            max_connections: 5,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

fn parse<T: FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, SettingsError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| SettingsError::Invalid { key, value }),
    }
}

impl Settings {
    /// Reads DATABASE_URL, HOST, PORT, DB_MAX_CONNECTIONS and BODY_LIMIT_BYTES.
    pub fn from_env() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Settings::default();
        Ok(Settings {
            database_url: lookup("DATABASE_URL").unwrap_or(d.database_url),
            host: lookup("HOST").unwrap_or(d.host),
            port: parse("PORT", lookup("PORT"), d.port)?,
            max_connections: parse("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), d.max_connections)?,
            body_limit: parse("BODY_LIMIT_BYTES", lookup("BODY_LIMIT_BYTES"), d.body_limit)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_when_unset() {
        let s = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.bind_addr(), "127.0.0.1:13373");
    }

    #[test]
    fn reads_overrides() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://localhost/tasks"),
            ("PORT", "8080"),
            ("DB_MAX_CONNECTIONS", "12"),
        ]
        .into_iter()
        .collect();
        let s = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(s.database_url, "postgres://localhost/tasks");
        assert_eq!(s.port, 8080);
        assert_eq!(s.max_connections, 12);
        assert_eq!(s.host, "127.0.0.1");
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = Settings::from_lookup(|k| (k == "PORT").then(|| "eighty".to_string())).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { key: "PORT", .. }));
    }
}
