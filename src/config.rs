//! Server configuration from the environment: HOST, PORT, DEFAULT_MATCH_FORMAT.

use crate::models::MatchFormat;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Used when a create-tournament request doesn't name a format.
    pub default_match_format: MatchFormat,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            default_match_format: MatchFormat::default(),
        }
    }
}

impl Config {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unparsable values fall back to defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(default_host);
        let port = match lookup("PORT") {
            Some(p) => p.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid PORT {:?}, using {}", p, default_port());
                default_port()
            }),
            None => default_port(),
        };
        let default_match_format = match lookup("DEFAULT_MATCH_FORMAT") {
            Some(f) => f.parse().unwrap_or_else(|_| {
                log::warn!("Ignoring invalid DEFAULT_MATCH_FORMAT {:?}, using MD3", f);
                MatchFormat::default()
            }),
            None => MatchFormat::default(),
        };
        Self {
            host,
            port,
            default_match_format,
        }
    }
}
