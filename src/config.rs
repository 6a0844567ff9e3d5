use std::env;
use std::time::Duration;
use log::{info, error};
use reqwest::Url;

/// Interval between status polls of the watch view.
pub const POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct Config {
    // Upstream query backend, validated once at startup
    pub backend_url: Option<Url>,

    // Listener
    pub bind_address: String,
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: None,
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let backend_url = parse_url("VALHEIM_BACKEND_URL", env::var("VALHEIM_BACKEND_URL").ok());

        Self {
            backend_url,

            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
        }
    }

    pub fn bind(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Absent, blank and unparsable values all collapse to `None`.
pub fn parse_url(name: &str, raw: Option<String>) -> Option<Url> {
    let raw = match raw {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            info!("{} is not set", name);
            return None;
        }
    };

    match Url::parse(raw.trim()) {
        Ok(url) => Some(url),
        Err(e) => {
            error!("{} is not a valid URL ({}): {}", name, raw, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_url_accepts_http_urls() {
        let url = parse_url("X", Some(" http://127.0.0.1:5000/status ".to_string())).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:5000/status");
    }

    #[test]
    fn parse_url_treats_blank_and_garbage_as_missing() {
        assert!(parse_url("X", None).is_none());
        assert!(parse_url("X", Some("   ".to_string())).is_none());
        assert!(parse_url("X", Some("not a url".to_string())).is_none());
    }

    #[test]
    fn default_bind() {
        assert_eq!(Config::default().bind(), "0.0.0.0:8080");
    }
}
