use std::str::FromStr;
use std::time::Duration;

/// Service settings read from `TIMETABLE__*` environment variables.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub webhook_url: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            webhook_url: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let port = parse_var(&get, "TIMETABLE__SERVER__PORT")?.unwrap_or(defaults.port);
        let request_timeout = parse_var::<u64, _>(&get, "TIMETABLE__SERVER__REQUEST_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let webhook_url = get("TIMETABLE__NOTIFY__WEBHOOK_URL").filter(|u| !u.trim().is_empty());
        Ok(Self {
            port,
            webhook_url,
            request_timeout,
        })
    }
}

fn parse_var<T, F>(get: &F, key: &str) -> anyhow::Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid {key} {raw:?}: {e}")),
    }
}
