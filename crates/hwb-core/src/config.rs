use std::{env, fs, path::Path, time::Duration};

use crate::{domain::ChatId, errors::Error, Result};

const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuse/";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 600;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Typed, immutable configuration built once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// OAuth token for the homework-status API.
    pub practicum_token: String,
    /// Telegram bot token.
    pub telegram_bot_token: String,
    /// Chat that receives status notifications.
    pub telegram_chat_id: ChatId,

    /// Homework-status endpoint URL.
    pub endpoint: String,
    /// Wall-clock interval between polls.
    pub poll_interval: Duration,
    /// Timeout for outbound status-API requests.
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::load_with(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup (tests pass a map,
    /// `load()` passes the process environment).
    pub fn load_with(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let practicum_token = require(&get, "PRACTICUM_TOKEN")?;
        let telegram_bot_token = require(&get, "TELEGRAM_BOT_TOKEN")?;

        // The original deployment used CHAT_ID; accept it as a fallback.
        let chat_id_raw = get("TELEGRAM_CHAT_ID")
            .and_then(non_empty)
            .or_else(|| get("CHAT_ID").and_then(non_empty))
            .ok_or_else(|| {
                Error::Config("TELEGRAM_CHAT_ID environment variable is required".to_string())
            })?;
        let telegram_chat_id = chat_id_raw
            .trim()
            .parse::<i64>()
            .map(ChatId)
            .map_err(|_| Error::Config(format!("TELEGRAM_CHAT_ID is not numeric: {chat_id_raw}")))?;

        let endpoint = get("PRACTICUM_ENDPOINT")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let poll_interval = Duration::from_secs(
            env_u64(&get, "POLL_INTERVAL_SECS").unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        );
        let http_timeout = Duration::from_secs(
            env_u64(&get, "HTTP_TIMEOUT_SECS").unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        );

        tracing::debug!("configuration loaded");

        Ok(Self {
            practicum_token,
            telegram_bot_token,
            telegram_chat_id,
            endpoint,
            poll_interval,
            http_timeout,
        })
    }
}

fn require(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String> {
    get(key)
        .and_then(non_empty)
        .ok_or_else(|| Error::Config(format!("{key} environment variable is required")))
}

fn env_u64(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<u64> {
    get(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let Some((key, val)) = parse_env_line(raw) else {
            continue;
        };
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

/// Parse one `.env` line into a key/value pair.
///
/// Skips blanks and `#` comments; strips one layer of surrounding quotes.
fn parse_env_line(raw: &str) -> Option<(&str, String)> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (k, v) = line.split_once('=')?;
    let key = k.trim();
    if key.is_empty() {
        return None;
    }

    let mut val = v.trim().to_string();
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        val = val[1..val.len() - 1].to_string();
    }

    Some((key, val))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = vars.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn load_fails_without_each_required_secret() {
        let full = [
            ("PRACTICUM_TOKEN", "pt"),
            ("TELEGRAM_BOT_TOKEN", "tt"),
            ("TELEGRAM_CHAT_ID", "42"),
        ];

        assert!(Config::load_with(lookup(&full)).is_ok());

        for missing in ["PRACTICUM_TOKEN", "TELEGRAM_BOT_TOKEN", "TELEGRAM_CHAT_ID"] {
            let partial: Vec<_> = full.iter().copied().filter(|(k, _)| *k != missing).collect();
            let err = Config::load_with(lookup(&partial)).unwrap_err();
            match err {
                Error::Config(msg) => assert!(msg.contains(missing), "{msg}"),
                other => panic!("expected Config error, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let vars = [
            ("PRACTICUM_TOKEN", "  "),
            ("TELEGRAM_BOT_TOKEN", "tt"),
            ("TELEGRAM_CHAT_ID", "42"),
        ];
        assert!(matches!(
            Config::load_with(lookup(&vars)).unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn legacy_chat_id_variable_is_accepted() {
        let vars = [
            ("PRACTICUM_TOKEN", "pt"),
            ("TELEGRAM_BOT_TOKEN", "tt"),
            ("CHAT_ID", "-100"),
        ];
        let cfg = Config::load_with(lookup(&vars)).unwrap();
        assert_eq!(cfg.telegram_chat_id, ChatId(-100));
    }

    #[test]
    fn non_numeric_chat_id_is_a_config_error() {
        let vars = [
            ("PRACTICUM_TOKEN", "pt"),
            ("TELEGRAM_BOT_TOKEN", "tt"),
            ("TELEGRAM_CHAT_ID", "not-a-number"),
        ];
        assert!(matches!(
            Config::load_with(lookup(&vars)).unwrap_err(),
            Error::Config(_)
        ));
    }

    #[test]
    fn defaults_apply_when_overrides_absent() {
        let vars = [
            ("PRACTICUM_TOKEN", "pt"),
            ("TELEGRAM_BOT_TOKEN", "tt"),
            ("TELEGRAM_CHAT_ID", "42"),
        ];
        let cfg = Config::load_with(lookup(&vars)).unwrap();
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.poll_interval, Duration::from_secs(600));
        assert_eq!(cfg.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn interval_and_timeout_are_overridable() {
        let vars = [
            ("PRACTICUM_TOKEN", "pt"),
            ("TELEGRAM_BOT_TOKEN", "tt"),
            ("TELEGRAM_CHAT_ID", "42"),
            ("POLL_INTERVAL_SECS", "5"),
            ("HTTP_TIMEOUT_SECS", "7"),
            ("PRACTICUM_ENDPOINT", "http://localhost:9999/statuses/"),
        ];
        let cfg = Config::load_with(lookup(&vars)).unwrap();
        assert_eq!(cfg.poll_interval, Duration::from_secs(5));
        assert_eq!(cfg.http_timeout, Duration::from_secs(7));
        assert_eq!(cfg.endpoint, "http://localhost:9999/statuses/");
    }

    #[test]
    fn env_line_parsing_handles_quotes_and_comments() {
        assert_eq!(parse_env_line("# comment"), None);
        assert_eq!(parse_env_line("   "), None);
        assert_eq!(parse_env_line("=value"), None);
        assert_eq!(
            parse_env_line("PRACTICUM_TOKEN=abc"),
            Some(("PRACTICUM_TOKEN", "abc".to_string()))
        );
        assert_eq!(
            parse_env_line("TELEGRAM_BOT_TOKEN=\"quoted\""),
            Some(("TELEGRAM_BOT_TOKEN", "quoted".to_string()))
        );
        assert_eq!(
            parse_env_line("CHAT_ID='42'"),
            Some(("CHAT_ID", "42".to_string()))
        );
    }
}
