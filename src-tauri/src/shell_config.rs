use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use tauri::{AppHandle, Manager};
use url::Url;

use crate::{
    error::ShellError, BACKEND_AUTO_START_ENV, BACKEND_BINARY_NAME, BACKEND_PATH_ENV,
    CONTENT_URL_ENV, DEFAULT_CONTENT_URL, DEFAULT_EXIT_POLL_INTERVAL_MS, DEFAULT_RELOAD_DELAY_MS,
    EXIT_POLL_INTERVAL_ENV, EXIT_POLL_INTERVAL_MAX_MS, EXIT_POLL_INTERVAL_MIN_MS,
    RELOAD_DELAY_ENV, RELOAD_DELAY_MAX_MS, RELOAD_DELAY_MIN_MS,
};

/// Settings the shell reads once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ShellConfig {
    pub(crate) backend_path: PathBuf,
    pub(crate) content_url: Url,
    pub(crate) reload_delay: Duration,
    pub(crate) exit_poll_interval: Duration,
    pub(crate) auto_start: bool,
}

impl ShellConfig {
    pub(crate) fn from_app(app_handle: &AppHandle, log: fn(&str)) -> Result<Self, ShellError> {
        let resource_dir = app_handle.path().resource_dir().ok();
        Self::resolve(resource_dir.as_deref(), |key| env::var(key).ok(), log)
    }

    pub(crate) fn resolve<F>(
        resource_dir: Option<&Path>,
        lookup: F,
        log: fn(&str),
    ) -> Result<Self, ShellError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend_path = resolve_backend_path(resource_dir, lookup(BACKEND_PATH_ENV))?;
        let content_url = normalize_content_url(
            lookup(CONTENT_URL_ENV).as_deref().unwrap_or(DEFAULT_CONTENT_URL),
            log,
        )?;
        let reload_delay = parse_clamped_millis(
            lookup(RELOAD_DELAY_ENV).as_deref(),
            DEFAULT_RELOAD_DELAY_MS,
            RELOAD_DELAY_MIN_MS,
            RELOAD_DELAY_MAX_MS,
        );
        let exit_poll_interval = parse_clamped_millis(
            lookup(EXIT_POLL_INTERVAL_ENV).as_deref(),
            DEFAULT_EXIT_POLL_INTERVAL_MS,
            EXIT_POLL_INTERVAL_MIN_MS,
            EXIT_POLL_INTERVAL_MAX_MS,
        );
        let auto_start = lookup(BACKEND_AUTO_START_ENV)
            .as_deref()
            .is_some_and(parse_flag);

        Ok(Self {
            backend_path,
            content_url,
            reload_delay,
            exit_poll_interval,
            auto_start,
        })
    }
}

fn resolve_backend_path(
    resource_dir: Option<&Path>,
    override_value: Option<String>,
) -> Result<PathBuf, ShellError> {
    if let Some(raw) = override_value {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }

    let resource_dir = resource_dir.ok_or_else(|| {
        ShellError::Config(format!(
            "resource directory is unavailable and {BACKEND_PATH_ENV} is not set"
        ))
    })?;
    Ok(resource_dir.join(format!("{BACKEND_BINARY_NAME}{}", env::consts::EXE_SUFFIX)))
}

fn default_content_url() -> Result<Url, ShellError> {
    Url::parse(DEFAULT_CONTENT_URL)
        .map_err(|error| ShellError::Config(format!("invalid default content url: {error}")))
}

fn normalize_content_url(raw: &str, log: fn(&str)) -> Result<Url, ShellError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default_content_url();
    }

    match Url::parse(trimmed) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(parsed),
        Ok(parsed) => {
            log(&format!(
                "unsupported content url scheme '{}', using {}",
                parsed.scheme(),
                DEFAULT_CONTENT_URL
            ));
            default_content_url()
        }
        Err(error) => {
            log(&format!(
                "invalid content url '{trimmed}': {error}; using {DEFAULT_CONTENT_URL}"
            ));
            default_content_url()
        }
    }
}

fn parse_clamped_millis(raw: Option<&str>, default_ms: u64, min_ms: u64, max_ms: u64) -> Duration {
    let value = raw
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default_ms);
    Duration::from_millis(value.clamp(min_ms, max_ms))
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn resolve_with(
        resource_dir: Option<&Path>,
        vars: &[(&str, &str)],
    ) -> Result<ShellConfig, ShellError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        ShellConfig::resolve(resource_dir, |key| vars.get(key).cloned(), |_| {})
    }

    #[test]
    fn defaults_point_at_bundled_backend() {
        let config = resolve_with(Some(Path::new("/opt/paza/resources")), &[])
            .expect("config should resolve");

        assert_eq!(
            config.backend_path,
            Path::new("/opt/paza/resources")
                .join(format!("{BACKEND_BINARY_NAME}{}", env::consts::EXE_SUFFIX))
        );
        assert_eq!(config.content_url.as_str(), DEFAULT_CONTENT_URL);
        assert_eq!(config.reload_delay, Duration::from_millis(1_000));
        assert_eq!(config.exit_poll_interval, Duration::from_millis(250));
        assert!(!config.auto_start);
    }

    #[test]
    fn backend_path_override_wins_over_resource_dir() {
        let config = resolve_with(
            Some(Path::new("/opt/paza/resources")),
            &[(BACKEND_PATH_ENV, " /usr/local/bin/paza-backend ")],
        )
        .expect("config should resolve");

        assert_eq!(config.backend_path, PathBuf::from("/usr/local/bin/paza-backend"));
    }

    #[test]
    fn missing_resource_dir_without_override_is_a_config_error() {
        let error = resolve_with(None, &[]).expect_err("should fail");
        assert!(matches!(error, ShellError::Config(_)));
    }

    #[test]
    fn non_http_content_url_falls_back_to_default() {
        let config = resolve_with(
            Some(Path::new("/opt")),
            &[(CONTENT_URL_ENV, "file:///etc/passwd")],
        )
        .expect("config should resolve");
        assert_eq!(config.content_url.as_str(), DEFAULT_CONTENT_URL);

        let config = resolve_with(Some(Path::new("/opt")), &[(CONTENT_URL_ENV, "not a url")])
            .expect("config should resolve");
        assert_eq!(config.content_url.as_str(), DEFAULT_CONTENT_URL);
    }

    #[test]
    fn custom_content_url_is_kept() {
        let config = resolve_with(
            Some(Path::new("/opt")),
            &[(CONTENT_URL_ENV, "https://paza.local:9443/app/")],
        )
        .expect("config should resolve");
        assert_eq!(config.content_url.as_str(), "https://paza.local:9443/app/");
    }

    #[test]
    fn millisecond_settings_are_clamped_and_tolerate_garbage() {
        assert_eq!(
            parse_clamped_millis(Some("999999"), 1_000, 0, 30_000),
            Duration::from_millis(30_000)
        );
        assert_eq!(
            parse_clamped_millis(Some("5"), 250, 20, 5_000),
            Duration::from_millis(20)
        );
        assert_eq!(
            parse_clamped_millis(Some("soon"), 1_000, 0, 30_000),
            Duration::from_millis(1_000)
        );
        assert_eq!(
            parse_clamped_millis(None, 1_000, 0, 30_000),
            Duration::from_millis(1_000)
        );
    }

    #[test]
    fn auto_start_accepts_common_truthy_values() {
        for raw in ["1", "true", "YES", " on "] {
            assert!(parse_flag(raw), "{raw} should enable auto start");
        }
        for raw in ["0", "false", "", "later"] {
            assert!(!parse_flag(raw), "{raw} should not enable auto start");
        }
    }
}
