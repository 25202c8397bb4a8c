pub(crate) const APP_TITLE: &str = "Paza Desktop";
pub(crate) const MAIN_WINDOW_LABEL: &str = "main";
pub(crate) const MAIN_WINDOW_WIDTH: f64 = 1000.0;
pub(crate) const MAIN_WINDOW_HEIGHT: f64 = 800.0;
pub(crate) const TRAY_ID: &str = "paza-tray";
pub(crate) const TRAY_ICON_SIZE: u32 = 16;
pub(crate) const PHASE_CHANGED_EVENT: &str = "backend://phase-changed";

pub(crate) const BACKEND_BINARY_NAME: &str = "myapp";
pub(crate) const BACKEND_PATH_ENV: &str = "PAZA_BACKEND_PATH";
pub(crate) const BACKEND_AUTO_START_ENV: &str = "PAZA_BACKEND_AUTO_START";

pub(crate) const DEFAULT_CONTENT_URL: &str = "http://localhost:8080/";
pub(crate) const CONTENT_URL_ENV: &str = "PAZA_CONTENT_URL";

pub(crate) const DEFAULT_RELOAD_DELAY_MS: u64 = 1_000;
pub(crate) const RELOAD_DELAY_MIN_MS: u64 = 0;
pub(crate) const RELOAD_DELAY_MAX_MS: u64 = 30_000;
pub(crate) const RELOAD_DELAY_ENV: &str = "PAZA_RELOAD_DELAY_MS";

pub(crate) const DEFAULT_EXIT_POLL_INTERVAL_MS: u64 = 250;
pub(crate) const EXIT_POLL_INTERVAL_MIN_MS: u64 = 20;
pub(crate) const EXIT_POLL_INTERVAL_MAX_MS: u64 = 5_000;
pub(crate) const EXIT_POLL_INTERVAL_ENV: &str = "PAZA_EXIT_POLL_INTERVAL_MS";

pub(crate) const DESKTOP_ROOT_ENV: &str = "PAZA_DESKTOP_ROOT";
pub(crate) const DESKTOP_ROOT_DIR_NAME: &str = ".paza-desktop";
pub(crate) const DESKTOP_LOG_FILE: &str = "desktop.log";
pub(crate) const DESKTOP_LOG_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub(crate) const LOG_BACKUP_COUNT: usize = 5;

pub(crate) const RELOAD_TIMER_THREAD_NAME: &str = "content-reload-timer";
pub(crate) const EXIT_WATCHER_THREAD_NAME: &str = "backend-exit-watcher";

#[cfg(target_os = "windows")]
pub(crate) const CREATE_NO_WINDOW: u32 = 0x0800_0000;
