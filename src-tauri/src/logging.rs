use std::{
    env,
    fs::{self, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, OnceLock, PoisonError},
};

use chrono::{DateTime, Local};

use crate::{runtime_paths, DESKTOP_LOG_FILE, DESKTOP_LOG_MAX_BYTES, LOG_BACKUP_COUNT};

static DESKTOP_LOG_WRITE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DesktopLogCategory {
    Startup,
    Runtime,
    Supervisor,
    Shutdown,
}

impl DesktopLogCategory {
    fn as_str(self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Runtime => "runtime",
            Self::Supervisor => "supervisor",
            Self::Shutdown => "shutdown",
        }
    }
}

pub(crate) fn resolve_desktop_log_path(root_dir: Option<PathBuf>, file_name: &str) -> PathBuf {
    match root_dir {
        Some(root) => root.join("logs").join(file_name),
        None => env::temp_dir().join("paza-desktop").join(file_name),
    }
}

fn format_log_line(category: DesktopLogCategory, message: &str, now: DateTime<Local>) -> String {
    format!(
        "[{}] [{}] {}\n",
        now.format("%Y-%m-%d %H:%M:%S%.3f"),
        category.as_str(),
        message
    )
}

fn backup_path(log_path: &Path, index: usize) -> PathBuf {
    let mut raw = log_path.as_os_str().to_os_string();
    raw.push(format!(".{index}"));
    PathBuf::from(raw)
}

fn rotate_if_needed(log_path: &Path, max_bytes: u64, backup_count: usize) -> io::Result<()> {
    let size = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => return Err(error),
    };
    if size < max_bytes {
        return Ok(());
    }

    if backup_count == 0 {
        return fs::remove_file(log_path);
    }

    let oldest = backup_path(log_path, backup_count);
    if oldest.exists() {
        fs::remove_file(&oldest)?;
    }
    for index in (1..backup_count).rev() {
        let from = backup_path(log_path, index);
        if from.exists() {
            fs::rename(&from, backup_path(log_path, index + 1))?;
        }
    }
    fs::rename(log_path, backup_path(log_path, 1))
}

fn write_log_line(
    log_path: &Path,
    line: &str,
    max_bytes: u64,
    backup_count: usize,
) -> io::Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)?;
    }
    rotate_if_needed(log_path, max_bytes, backup_count)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    file.write_all(line.as_bytes())
}

pub(crate) fn append_log_line(
    category: DesktopLogCategory,
    message: &str,
    log_path: &Path,
    max_bytes: u64,
    backup_count: usize,
    write_lock: &OnceLock<Mutex<()>>,
) {
    let line = format_log_line(category, message, Local::now());
    if cfg!(debug_assertions) {
        eprint!("{line}");
    }

    let _guard = write_lock
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Err(error) = write_log_line(log_path, &line, max_bytes, backup_count) {
        eprintln!(
            "failed to write desktop log {}: {}",
            log_path.display(),
            error
        );
    }
}

fn append_desktop_log_with_category(category: DesktopLogCategory, message: &str) {
    let log_path =
        resolve_desktop_log_path(runtime_paths::default_root_dir(), DESKTOP_LOG_FILE);
    append_log_line(
        category,
        message,
        &log_path,
        DESKTOP_LOG_MAX_BYTES,
        LOG_BACKUP_COUNT,
        &DESKTOP_LOG_WRITE_LOCK,
    );
}

pub(crate) fn append_desktop_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Runtime, message);
}

pub(crate) fn append_startup_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Startup, message);
}

pub(crate) fn append_supervisor_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Supervisor, message);
}

pub(crate) fn append_shutdown_log(message: &str) {
    append_desktop_log_with_category(DesktopLogCategory::Shutdown, message);
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn format_log_line_tags_timestamp_and_category() {
        let now = Local
            .with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
            .single()
            .expect("valid local timestamp");
        assert_eq!(
            format_log_line(DesktopLogCategory::Supervisor, "backend #1 started", now),
            "[2026-03-14 09:26:53.000] [supervisor] backend #1 started\n"
        );
    }

    #[test]
    fn resolve_desktop_log_path_uses_logs_dir_under_root() {
        let path = resolve_desktop_log_path(Some(PathBuf::from("/srv/paza")), "desktop.log");
        assert_eq!(path, PathBuf::from("/srv/paza").join("logs").join("desktop.log"));
    }

    #[test]
    fn append_log_line_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join("logs").join("desktop.log");
        let lock = OnceLock::new();

        append_log_line(DesktopLogCategory::Shutdown, "bye", &log_path, 1024, 2, &lock);

        let written = fs::read_to_string(&log_path).expect("log file should exist");
        assert!(written.ends_with("[shutdown] bye\n"));
    }

    #[test]
    fn rotation_shifts_backups_and_drops_the_oldest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join("desktop.log");
        fs::write(&log_path, "current-current").expect("seed current");
        fs::write(backup_path(&log_path, 1), "first").expect("seed .1");
        fs::write(backup_path(&log_path, 2), "second").expect("seed .2");

        rotate_if_needed(&log_path, 8, 2).expect("rotation should succeed");

        assert!(!log_path.exists());
        assert_eq!(
            fs::read_to_string(backup_path(&log_path, 1)).expect(".1"),
            "current-current"
        );
        assert_eq!(fs::read_to_string(backup_path(&log_path, 2)).expect(".2"), "first");
        assert!(!backup_path(&log_path, 3).exists());
    }

    #[test]
    fn rotation_leaves_small_files_alone() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log_path = dir.path().join("desktop.log");
        fs::write(&log_path, "tiny").expect("seed");

        rotate_if_needed(&log_path, 1024, 3).expect("rotation should succeed");

        assert_eq!(fs::read_to_string(&log_path).expect("still there"), "tiny");
        assert!(!backup_path(&log_path, 1).exists());
    }
}
