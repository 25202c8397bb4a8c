use std::{env, path::PathBuf};

use crate::{DESKTOP_ROOT_DIR_NAME, DESKTOP_ROOT_ENV};

pub(crate) fn default_root_dir() -> Option<PathBuf> {
    root_dir_from(env::var(DESKTOP_ROOT_ENV).ok(), home::home_dir())
}

fn root_dir_from(override_value: Option<String>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(raw) = override_value {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }

    home_dir.map(|home| home.join(DESKTOP_ROOT_DIR_NAME))
}
