use std::{thread, time::Duration};

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};
use url::Url;

use crate::{
    append_desktop_log, error::ShellError, supervisor::ContentReloader, ui_dispatch, APP_TITLE,
    MAIN_WINDOW_HEIGHT, MAIN_WINDOW_LABEL, MAIN_WINDOW_WIDTH, RELOAD_TIMER_THREAD_NAME,
};

pub fn create_main_window(app_handle: &AppHandle, content_url: &Url) -> Result<(), ShellError> {
    WebviewWindowBuilder::new(
        app_handle,
        MAIN_WINDOW_LABEL,
        WebviewUrl::External(content_url.clone()),
    )
    .title(APP_TITLE)
    .inner_size(MAIN_WINDOW_WIDTH, MAIN_WINDOW_HEIGHT)
    .build()?;
    Ok(())
}

pub fn show_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("show_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.unminimize() {
        log(&format!("failed to unminimize main window: {error}"));
    }
    if let Err(error) = window.show() {
        log(&format!("failed to show main window: {error}"));
    }
    if let Err(error) = window.set_focus() {
        log(&format!("failed to focus main window: {error}"));
    }
}

pub fn reload_main_window<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("reload_main_window skipped: main window not found");
        return;
    };

    if let Err(error) = window.eval("window.location.reload()") {
        log(&format!("failed to reload main window: {error}"));
    }
}

/// Navigates back to the content URL instead of reusing the current document.
pub fn force_reload_main_window<F>(app_handle: &AppHandle, content_url: &Url, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("force_reload_main_window skipped: main window not found");
        return;
    };

    let js = format!(
        "window.location.replace({});",
        serde_json::to_string(content_url.as_str()).unwrap_or_else(|_| "\"/\"".to_string())
    );
    if let Err(error) = window.eval(&js) {
        log(&format!("failed to force reload main window: {error}"));
    }
}

pub fn toggle_devtools<F>(app_handle: &AppHandle, log: F)
where
    F: Fn(&str),
{
    let Some(window) = app_handle.get_webview_window(MAIN_WINDOW_LABEL) else {
        log("toggle_devtools skipped: main window not found");
        return;
    };

    #[cfg(debug_assertions)]
    {
        if window.is_devtools_open() {
            window.close_devtools();
        } else {
            window.open_devtools();
        }
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = window;
        log("developer tools are only available in debug builds");
    }
}

/// Reloads the main window once after a start request. The delay only hides the
/// backend's own startup latency; nothing checks readiness.
pub(crate) struct DelayedWindowReloader {
    app_handle: AppHandle,
}

impl DelayedWindowReloader {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl ContentReloader for DelayedWindowReloader {
    fn schedule_reload(&self, delay: Duration) {
        let app_handle = self.app_handle.clone();
        let timer = thread::Builder::new()
            .name(RELOAD_TIMER_THREAD_NAME.to_string())
            .spawn(move || {
                thread::sleep(delay);
                if let Err(error) = ui_dispatch::run_on_main_thread_dispatch(
                    &app_handle,
                    "delayed content reload",
                    |main_app| reload_main_window(main_app, append_desktop_log),
                ) {
                    append_desktop_log(&error.to_string());
                }
            });
        if let Err(error) = timer {
            append_desktop_log(&format!("failed to schedule content reload: {error}"));
        }
    }
}
