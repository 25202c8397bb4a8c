use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log, append_shutdown_log,
    menu_actions::{self, MenuAction},
    shell_config::ShellConfig,
    supervisor::Supervisor,
    window_actions, with_supervisor,
};

pub fn handle_menu_event(app_handle: &AppHandle, menu_id: &str) {
    match menu_actions::action_from_menu_id(menu_id) {
        Some(MenuAction::StartBackend) => {
            with_supervisor(app_handle, Supervisor::start);
        }
        Some(MenuAction::StopBackend) => {
            with_supervisor(app_handle, Supervisor::stop);
        }
        Some(MenuAction::Reload) => {
            window_actions::reload_main_window(app_handle, append_desktop_log)
        }
        Some(MenuAction::ForceReload) => {
            let Some(config) = app_handle.try_state::<ShellConfig>() else {
                append_desktop_log("force reload skipped: shell config not initialized");
                return;
            };
            window_actions::force_reload_main_window(
                app_handle,
                &config.content_url,
                append_desktop_log,
            );
        }
        Some(MenuAction::ToggleDevTools) => {
            window_actions::toggle_devtools(app_handle, append_desktop_log)
        }
        Some(MenuAction::Quit) => {
            append_shutdown_log("quit requested from menu, exiting desktop process");
            app_handle.exit(0);
        }
        None => append_desktop_log(&format!("ignoring unknown menu id: {menu_id}")),
    }
}
