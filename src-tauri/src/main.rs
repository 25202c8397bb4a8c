#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app_constants;
mod app_menu;
mod app_runtime;
mod app_types;
mod desktop_bridge_commands;
mod error;
mod logging;
mod menu_actions;
mod menu_handler;
mod menu_presenter;
mod process_handle;
mod runtime_paths;
mod shell_config;
mod shutdown;
mod supervisor;
#[cfg(test)]
mod test_support;
mod tray_icons;
mod tray_presenter;
mod tray_setup;
mod ui_dispatch;
mod window_actions;

pub(crate) use app_constants::*;
pub(crate) use app_types::{
    with_supervisor, BackendBridgeResult, BackendBridgeState, SupervisorCell,
};
pub(crate) use logging::{
    append_desktop_log, append_shutdown_log, append_startup_log, append_supervisor_log,
};

fn main() {
    app_runtime::run();
}
