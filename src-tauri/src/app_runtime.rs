use std::sync::Arc;

use tauri::{AppHandle, Manager, RunEvent};

use crate::{
    app_menu::TauriMenuSurface,
    append_desktop_log, append_startup_log, append_supervisor_log,
    desktop_bridge_commands::BridgeEventObserver,
    menu_handler,
    menu_presenter::MenuPresenter,
    process_handle::{OsProcessSpawner, ProcessEventSink},
    shell_config::ShellConfig,
    shutdown::{self, ShutdownCoordinator},
    supervisor::Supervisor,
    tray_presenter::TrayPresenter,
    tray_setup::{self, TauriTraySurface},
    ui_dispatch::MainThreadEventSink,
    window_actions::{self, DelayedWindowReloader},
    with_supervisor, SupervisorCell, DESKTOP_LOG_FILE,
};

fn build_supervisor(app_handle: &AppHandle, config: &ShellConfig) -> Supervisor {
    let sink: Arc<dyn ProcessEventSink> = Arc::new(MainThreadEventSink::new(app_handle.clone()));
    let mut supervisor = Supervisor::new(
        config.backend_path.clone(),
        config.reload_delay,
        Box::new(OsProcessSpawner::new(sink, config.exit_poll_interval)),
        Box::new(DelayedWindowReloader::new(app_handle.clone())),
        append_supervisor_log,
    );
    supervisor.add_observer(Box::new(MenuPresenter::new(
        TauriMenuSurface::new(app_handle.clone()),
        append_desktop_log,
    )));
    supervisor.add_observer(Box::new(TrayPresenter::new(
        TauriTraySurface::new(app_handle.clone()),
        append_desktop_log,
    )));
    supervisor.add_observer(Box::new(BridgeEventObserver::new(app_handle.clone())));
    supervisor
}

pub(crate) fn run() {
    append_startup_log("desktop process starting");
    append_startup_log(&format!(
        "desktop log path: {}",
        crate::logging::resolve_desktop_log_path(
            crate::runtime_paths::default_root_dir(),
            DESKTOP_LOG_FILE,
        )
        .display()
    ));

    tauri::Builder::default()
        .plugin(tauri_plugin_single_instance::init(|app, _argv, _cwd| {
            append_desktop_log("second instance launch detected, focusing main window");
            window_actions::show_main_window(app, append_desktop_log);
        }))
        .manage(ShutdownCoordinator::default())
        .invoke_handler(tauri::generate_handler![
            crate::desktop_bridge_commands::backend_get_state,
            crate::desktop_bridge_commands::backend_start,
            crate::desktop_bridge_commands::backend_stop,
        ])
        .on_menu_event(|app, event| menu_handler::handle_menu_event(app, event.id().as_ref()))
        .setup(|app| {
            let app_handle = app.handle().clone();
            let config = ShellConfig::from_app(&app_handle, append_startup_log)?;
            append_startup_log(&format!("backend path: {}", config.backend_path.display()));
            append_startup_log(&format!("content url: {}", config.content_url));

            window_actions::create_main_window(&app_handle, &config.content_url)?;
            if let Err(error) = tray_setup::setup_tray(&app_handle) {
                append_startup_log(&format!("failed to initialize tray: {error}"));
            }

            let supervisor = build_supervisor(&app_handle, &config);
            supervisor.refresh_observers();
            let auto_start = config.auto_start;
            app_handle.manage(SupervisorCell::new(supervisor));
            app_handle.manage(config);

            if auto_start {
                append_startup_log("backend auto start enabled");
                with_supervisor(&app_handle, Supervisor::start);
            }
            Ok(())
        })
        .build(tauri::generate_context!())
        .expect("error while building tauri application")
        .run(|app_handle, event| match event {
            RunEvent::ExitRequested { .. } => shutdown::handle_exit_requested(app_handle),
            RunEvent::Exit => shutdown::handle_exit_event(app_handle),
            _ => {}
        });
}
