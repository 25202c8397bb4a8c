use tauri::{AppHandle, Emitter};

use crate::{
    append_desktop_log,
    supervisor::{Phase, PhaseObserver, Supervisor},
    ui_dispatch, with_supervisor, BackendBridgeResult, BackendBridgeState, PHASE_CHANGED_EVENT,
};

fn dispatch_backend_command<F>(
    app_handle: &AppHandle,
    task_name: &str,
    command: F,
) -> BackendBridgeResult
where
    F: FnOnce(&mut Supervisor) + Send + 'static,
{
    match ui_dispatch::run_on_main_thread_dispatch(app_handle, task_name, move |main_app| {
        with_supervisor(main_app, command);
    }) {
        Ok(()) => BackendBridgeResult {
            ok: true,
            reason: None,
        },
        Err(error) => {
            append_desktop_log(&error.to_string());
            BackendBridgeResult {
                ok: false,
                reason: Some(error.to_string()),
            }
        }
    }
}

#[tauri::command]
pub(crate) fn backend_get_state(app_handle: AppHandle) -> BackendBridgeState {
    with_supervisor(&app_handle, |supervisor| supervisor.phase())
        .unwrap_or(Phase::Stopped)
        .into()
}

#[tauri::command]
pub(crate) fn backend_start(app_handle: AppHandle) -> BackendBridgeResult {
    dispatch_backend_command(&app_handle, "bridge backend start", |supervisor| {
        supervisor.start();
    })
}

#[tauri::command]
pub(crate) fn backend_stop(app_handle: AppHandle) -> BackendBridgeResult {
    dispatch_backend_command(&app_handle, "bridge backend stop", |supervisor| {
        supervisor.stop();
    })
}

/// Tells the loaded page about phase changes.
pub(crate) struct BridgeEventObserver {
    app_handle: AppHandle,
}

impl BridgeEventObserver {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl PhaseObserver for BridgeEventObserver {
    fn name(&self) -> &'static str {
        "webview-bridge"
    }

    fn phase_changed(&self, phase: Phase) {
        if let Err(error) = self
            .app_handle
            .emit(PHASE_CHANGED_EVENT, BackendBridgeState::from(phase))
        {
            append_desktop_log(&format!("failed to emit {PHASE_CHANGED_EVENT}: {error}"));
        }
    }
}
