use tauri::AppHandle;

use crate::{
    append_supervisor_log,
    error::ShellError,
    process_handle::{ProcessEvent, ProcessEventSink},
    with_supervisor,
};

pub(crate) fn run_on_main_thread_dispatch<F>(
    app_handle: &AppHandle,
    task_name: &str,
    task: F,
) -> Result<(), ShellError>
where
    F: FnOnce(&AppHandle) + Send + 'static,
{
    let main_app = app_handle.clone();
    app_handle
        .run_on_main_thread(move || task(&main_app))
        .map_err(|error| ShellError::Dispatch {
            task: task_name.to_string(),
            reason: error.to_string(),
        })
}

/// Queues process events onto the main thread, where the supervisor lives.
pub(crate) struct MainThreadEventSink {
    app_handle: AppHandle,
}

impl MainThreadEventSink {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl ProcessEventSink for MainThreadEventSink {
    fn post(&self, event: ProcessEvent) {
        let handle = event.handle;
        let dispatched =
            run_on_main_thread_dispatch(&self.app_handle, "backend process event", move |app| {
                with_supervisor(app, |supervisor| supervisor.handle_event(event));
            });
        if let Err(error) = dispatched {
            append_supervisor_log(&format!("dropping event for backend {handle}: {error}"));
        }
    }
}
