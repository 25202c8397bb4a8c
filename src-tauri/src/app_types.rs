use std::sync::Mutex;

use serde::Serialize;
use tauri::{AppHandle, Manager};

use crate::{
    append_desktop_log,
    supervisor::{Phase, Supervisor},
};

/// Managed home of the single supervisor. Only the main thread mutates it; the
/// mutex exists because managed state must be `Sync`.
pub(crate) struct SupervisorCell {
    inner: Mutex<Supervisor>,
}

impl SupervisorCell {
    pub(crate) fn new(supervisor: Supervisor) -> Self {
        Self {
            inner: Mutex::new(supervisor),
        }
    }

    pub(crate) fn with<T>(&self, f: impl FnOnce(&mut Supervisor) -> T) -> T {
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(error) => {
                append_desktop_log(&format!("supervisor lock poisoned, recovering: {error}"));
                error.into_inner()
            }
        };
        f(&mut guard)
    }
}

pub(crate) fn with_supervisor<T>(
    app_handle: &AppHandle,
    f: impl FnOnce(&mut Supervisor) -> T,
) -> Option<T> {
    let Some(cell) = app_handle.try_state::<SupervisorCell>() else {
        append_desktop_log("supervisor is not initialized yet");
        return None;
    };
    Some(cell.with(f))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BackendBridgeState {
    pub(crate) phase: Phase,
    pub(crate) running: bool,
}

impl From<Phase> for BackendBridgeState {
    fn from(phase: Phase) -> Self {
        Self {
            phase,
            running: !phase.is_stopped(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BackendBridgeResult {
    pub(crate) ok: bool,
    pub(crate) reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_state_serializes_as_camel_case_json() {
        let value = serde_json::to_value(BackendBridgeState::from(Phase::Running))
            .expect("serializable");
        assert_eq!(value, serde_json::json!({ "phase": "running", "running": true }));

        let value = serde_json::to_value(BackendBridgeState::from(Phase::Stopped))
            .expect("serializable");
        assert_eq!(value, serde_json::json!({ "phase": "stopped", "running": false }));
    }

    #[test]
    fn bridge_result_reports_reason() {
        let value = serde_json::to_value(BackendBridgeResult {
            ok: false,
            reason: Some("main thread unavailable".to_string()),
        })
        .expect("serializable");
        assert_eq!(
            value,
            serde_json::json!({ "ok": false, "reason": "main thread unavailable" })
        );
    }
}
