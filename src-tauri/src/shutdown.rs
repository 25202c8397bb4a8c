use std::sync::atomic::{AtomicBool, Ordering};

use tauri::{AppHandle, Manager};

use crate::{
    append_shutdown_log, process_handle::HandleId, supervisor::Supervisor, with_supervisor,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShutdownOutcome {
    TerminationRequested(HandleId),
    NothingRunning,
    AlreadyHandled,
}

/// Sends the backend one termination request when the application is about to quit.
///
/// The request is fire-and-forget: the shell does not wait for the backend to exit,
/// and the UI is not updated because it is being torn down.
#[derive(Debug, Default)]
pub(crate) struct ShutdownCoordinator {
    handled: AtomicBool,
}

impl ShutdownCoordinator {
    pub(crate) fn on_about_to_quit(&self, supervisor: &mut Supervisor) -> ShutdownOutcome {
        if self
            .handled
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return ShutdownOutcome::AlreadyHandled;
        }

        match supervisor.terminate_for_shutdown() {
            Some(id) => ShutdownOutcome::TerminationRequested(id),
            None => ShutdownOutcome::NothingRunning,
        }
    }
}

pub(crate) fn handle_exit_requested(app_handle: &AppHandle) {
    run_shutdown_hook(app_handle, "exit requested");
}

pub(crate) fn handle_exit_event(app_handle: &AppHandle) {
    run_shutdown_hook(app_handle, "exit");
}

fn run_shutdown_hook(app_handle: &AppHandle, trigger: &str) {
    let Some(coordinator) = app_handle.try_state::<ShutdownCoordinator>() else {
        return;
    };

    match with_supervisor(app_handle, |supervisor| coordinator.on_about_to_quit(supervisor)) {
        Some(ShutdownOutcome::TerminationRequested(id)) => append_shutdown_log(&format!(
            "{trigger}: termination requested for backend {id}, not waiting for exit"
        )),
        Some(ShutdownOutcome::NothingRunning) => {
            append_shutdown_log(&format!("{trigger}: backend not running"))
        }
        Some(ShutdownOutcome::AlreadyHandled) | None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        supervisor::{Phase, StartOutcome},
        test_support::harness,
    };

    #[test]
    fn quitting_while_running_terminates_once_without_notifying() {
        let mut h = harness();
        let StartOutcome::Started(id) = h.supervisor.start() else {
            panic!("expected a fresh handle");
        };
        let coordinator = ShutdownCoordinator::default();

        assert_eq!(
            coordinator.on_about_to_quit(&mut h.supervisor),
            ShutdownOutcome::TerminationRequested(id)
        );
        assert_eq!(
            coordinator.on_about_to_quit(&mut h.supervisor),
            ShutdownOutcome::AlreadyHandled
        );

        assert_eq!(h.ledger.terminated(), vec![id]);
        assert_eq!(h.phases.phases(), vec![Phase::Running]);
        assert_eq!(h.supervisor.phase(), Phase::Running);
    }

    #[test]
    fn quitting_while_stopped_does_nothing() {
        let mut h = harness();
        let coordinator = ShutdownCoordinator::default();

        assert_eq!(
            coordinator.on_about_to_quit(&mut h.supervisor),
            ShutdownOutcome::NothingRunning
        );

        assert!(h.ledger.terminated().is_empty());
        assert!(h.phases.phases().is_empty());
    }

    #[test]
    fn quitting_after_stop_does_not_terminate_again() {
        let mut h = harness();
        h.supervisor.start();
        h.supervisor.stop();
        let terminated_before = h.ledger.terminated();

        assert_eq!(
            ShutdownCoordinator::default().on_about_to_quit(&mut h.supervisor),
            ShutdownOutcome::NothingRunning
        );
        assert_eq!(h.ledger.terminated(), terminated_before);
    }
}
