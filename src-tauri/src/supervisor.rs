use std::{fmt, path::PathBuf, time::Duration};

use serde::Serialize;

use crate::{
    error::SupervisorError,
    process_handle::{HandleId, ProcessControl, ProcessEvent, ProcessEventKind, ProcessSpawner},
};

/// Lifecycle phase of the supervised backend.
///
/// `Starting` and `Stopping` only exist inside a single `start()`/`stop()` call;
/// observers are notified with `Running` or `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Phase {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl Phase {
    pub(crate) fn is_stopped(self) -> bool {
        self == Self::Stopped
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Stopping => "stopping",
        };
        f.write_str(label)
    }
}

/// Synchronous phase listener. Runs on the event thread, so it must not block.
pub(crate) trait PhaseObserver: Send {
    fn name(&self) -> &'static str;
    fn phase_changed(&self, phase: Phase);
}

/// Schedules the one-shot content reload that follows a start request.
pub(crate) trait ContentReloader: Send {
    fn schedule_reload(&self, delay: Duration);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StartOutcome {
    Started(HandleId),
    AlreadyActive,
    /// Nothing could be launched or watched; the phase stayed `Stopped`.
    Failed(HandleId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StopOutcome {
    Stopped(HandleId),
    AlreadyStopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EventOutcome {
    Applied,
    Stale,
}

const RETIRING_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy)]
struct RetiringProcess {
    id: HandleId,
    pid: Option<u32>,
}

pub(crate) struct Supervisor {
    phase: Phase,
    tracked: Option<Box<dyn ProcessControl>>,
    retiring: Vec<RetiringProcess>,
    observers: Vec<Box<dyn PhaseObserver>>,
    spawner: Box<dyn ProcessSpawner>,
    reloader: Box<dyn ContentReloader>,
    program: PathBuf,
    reload_delay: Duration,
    next_handle: u64,
    log: fn(&str),
}

impl Supervisor {
    pub(crate) fn new(
        program: PathBuf,
        reload_delay: Duration,
        spawner: Box<dyn ProcessSpawner>,
        reloader: Box<dyn ContentReloader>,
        log: fn(&str),
    ) -> Self {
        Self {
            phase: Phase::Stopped,
            tracked: None,
            retiring: Vec::new(),
            observers: Vec::new(),
            spawner,
            reloader,
            program,
            reload_delay,
            next_handle: 1,
            log,
        }
    }

    pub(crate) fn add_observer(&mut self, observer: Box<dyn PhaseObserver>) {
        (self.log)(&format!("registered phase observer: {}", observer.name()));
        self.observers.push(observer);
    }

    pub(crate) fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) fn tracked_handle(&self) -> Option<HandleId> {
        self.tracked.as_ref().map(|handle| handle.id())
    }

    /// Re-renders every observer from the current phase without a transition.
    pub(crate) fn refresh_observers(&self) {
        self.notify(self.phase);
    }

    pub(crate) fn start(&mut self) -> StartOutcome {
        if !self.phase.is_stopped() {
            (self.log)(&format!("start ignored: backend is already {}", self.phase));
            return StartOutcome::AlreadyActive;
        }

        if !self.retiring.is_empty() {
            (self.log)(&format!(
                "starting while earlier backend(s) may still be exiting: {}",
                self.describe_retiring()
            ));
        }

        let id = HandleId::new(self.next_handle);
        self.next_handle += 1;
        (self.log)(&format!(
            "starting backend {id} from {}",
            self.program.display()
        ));

        self.phase = Phase::Starting;
        let handle = match self.spawner.spawn(id, &self.program) {
            Ok(handle) => handle,
            Err(error) => {
                self.phase = Phase::Stopped;
                (self.log)(&format!("backend {id} could not be started: {error}"));
                return StartOutcome::Failed(id);
            }
        };
        if let Some(pid) = handle.pid() {
            (self.log)(&format!("backend {id} spawned with pid {pid}"));
        }
        self.tracked = Some(handle);
        self.transition(Phase::Running);

        self.reloader.schedule_reload(self.reload_delay);
        StartOutcome::Started(id)
    }

    pub(crate) fn stop(&mut self) -> StopOutcome {
        let Some(handle) = self.tracked.take() else {
            (self.log)("stop ignored: backend is already stopped");
            return StopOutcome::AlreadyStopped;
        };

        self.phase = Phase::Stopping;
        let id = handle.id();
        match handle.terminate() {
            Ok(()) => self.retire(RetiringProcess {
                id,
                pid: handle.pid(),
            }),
            // No exit confirmation is expected for a handle that could not be signalled.
            Err(error) => {
                (self.log)(&format!("termination request for backend {id} failed: {error}"))
            }
        }
        (self.log)(&format!("backend {id} stop requested"));
        self.transition(Phase::Stopped);

        StopOutcome::Stopped(id)
    }

    pub(crate) fn handle_event(&mut self, event: ProcessEvent) -> EventOutcome {
        match event.kind {
            ProcessEventKind::Exited { code } => self.on_exit(event.handle, code),
            ProcessEventKind::Errored(error) => self.on_error(event.handle, error),
        }
    }

    pub(crate) fn on_exit(&mut self, id: HandleId, code: Option<i32>) -> EventOutcome {
        let code = code.map_or_else(|| "none (signal)".to_string(), |code| code.to_string());
        self.release_tracked(id, &format!("exited with code {code}"))
    }

    pub(crate) fn on_error(&mut self, id: HandleId, error: SupervisorError) -> EventOutcome {
        self.release_tracked(id, &format!("failed: {error}"))
    }

    /// Last-chance termination when the application quits. Skips the transition and
    /// observer notification because the UI is being torn down.
    pub(crate) fn terminate_for_shutdown(&mut self) -> Option<HandleId> {
        if self.phase.is_stopped() {
            return None;
        }

        let handle = self.tracked.as_ref()?;
        let id = handle.id();
        if let Err(error) = handle.terminate() {
            (self.log)(&format!("shutdown termination of backend {id} failed: {error}"));
        }
        Some(id)
    }

    fn release_tracked(&mut self, id: HandleId, what: &str) -> EventOutcome {
        if self.tracked_handle() != Some(id) {
            if let Some(index) = self.retiring.iter().position(|process| process.id == id) {
                self.retiring.swap_remove(index);
                (self.log)(&format!("stopped backend {id} {what}"));
            } else {
                (self.log)(&format!("ignoring stale event for backend {id}: {what}"));
            }
            return EventOutcome::Stale;
        }

        self.tracked = None;
        (self.log)(&format!("backend {id} {what}"));
        self.transition(Phase::Stopped);
        EventOutcome::Applied
    }

    fn retire(&mut self, process: RetiringProcess) {
        if self.retiring.len() == RETIRING_LIMIT {
            let forgotten = self.retiring.remove(0);
            (self.log)(&format!(
                "no exit confirmation from backend {}, no longer tracking it",
                forgotten.id
            ));
        }
        self.retiring.push(process);
    }

    #[cfg(test)]
    pub(crate) fn retiring_handles(&self) -> Vec<HandleId> {
        self.retiring.iter().map(|process| process.id).collect()
    }

    fn transition(&mut self, next: Phase) {
        let previous = self.phase;
        self.phase = next;
        (self.log)(&format!("phase {previous} -> {next}"));
        self.notify(next);
    }

    fn notify(&self, phase: Phase) {
        for observer in &self.observers {
            observer.phase_changed(phase);
        }
    }

    fn describe_retiring(&self) -> String {
        self.retiring
            .iter()
            .map(|process| match process.pid {
                Some(pid) => format!("{} (pid {pid})", process.id),
                None => process.id.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
