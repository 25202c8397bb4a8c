//! Fakes shared by the supervisor, presenter and shutdown tests.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use crate::{
    error::{ShellError, SupervisorError},
    menu_presenter::{MenuModel, MenuSurface},
    process_handle::{HandleId, ProcessControl, ProcessSpawner},
    supervisor::{ContentReloader, Phase, PhaseObserver, Supervisor},
    tray_presenter::{TraySurface, TrayView},
};

fn locked<T>(shared: &Arc<Mutex<T>>) -> MutexGuard<'_, T> {
    shared.lock().expect("test lock")
}

/// Records which handles were spawned and which were asked to terminate.
#[derive(Clone, Default)]
pub(crate) struct ProcessLedger {
    spawned: Arc<Mutex<Vec<HandleId>>>,
    terminated: Arc<Mutex<Vec<HandleId>>>,
    fail_terminate: Arc<Mutex<bool>>,
    fail_spawn: Arc<Mutex<bool>>,
}

impl ProcessLedger {
    pub(crate) fn spawned(&self) -> Vec<HandleId> {
        locked(&self.spawned).clone()
    }

    pub(crate) fn terminated(&self) -> Vec<HandleId> {
        locked(&self.terminated).clone()
    }

    pub(crate) fn fail_terminations(&self) {
        *locked(&self.fail_terminate) = true;
    }

    pub(crate) fn fail_spawns(&self) {
        *locked(&self.fail_spawn) = true;
    }
}

struct FakeProcess {
    id: HandleId,
    ledger: ProcessLedger,
}

impl ProcessControl for FakeProcess {
    fn id(&self) -> HandleId {
        self.id
    }

    fn pid(&self) -> Option<u32> {
        Some(4242)
    }

    fn terminate(&self) -> Result<(), SupervisorError> {
        locked(&self.ledger.terminated).push(self.id);
        if *locked(&self.ledger.fail_terminate) {
            return Err(SupervisorError::Terminate {
                pid: 4242,
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        Ok(())
    }
}

pub(crate) struct FakeSpawner {
    ledger: ProcessLedger,
}

impl ProcessSpawner for FakeSpawner {
    fn spawn(
        &self,
        id: HandleId,
        _program: &Path,
    ) -> Result<Box<dyn ProcessControl>, SupervisorError> {
        if *locked(&self.ledger.fail_spawn) {
            return Err(SupervisorError::Watcher(std::io::Error::new(
                std::io::ErrorKind::WouldBlock,
                "thread limit reached",
            )));
        }
        locked(&self.ledger.spawned).push(id);
        Ok(Box::new(FakeProcess {
            id,
            ledger: self.ledger.clone(),
        }))
    }
}

#[derive(Clone, Default)]
pub(crate) struct PhaseRecorder {
    phases: Arc<Mutex<Vec<Phase>>>,
}

impl PhaseRecorder {
    pub(crate) fn phases(&self) -> Vec<Phase> {
        locked(&self.phases).clone()
    }
}

impl PhaseObserver for PhaseRecorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn phase_changed(&self, phase: Phase) {
        locked(&self.phases).push(phase);
    }
}

#[derive(Clone, Default)]
pub(crate) struct ReloadRecorder {
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl ReloadRecorder {
    pub(crate) fn delays(&self) -> Vec<Duration> {
        locked(&self.delays).clone()
    }
}

impl ContentReloader for ReloadRecorder {
    fn schedule_reload(&self, delay: Duration) {
        locked(&self.delays).push(delay);
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingMenu {
    rendered: Arc<Mutex<Vec<MenuModel>>>,
    fail: bool,
}

impl RecordingMenu {
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn rendered(&self) -> Vec<MenuModel> {
        locked(&self.rendered).clone()
    }
}

impl MenuSurface for RecordingMenu {
    fn render(&self, model: &MenuModel) -> Result<(), ShellError> {
        if self.fail {
            return Err(ShellError::Config("menu surface offline".to_string()));
        }
        locked(&self.rendered).push(model.clone());
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingTray {
    rendered: Arc<Mutex<Vec<TrayView>>>,
}

impl RecordingTray {
    pub(crate) fn rendered(&self) -> Vec<TrayView> {
        locked(&self.rendered).clone()
    }
}

impl TraySurface for RecordingTray {
    fn render(&self, view: &TrayView) -> Result<(), ShellError> {
        locked(&self.rendered).push(view.clone());
        Ok(())
    }
}

pub(crate) const TEST_RELOAD_DELAY: Duration = Duration::from_millis(1000);

pub(crate) struct Harness {
    pub(crate) supervisor: Supervisor,
    pub(crate) ledger: ProcessLedger,
    pub(crate) phases: PhaseRecorder,
    pub(crate) reloads: ReloadRecorder,
}

/// A supervisor wired to fakes, with one phase recorder attached.
pub(crate) fn harness() -> Harness {
    let ledger = ProcessLedger::default();
    let phases = PhaseRecorder::default();
    let reloads = ReloadRecorder::default();
    let mut supervisor = Supervisor::new(
        "/opt/paza/myapp".into(),
        TEST_RELOAD_DELAY,
        Box::new(FakeSpawner {
            ledger: ledger.clone(),
        }),
        Box::new(reloads.clone()),
        |_| {},
    );
    supervisor.add_observer(Box::new(phases.clone()));
    Harness {
        supervisor,
        ledger,
        phases,
        reloads,
    }
}

/// Stopped with nothing tracked, or not stopped with a handle tracked.
pub(crate) fn assert_tracking_matches_phase(supervisor: &Supervisor) {
    assert_eq!(
        supervisor.phase().is_stopped(),
        supervisor.tracked_handle().is_none(),
        "phase {} with tracked {:?}",
        supervisor.phase(),
        supervisor.tracked_handle()
    );
}
