use std::{
    fmt, io,
    path::Path,
    process::{Child, Command, Stdio},
    sync::{Arc, Mutex, PoisonError},
    thread,
    time::Duration,
};

use crate::{error::SupervisorError, EXIT_WATCHER_THREAD_NAME};

/// Identity of one spawn attempt. Never reused within a shell run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct HandleId(u64);

impl HandleId {
    pub(crate) const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
pub(crate) enum ProcessEventKind {
    Exited { code: Option<i32> },
    Errored(SupervisorError),
}

/// Terminal event of a handle. Exactly one is posted per handle.
#[derive(Debug)]
pub(crate) struct ProcessEvent {
    pub(crate) handle: HandleId,
    pub(crate) kind: ProcessEventKind,
}

/// Receives terminal events from watcher threads.
///
/// Implementations must queue the event for the supervisor's event thread instead of
/// handling it inline: `post` is called from arbitrary threads.
pub(crate) trait ProcessEventSink: Send + Sync {
    fn post(&self, event: ProcessEvent);
}

impl<F> ProcessEventSink for F
where
    F: Fn(ProcessEvent) + Send + Sync,
{
    fn post(&self, event: ProcessEvent) {
        self(event)
    }
}

/// The supervisor's view of a launched backend.
pub(crate) trait ProcessControl: Send {
    fn id(&self) -> HandleId;
    fn pid(&self) -> Option<u32>;
    /// Requests termination and returns without waiting for the exit event.
    fn terminate(&self) -> Result<(), SupervisorError>;
}

pub(crate) trait ProcessSpawner: Send {
    /// Launch failures arrive later as an `Errored` event. `Err` means no thread could
    /// be started to report the outcome, so the caller must handle it directly.
    fn spawn(
        &self,
        id: HandleId,
        program: &Path,
    ) -> Result<Box<dyn ProcessControl>, SupervisorError>;
}

type ChildSlot = Arc<Mutex<Option<Child>>>;

pub(crate) struct ProcessHandle {
    id: HandleId,
    pid: Option<u32>,
    child: ChildSlot,
}

impl ProcessHandle {
    /// Never calls `sink` on the calling thread.
    pub(crate) fn spawn(
        id: HandleId,
        program: &Path,
        poll_interval: Duration,
        sink: Arc<dyn ProcessEventSink>,
    ) -> Result<Self, SupervisorError> {
        let child: ChildSlot = Arc::new(Mutex::new(None));
        let mut handle = Self {
            id,
            pid: None,
            child: Arc::clone(&child),
        };

        let spawned = match detached_command(program).spawn() {
            Ok(spawned) => spawned,
            Err(source) => {
                report_spawn_failure(id, program, source, sink)?;
                return Ok(handle);
            }
        };

        let pid = spawned.id();
        handle.pid = Some(pid);
        *lock_child(&child) = Some(spawned);

        let watcher = thread::Builder::new()
            .name(format!("{EXIT_WATCHER_THREAD_NAME}-{}", id.0))
            .spawn(move || watch_for_exit(id, pid, child, poll_interval, sink));
        if let Err(error) = watcher {
            // Nobody would ever report this child's exit, so do not leave it running.
            if let Some(mut orphan) = lock_child(&handle.child).take() {
                let _ = orphan.kill();
                let _ = orphan.wait();
            }
            return Err(SupervisorError::Watcher(error));
        }

        Ok(handle)
    }
}

impl ProcessControl for ProcessHandle {
    fn id(&self) -> HandleId {
        self.id
    }

    fn pid(&self) -> Option<u32> {
        self.pid
    }

    fn terminate(&self) -> Result<(), SupervisorError> {
        // The lock keeps the watcher from reaping the child while it is signalled.
        let mut guard = lock_child(&self.child);
        let Some(child) = guard.as_mut() else {
            return Ok(());
        };

        let pid = child.id();
        request_termination(child).map_err(|source| SupervisorError::Terminate { pid, source })
    }
}

#[cfg(unix)]
fn request_termination(child: &mut Child) -> io::Result<()> {
    use nix::{
        sys::signal::{self, Signal},
        unistd::Pid,
    };

    let raw_pid = i32::try_from(child.id())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "pid out of range"))?;
    signal::kill(Pid::from_raw(raw_pid), Signal::SIGTERM).map_err(io::Error::from)
}

#[cfg(not(unix))]
fn request_termination(child: &mut Child) -> io::Result<()> {
    child.kill()
}

/// Spawns real OS processes and reports their exits through `sink`.
pub(crate) struct OsProcessSpawner {
    sink: Arc<dyn ProcessEventSink>,
    poll_interval: Duration,
}

impl OsProcessSpawner {
    pub(crate) fn new(sink: Arc<dyn ProcessEventSink>, poll_interval: Duration) -> Self {
        Self {
            sink,
            poll_interval,
        }
    }
}

impl ProcessSpawner for OsProcessSpawner {
    fn spawn(
        &self,
        id: HandleId,
        program: &Path,
    ) -> Result<Box<dyn ProcessControl>, SupervisorError> {
        let handle =
            ProcessHandle::spawn(id, program, self.poll_interval, Arc::clone(&self.sink))?;
        Ok(Box::new(handle))
    }
}

fn detached_command(program: &Path) -> Command {
    let mut command = Command::new(program);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;
        command.creation_flags(crate::CREATE_NO_WINDOW);
    }

    command
}

fn lock_child(child: &ChildSlot) -> std::sync::MutexGuard<'_, Option<Child>> {
    child.lock().unwrap_or_else(PoisonError::into_inner)
}

fn report_spawn_failure(
    id: HandleId,
    program: &Path,
    source: io::Error,
    sink: Arc<dyn ProcessEventSink>,
) -> Result<(), SupervisorError> {
    let (kind, message) = (source.kind(), source.to_string());
    let error = SupervisorError::Spawn {
        program: program.to_path_buf(),
        source,
    };

    thread::Builder::new()
        .name(format!("{EXIT_WATCHER_THREAD_NAME}-{}", id.0))
        .spawn(move || {
            sink.post(ProcessEvent {
                handle: id,
                kind: ProcessEventKind::Errored(error),
            });
        })
        .map(|_| ())
        .map_err(|_| SupervisorError::Spawn {
            program: program.to_path_buf(),
            source: io::Error::new(kind, message),
        })
}

fn watch_for_exit(
    id: HandleId,
    pid: u32,
    child: ChildSlot,
    poll_interval: Duration,
    sink: Arc<dyn ProcessEventSink>,
) {
    loop {
        let polled = {
            let mut guard = lock_child(&child);
            let Some(process) = guard.as_mut() else {
                return;
            };
            match process.try_wait() {
                Ok(Some(status)) => {
                    guard.take();
                    Some(ProcessEventKind::Exited {
                        code: status.code(),
                    })
                }
                Ok(None) => None,
                Err(source) => {
                    if let Some(mut orphan) = guard.take() {
                        let _ = orphan.kill();
                    }
                    Some(ProcessEventKind::Errored(SupervisorError::Poll { pid, source }))
                }
            }
        };

        if let Some(kind) = polled {
            sink.post(ProcessEvent { handle: id, kind });
            return;
        }
        thread::sleep(poll_interval);
    }
}
