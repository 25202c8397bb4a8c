use crate::{
    error::ShellError,
    menu_presenter::{backend_entries, MenuEntry},
    supervisor::{Phase, PhaseObserver},
};

/// The only two visual states of the tray icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrayState {
    Running,
    Stopped,
}

impl From<Phase> for TrayState {
    fn from(phase: Phase) -> Self {
        if phase.is_stopped() {
            Self::Stopped
        } else {
            Self::Running
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrayIconAsset {
    Green,
    Red,
}

impl TrayIconAsset {
    pub(crate) fn png_bytes(self) -> &'static [u8] {
        match self {
            Self::Green => include_bytes!("../resources/icon-green.png"),
            Self::Red => include_bytes!("../resources/icon-red.png"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TrayVisual {
    pub(crate) icon: TrayIconAsset,
    pub(crate) tooltip: &'static str,
}

const RUNNING_VISUAL: TrayVisual = TrayVisual {
    icon: TrayIconAsset::Green,
    tooltip: "Backend: Running",
};

const STOPPED_VISUAL: TrayVisual = TrayVisual {
    icon: TrayIconAsset::Red,
    tooltip: "Backend: Stopped",
};

impl TrayState {
    pub(crate) const fn visual(self) -> TrayVisual {
        match self {
            Self::Running => RUNNING_VISUAL,
            Self::Stopped => STOPPED_VISUAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrayView {
    pub(crate) state: TrayState,
    pub(crate) visual: TrayVisual,
    pub(crate) menu: Vec<MenuEntry>,
}

pub(crate) fn tray_view(phase: Phase) -> TrayView {
    let state = TrayState::from(phase);
    TrayView {
        state,
        visual: state.visual(),
        menu: backend_entries(phase),
    }
}

pub(crate) trait TraySurface: Send {
    fn render(&self, view: &TrayView) -> Result<(), ShellError>;
}

pub(crate) struct TrayPresenter<S> {
    surface: S,
    log: fn(&str),
}

impl<S: TraySurface> TrayPresenter<S> {
    pub(crate) fn new(surface: S, log: fn(&str)) -> Self {
        Self { surface, log }
    }
}

impl<S: TraySurface> PhaseObserver for TrayPresenter<S> {
    fn name(&self) -> &'static str {
        "tray"
    }

    fn phase_changed(&self, phase: Phase) {
        if let Err(error) = self.surface.render(&tray_view(phase)) {
            (self.log)(&format!("failed to render tray for {phase}: {error}"));
        }
    }
}
