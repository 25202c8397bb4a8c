use crate::{
    error::ShellError,
    menu_actions::{
        MENU_FORCE_RELOAD, MENU_QUIT, MENU_RELOAD, MENU_START_BACKEND, MENU_STOP_BACKEND,
        MENU_TOGGLE_DEVTOOLS,
    },
    supervisor::{Phase, PhaseObserver},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MenuCommand {
    pub(crate) id: &'static str,
    pub(crate) label: &'static str,
    pub(crate) enabled: bool,
    pub(crate) accelerator: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MenuEntry {
    Command(MenuCommand),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SubmenuModel {
    pub(crate) label: &'static str,
    pub(crate) entries: Vec<MenuEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MenuModel {
    pub(crate) submenus: Vec<SubmenuModel>,
}

#[cfg(test)]
impl MenuModel {
    pub(crate) fn command(&self, id: &str) -> Option<&MenuCommand> {
        self.submenus
            .iter()
            .flat_map(|submenu| submenu.entries.iter())
            .find_map(|entry| match entry {
                MenuEntry::Command(command) if command.id == id => Some(command),
                _ => None,
            })
    }
}

fn command(id: &'static str, label: &'static str, enabled: bool) -> MenuEntry {
    MenuEntry::Command(MenuCommand {
        id,
        label,
        enabled,
        accelerator: None,
    })
}

fn command_with_accelerator(
    id: &'static str,
    label: &'static str,
    accelerator: &'static str,
) -> MenuEntry {
    MenuEntry::Command(MenuCommand {
        id,
        label,
        enabled: true,
        accelerator: Some(accelerator),
    })
}

/// Start/Stop/Quit block shared by the application menu and the tray menu.
pub(crate) fn backend_entries(phase: Phase) -> Vec<MenuEntry> {
    let stopped = phase.is_stopped();
    vec![
        command(MENU_START_BACKEND, "Start Backend", stopped),
        command(MENU_STOP_BACKEND, "Stop Backend", !stopped),
        MenuEntry::Separator,
        command(MENU_QUIT, "Quit", true),
    ]
}

pub(crate) fn application_menu(phase: Phase) -> MenuModel {
    MenuModel {
        submenus: vec![
            SubmenuModel {
                label: "Service",
                entries: backend_entries(phase),
            },
            SubmenuModel {
                label: "View",
                entries: vec![
                    command_with_accelerator(MENU_RELOAD, "Reload", "CmdOrCtrl+R"),
                    command_with_accelerator(
                        MENU_FORCE_RELOAD,
                        "Force Reload",
                        "CmdOrCtrl+Shift+R",
                    ),
                    command_with_accelerator(
                        MENU_TOGGLE_DEVTOOLS,
                        "Toggle Developer Tools",
                        "CmdOrCtrl+Alt+I",
                    ),
                ],
            },
        ],
    }
}

pub(crate) trait MenuSurface: Send {
    fn render(&self, model: &MenuModel) -> Result<(), ShellError>;
}

/// Rebuilds the whole application menu on every phase notification.
pub(crate) struct MenuPresenter<S> {
    surface: S,
    log: fn(&str),
}

impl<S: MenuSurface> MenuPresenter<S> {
    pub(crate) fn new(surface: S, log: fn(&str)) -> Self {
        Self { surface, log }
    }
}

impl<S: MenuSurface> PhaseObserver for MenuPresenter<S> {
    fn name(&self) -> &'static str {
        "application-menu"
    }

    fn phase_changed(&self, phase: Phase) {
        if let Err(error) = self.surface.render(&application_menu(phase)) {
            (self.log)(&format!("failed to render application menu for {phase}: {error}"));
        }
    }
}
