pub const MENU_START_BACKEND: &str = "backend_start";
pub const MENU_STOP_BACKEND: &str = "backend_stop";
pub const MENU_QUIT: &str = "app_quit";
pub const MENU_RELOAD: &str = "view_reload";
pub const MENU_FORCE_RELOAD: &str = "view_force_reload";
pub const MENU_TOGGLE_DEVTOOLS: &str = "view_toggle_devtools";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    StartBackend,
    StopBackend,
    Quit,
    Reload,
    ForceReload,
    ToggleDevTools,
}

pub fn action_from_menu_id(menu_id: &str) -> Option<MenuAction> {
    match menu_id {
        MENU_START_BACKEND => Some(MenuAction::StartBackend),
        MENU_STOP_BACKEND => Some(MenuAction::StopBackend),
        MENU_QUIT => Some(MenuAction::Quit),
        MENU_RELOAD => Some(MenuAction::Reload),
        MENU_FORCE_RELOAD => Some(MenuAction::ForceReload),
        MENU_TOGGLE_DEVTOOLS => Some(MenuAction::ToggleDevTools),
        _ => None,
    }
}
