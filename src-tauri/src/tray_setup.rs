use tauri::{
    tray::{MouseButton, MouseButtonState, TrayIconBuilder, TrayIconEvent},
    AppHandle,
};

use crate::{
    app_menu, append_desktop_log,
    error::ShellError,
    supervisor::Phase,
    tray_icons,
    tray_presenter::{tray_view, TraySurface, TrayView},
    window_actions, TRAY_ID,
};

pub fn setup_tray(app_handle: &AppHandle) -> Result<(), ShellError> {
    let view = tray_view(Phase::Stopped);
    let menu = app_menu::build_entries_menu(app_handle, &view.menu)?;

    // Menu clicks arrive through the app-wide menu handler.
    let tray_builder = TrayIconBuilder::with_id(TRAY_ID)
        .menu(&menu)
        .tooltip(view.visual.tooltip)
        .icon(tray_icons::tray_image(view.visual.icon)?)
        .show_menu_on_left_click(false)
        .on_tray_icon_event(|tray, event| {
            if let TrayIconEvent::Click {
                button: MouseButton::Left,
                button_state: MouseButtonState::Up,
                ..
            } = event
            {
                window_actions::show_main_window(tray.app_handle(), append_desktop_log);
            }
        });

    tray_builder.build(app_handle)?;
    Ok(())
}

pub(crate) struct TauriTraySurface {
    app_handle: AppHandle,
}

impl TauriTraySurface {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl TraySurface for TauriTraySurface {
    fn render(&self, view: &TrayView) -> Result<(), ShellError> {
        let Some(tray) = self.app_handle.tray_by_id(TRAY_ID) else {
            // Setup already logged why the tray is missing.
            return Ok(());
        };

        tray.set_icon(Some(tray_icons::tray_image(view.visual.icon)?))?;
        tray.set_tooltip(Some(view.visual.tooltip))?;
        tray.set_menu(Some(app_menu::build_entries_menu(
            &self.app_handle,
            &view.menu,
        )?))?;
        Ok(())
    }
}
