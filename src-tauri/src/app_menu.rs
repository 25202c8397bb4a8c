use tauri::{
    menu::{IsMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu},
    AppHandle, Wry,
};

use crate::{
    error::ShellError,
    menu_presenter::{MenuEntry, MenuModel, MenuSurface},
};

fn append_entries<F>(
    app_handle: &AppHandle,
    entries: &[MenuEntry],
    mut append: F,
) -> tauri::Result<()>
where
    F: FnMut(&dyn IsMenuItem<Wry>) -> tauri::Result<()>,
{
    for entry in entries {
        match entry {
            MenuEntry::Command(command) => {
                let item = MenuItem::with_id(
                    app_handle,
                    command.id,
                    command.label,
                    command.enabled,
                    command.accelerator,
                )?;
                append(&item)?;
            }
            MenuEntry::Separator => {
                let separator = PredefinedMenuItem::separator(app_handle)?;
                append(&separator)?;
            }
        }
    }
    Ok(())
}

/// Flat menu for the tray icon.
pub(crate) fn build_entries_menu(
    app_handle: &AppHandle,
    entries: &[MenuEntry],
) -> Result<Menu<Wry>, ShellError> {
    let menu = Menu::new(app_handle)?;
    append_entries(app_handle, entries, |item| menu.append(item))?;
    Ok(menu)
}

pub(crate) fn build_application_menu(
    app_handle: &AppHandle,
    model: &MenuModel,
) -> Result<Menu<Wry>, ShellError> {
    let menu = Menu::new(app_handle)?;
    for submenu_model in &model.submenus {
        let submenu = Submenu::new(app_handle, submenu_model.label, true)?;
        append_entries(app_handle, &submenu_model.entries, |item| submenu.append(item))?;
        menu.append(&submenu)?;
    }
    Ok(menu)
}

/// Replaces the application menu wholesale on every render.
pub(crate) struct TauriMenuSurface {
    app_handle: AppHandle,
}

impl TauriMenuSurface {
    pub(crate) fn new(app_handle: AppHandle) -> Self {
        Self { app_handle }
    }
}

impl MenuSurface for TauriMenuSurface {
    fn render(&self, model: &MenuModel) -> Result<(), ShellError> {
        let menu = build_application_menu(&self.app_handle, model)?;
        self.app_handle.set_menu(menu)?;
        Ok(())
    }
}
