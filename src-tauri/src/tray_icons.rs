use image::imageops::{self, FilterType};
use tauri::image::Image;

use crate::{error::ShellError, tray_presenter::TrayIconAsset, TRAY_ICON_SIZE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrayIconPixels {
    pub(crate) rgba: Vec<u8>,
    pub(crate) width: u32,
    pub(crate) height: u32,
}

pub(crate) fn decode_tray_icon(
    asset: TrayIconAsset,
    size: u32,
) -> Result<TrayIconPixels, ShellError> {
    let decoded = image::load_from_memory(asset.png_bytes())?.into_rgba8();
    let resized = imageops::resize(&decoded, size, size, FilterType::Lanczos3);
    let (width, height) = resized.dimensions();
    Ok(TrayIconPixels {
        rgba: resized.into_raw(),
        width,
        height,
    })
}

pub(crate) fn tray_image(asset: TrayIconAsset) -> Result<Image<'static>, ShellError> {
    let pixels = decode_tray_icon(asset, TRAY_ICON_SIZE)?;
    Ok(Image::new_owned(pixels.rgba, pixels.width, pixels.height))
}
