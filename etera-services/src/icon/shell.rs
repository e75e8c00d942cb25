// SPDX-License-Identifier: LGPL-3.0-only
//! File type icons from the Windows shell system image lists.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::os::windows::ffi::OsStrExt;

use image::RgbaImage;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{HWND, SIZE};
use windows::Win32::Graphics::Gdi::{
    CreateCompatibleDC, CreateDIBSection, DeleteDC, DeleteObject, GetDC, GetDIBits, ReleaseDC,
    SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB, DIB_RGB_COLORS,
};
use windows::Win32::Storage::FileSystem::FILE_ATTRIBUTE_NORMAL;
use windows::Win32::UI::Controls::IImageList;
use windows::Win32::UI::Shell::{
    SHGetFileInfoW, SHGetImageList, SHFILEINFOW, SHGFI_SYSICONINDEX, SHGFI_USEFILEATTRIBUTES,
    SHIL_EXTRALARGE, SHIL_JUMBO, SHIL_LARGE,
};
use windows::Win32::UI::WindowsAndMessaging::{
    DestroyIcon, DrawIconEx, GetIconInfo, DI_NORMAL, HICON, ICONINFO,
};

use crate::icon::pixmaps::Icon;
use crate::icon::source::{NativeIcon, NativeIconSource};
use crate::settings::DEFAULT_JUMBO_WORKAROUND;

const ILD_TRANSPARENT: u32 = 0x1;

/// [`NativeIconSource`] keyed by file extension, backed by `SHGetFileInfoW`.
///
/// Extensions listed in `jumbo_workaround` skip the jumbo image list, whose
/// icon is a small glyph on a blank canvas for them, and are centered
/// instead of stretched.
#[derive(Debug, Clone)]
pub struct ShellExtensionIcons {
    jumbo_workaround: HashSet<String>,
}

impl ShellExtensionIcons {
    /// Create the source.
    pub fn new<I, S>(jumbo_workaround: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            jumbo_workaround: jumbo_workaround.into_iter().map(Into::into).collect(),
        }
    }

    fn needs_workaround(&self, extension: &str) -> bool {
        self.jumbo_workaround.contains(extension)
    }
}

impl Default for ShellExtensionIcons {
    fn default() -> Self {
        Self::new(DEFAULT_JUMBO_WORKAROUND.iter().copied())
    }
}

impl NativeIconSource for ShellExtensionIcons {
    fn name(&self) -> &'static str {
        "shell"
    }

    fn lookup(&self, key: &str) -> NativeIcon {
        let Some(index) = system_icon_index(key) else {
            log::debug!("ShellExtensionIcons: SHGetFileInfoW failed for '.{}'", key);
            return NativeIcon::Unavailable;
        };
        if index == 0 {
            return NativeIcon::Missing;
        }

        let workaround = self.needs_workaround(key);
        let mut lists = vec![SHIL_LARGE, SHIL_EXTRALARGE];
        if !workaround {
            lists.push(SHIL_JUMBO);
        }

        let mut icon = Icon::new();
        for list in lists {
            match image_list_icon(index, list as i32) {
                Some(pixmap) => icon.add_pixmap(pixmap),
                None => log::debug!(
                    "ShellExtensionIcons: No image in list {} for '.{}'",
                    list,
                    key
                ),
            }
        }

        if icon.is_null() {
            return NativeIcon::Unavailable;
        }
        NativeIcon::Found {
            icon,
            center: workaround,
        }
    }
}

fn to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// Index of the extension's icon in the system image list.
fn system_icon_index(extension: &str) -> Option<i32> {
    let wide = to_wide(&format!(".{}", extension));
    let mut shfi = SHFILEINFOW::default();
    let result = unsafe {
        SHGetFileInfoW(
            PCWSTR(wide.as_ptr()),
            FILE_ATTRIBUTE_NORMAL,
            Some(&mut shfi),
            std::mem::size_of::<SHFILEINFOW>() as u32,
            SHGFI_SYSICONINDEX | SHGFI_USEFILEATTRIBUTES,
        )
    };
    if result == 0 {
        None
    } else {
        Some(shfi.iIcon)
    }
}

fn image_list_icon(index: i32, list: i32) -> Option<RgbaImage> {
    unsafe {
        let image_list: IImageList = SHGetImageList(list).ok()?;

        let mut size = SIZE::default();
        image_list.GetIconSize(&mut size.cx, &mut size.cy).ok()?;
        if size.cx <= 0 || size.cy <= 0 {
            return None;
        }

        let hicon = image_list.GetIcon(index, ILD_TRANSPARENT).ok()?;
        let pixmap = hicon_to_rgba(hicon, size.cx as u32, size.cy as u32);
        let _ = DestroyIcon(hicon);
        pixmap
    }
}

unsafe fn hicon_to_rgba(hicon: HICON, width: u32, height: u32) -> Option<RgbaImage> {
    let mut icon_info = ICONINFO::default();
    GetIconInfo(hicon, &mut icon_info).ok()?;

    let hdc_screen = GetDC(HWND::default());
    let hdc = CreateCompatibleDC(hdc_screen);

    let mut bmi = BITMAPINFO {
        bmiHeader: BITMAPINFOHEADER {
            biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
            biWidth: width as i32,
            // Top-down rows.
            biHeight: -(height as i32),
            biPlanes: 1,
            biBitCount: 32,
            biCompression: BI_RGB.0,
            ..Default::default()
        },
        bmiColors: [Default::default()],
    };

    let mut bits: *mut std::ffi::c_void = std::ptr::null_mut();
    let mut pixels = vec![0u8; (width * height * 4) as usize];
    let mut drawn = false;

    if let Ok(hbm) = CreateDIBSection(hdc, &bmi, DIB_RGB_COLORS, &mut bits, None, 0) {
        let old = SelectObject(hdc, hbm);
        drawn = DrawIconEx(
            hdc,
            0,
            0,
            hicon,
            width as i32,
            height as i32,
            0,
            None,
            DI_NORMAL,
        )
        .is_ok();
        if drawn {
            GetDIBits(
                hdc,
                hbm,
                0,
                height,
                Some(pixels.as_mut_ptr() as *mut _),
                &mut bmi,
                DIB_RGB_COLORS,
            );
        }
        SelectObject(hdc, old);
        let _ = DeleteObject(hbm);
    }

    let _ = DeleteDC(hdc);
    ReleaseDC(HWND::default(), hdc_screen);
    if !icon_info.hbmColor.is_invalid() {
        let _ = DeleteObject(icon_info.hbmColor);
    }
    if !icon_info.hbmMask.is_invalid() {
        let _ = DeleteObject(icon_info.hbmMask);
    }

    if !drawn {
        return None;
    }

    // BGRA to RGBA.
    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }

    let pixmap = RgbaImage::from_raw(width, height, pixels)?;
    if pixmap.pixels().any(|p| p.0[3] > 0) {
        Some(pixmap)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workaround_applies_to_listed_extensions() {
        let icons = ShellExtensionIcons::default();
        assert!(icons.needs_workaround("py"));
        assert!(!icons.needs_workaround("txt"));
        assert!(!ShellExtensionIcons::new(Vec::<String>::new()).needs_workaround("py"));
    }
}
