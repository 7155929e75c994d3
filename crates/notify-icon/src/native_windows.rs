//! Win32 host binding.
//!
//! Every call is a thin wrapper over the matching `user32`/`shell32`/`gdi32`
//! function. The window keeps a [`DispatchTarget`] in its user data and the
//! window procedure hands each message to it.

use std::ffi::c_void;
use std::mem::{size_of, zeroed};
use std::ptr::{null, null_mut};
use std::sync::Arc;

use tracing::{debug, trace, warn};
use uuid::Uuid;
use windows_sys::Win32::Foundation::{HWND, LPARAM, LRESULT, POINT, WPARAM};
use windows_sys::Win32::Globalization::{
    GetLocaleInfoEx, LOCALE_IREADINGLAYOUT, LOCALE_RETURN_NUMBER,
};
use windows_sys::Win32::Graphics::Gdi::{
    COLOR_WINDOW, COLOR_WINDOWTEXT, GetDC, GetDeviceCaps, GetMonitorInfoW, GetSysColor,
    LOGPIXELSX, MONITOR_DEFAULTTOPRIMARY, MONITORINFO, MonitorFromPoint, ReleaseDC,
};
use windows_sys::Win32::System::LibraryLoader::{GetModuleHandleW, GetProcAddress};
use windows_sys::Win32::System::Threading::GetCurrentThreadId;
use windows_sys::Win32::UI::Accessibility::{HCF_HIGHCONTRASTON, HIGHCONTRASTW};
use windows_sys::Win32::UI::Shell::{NOTIFYICONDATAW, Shell_NotifyIconW};
use windows_sys::Win32::UI::WindowsAndMessaging::{
    CREATESTRUCTW, CreateWindowExW, DefWindowProcW, DestroyIcon, DestroyMenu, DestroyWindow,
    DispatchMessageW, GWLP_USERDATA, GetMessageW, GetSubMenu, HWND_BOTTOM, KillTimer, MSG,
    PM_REMOVE, PeekMessageW, PostMessageW, PostThreadMessageW, RegisterClassExW,
    RegisterWindowMessageW, SPI_GETHIGHCONTRAST, SPI_GETMENUDROPALIGNMENT, SWP_NOACTIVATE,
    SWP_NOSIZE, SendNotifyMessageW, SetForegroundWindow, SetTimer, SetWindowPos,
    SystemParametersInfoW, TrackPopupMenuEx, TranslateMessage, UnregisterClassW, WM_NCCREATE,
    WM_NCDESTROY, WM_QUIT, WNDCLASSEXW,
};
use winreg::RegKey;
use winreg::enums::HKEY_CURRENT_USER;

use crate::error::{Error, Result};
use crate::event_loop::{EventLoop, MessagePump, Pumped, Waker};
use crate::handles::{IconHandle, MenuHandle, ModuleHandle, MonitorHandle, WindowHandle};
use crate::message::{Point, RawMessage};
use crate::shell::{DispatchTarget, MenuStyle, NotifyIconData, NotifyOp, Shell, WindowParams};
use crate::sys;
use crate::theme::Color;

const PERSONALIZE_KEY: &str = r"Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";
const DEFAULT_DPI: u32 = 96;
/// Longest setting-change payload worth decoding.
const MAX_SETTING_NAME: usize = 256;

// Local message constants must agree with the platform headers.
const _: () = {
    use windows_sys::Win32::UI::Shell as shell;
    use windows_sys::Win32::UI::WindowsAndMessaging as wm;
    assert!(sys::WM_USER == wm::WM_USER);
    assert!(sys::WM_APP == wm::WM_APP);
    assert!(sys::WM_DPICHANGED == wm::WM_DPICHANGED);
    assert!(sys::WM_SETTINGCHANGE == wm::WM_SETTINGCHANGE);
    assert!(sys::NIN_KEYSELECT == shell::NIN_KEYSELECT);
    assert!(sys::NIN_POPUPOPEN == shell::NIN_POPUPOPEN);
    assert!(sys::NIF_SHOWTIP == shell::NIF_SHOWTIP);
    assert!(sys::NIIF_RESPECT_QUIET_TIME == shell::NIIF_RESPECT_QUIET_TIME);
    assert!(sys::NOTIFYICON_VERSION_4 == shell::NOTIFYICON_VERSION_4);
    assert!(sys::TPM_LAYOUTRTL == wm::TPM_LAYOUTRTL);
    assert!(sys::SPI_SETHIGHCONTRAST == wm::SPI_SETHIGHCONTRAST as usize);
};

type GetDpiForWindowFn = unsafe extern "system" fn(HWND) -> u32;

fn to_hwnd(window: WindowHandle) -> HWND {
    window.0 as HWND
}

fn window_handle(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd as isize)
}

fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

fn to_guid(uuid: Uuid) -> windows_sys::core::GUID {
    let (data1, data2, data3, data4) = uuid.as_fields();
    windows_sys::core::GUID {
        data1,
        data2,
        data3,
        data4: *data4,
    }
}

/// The real shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Shell;

impl Win32Shell {
    fn light_theme_value(name: &str) -> bool {
        // A missing key means the host predates light themes: dark.
        RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey(PERSONALIZE_KEY)
            .and_then(|key| key.get_value::<u32, _>(name))
            .map(|value| value != 0)
            .unwrap_or(false)
    }

    fn high_contrast(&self) -> Option<HIGHCONTRASTW> {
        // SAFETY: plain data; `cbSize` is set before the call.
        let mut hc: HIGHCONTRASTW = unsafe { zeroed() };
        hc.cbSize = size_of::<HIGHCONTRASTW>() as u32;
        // SAFETY: `hc` is a valid, sized HIGHCONTRASTW.
        let ok = unsafe {
            SystemParametersInfoW(
                SPI_GETHIGHCONTRAST,
                hc.cbSize,
                (&mut hc as *mut HIGHCONTRASTW).cast::<c_void>(),
                0,
            )
        };
        (ok != 0).then_some(hc)
    }

    fn system_dpi() -> u32 {
        // SAFETY: the screen DC is released before returning.
        unsafe {
            let dc = GetDC(null_mut());
            if dc.is_null() {
                return DEFAULT_DPI;
            }
            let dpi = GetDeviceCaps(dc, LOGPIXELSX);
            ReleaseDC(null_mut(), dc);
            u32::try_from(dpi).unwrap_or(DEFAULT_DPI)
        }
    }

    fn get_dpi_for_window() -> Option<GetDpiForWindowFn> {
        let user32 = wide("user32.dll");
        // SAFETY: both strings are null terminated; a resolved export has the
        // documented `UINT GetDpiForWindow(HWND)` signature.
        unsafe {
            let module = GetModuleHandleW(user32.as_ptr());
            if module.is_null() {
                return None;
            }
            let proc = GetProcAddress(module, c"GetDpiForWindow".as_ptr().cast())?;
            Some(std::mem::transmute::<
                unsafe extern "system" fn() -> isize,
                GetDpiForWindowFn,
            >(proc))
        }
    }
}

impl Shell for Win32Shell {
    fn register_taskbar_created(&self) -> Option<u32> {
        let name = wide(sys::TASKBAR_CREATED);
        // SAFETY: `name` is null terminated.
        let id = unsafe { RegisterWindowMessageW(name.as_ptr()) };
        (id != 0).then_some(id)
    }

    fn module_handle(&self) -> Option<ModuleHandle> {
        // SAFETY: a null name asks for the executable's module.
        let module = unsafe { GetModuleHandleW(null()) };
        ModuleHandle(module as isize).non_null()
    }

    fn register_class(&self, module: ModuleHandle, class_name: &str) -> bool {
        let name = wide(class_name);
        // SAFETY: plain data, filled below.
        let mut class: WNDCLASSEXW = unsafe { zeroed() };
        class.cbSize = size_of::<WNDCLASSEXW>() as u32;
        class.lpfnWndProc = Some(window_proc);
        class.hInstance = module.0 as _;
        class.lpszClassName = name.as_ptr();
        // SAFETY: `class` and the name it points to outlive the call.
        let atom = unsafe { RegisterClassExW(&class) };
        if atom == 0 {
            warn!(class_name, "window class registration failed");
        }
        atom != 0
    }

    fn unregister_class(&self, module: ModuleHandle, class_name: &str) -> bool {
        let name = wide(class_name);
        // SAFETY: `name` is null terminated.
        unsafe { UnregisterClassW(name.as_ptr(), module.0 as _) != 0 }
    }

    fn create_window(
        &self,
        params: &WindowParams,
        target: DispatchTarget,
    ) -> Option<WindowHandle> {
        let class_name = wide(&params.class_name);
        let title = wide(&params.title);
        let parent = params.parent.map_or(null_mut(), to_hwnd);
        let create_param = target.into_raw();
        // SAFETY: strings are null terminated; the window takes its own
        // reference to the target in WM_NCCREATE.
        let hwnd = unsafe {
            CreateWindowExW(
                0,
                class_name.as_ptr(),
                title.as_ptr(),
                params.style,
                params.x,
                params.y,
                params.width,
                params.height,
                parent,
                null_mut(),
                params.module.0 as _,
                create_param,
            )
        };
        // SAFETY: `create_param` came from `into_raw` above.
        drop(unsafe { DispatchTarget::from_raw(create_param) });
        if hwnd.is_null() {
            None
        } else {
            Some(window_handle(hwnd))
        }
    }

    fn destroy_window(&self, window: WindowHandle) -> bool {
        // SAFETY: FFI call with a handle owned by the caller.
        unsafe { DestroyWindow(to_hwnd(window)) != 0 }
    }

    fn notify_icon(&self, op: NotifyOp, data: &NotifyIconData) -> bool {
        // SAFETY: plain data, filled below.
        let mut nid: NOTIFYICONDATAW = unsafe { zeroed() };
        nid.cbSize = size_of::<NOTIFYICONDATAW>() as u32;
        nid.hWnd = to_hwnd(data.window);
        nid.uFlags = data.flags;
        nid.uCallbackMessage = data.callback_message;
        nid.hIcon = data.icon.0 as _;
        data.tip.copy_into(&mut nid.szTip);
        nid.dwState = data.state;
        nid.dwStateMask = data.state_mask;
        data.info_text.copy_into(&mut nid.szInfo);
        data.info_title.copy_into(&mut nid.szInfoTitle);
        nid.dwInfoFlags = data.info_flags;
        nid.hBalloonIcon = data.balloon_icon.0 as _;
        nid.Anonymous.uVersion = data.version;
        if let Some(guid) = data.guid {
            nid.guidItem = to_guid(guid);
        }

        // SAFETY: `nid` is fully initialised and sized.
        let ok = unsafe { Shell_NotifyIconW(op.code(), &nid) != 0 };
        trace!(?op, flags = data.flags, ok, "Shell_NotifyIconW");
        ok
    }

    fn set_timer(&self, window: WindowHandle, id: u32, interval_ms: u32) -> bool {
        // SAFETY: FFI call; no timer procedure, WM_TIMER goes to the window.
        unsafe { SetTimer(to_hwnd(window), id as usize, interval_ms, None) != 0 }
    }

    fn kill_timer(&self, window: WindowHandle, id: u32) -> bool {
        // SAFETY: FFI call.
        unsafe { KillTimer(to_hwnd(window), id as usize) != 0 }
    }

    fn high_contrast_enabled(&self) -> bool {
        self.high_contrast()
            .is_some_and(|hc| hc.dwFlags & HCF_HIGHCONTRASTON != 0)
    }

    fn high_contrast_colors(&self) -> (Color, Color) {
        // SAFETY: FFI calls with valid color indices.
        unsafe { (GetSysColor(COLOR_WINDOWTEXT), GetSysColor(COLOR_WINDOW)) }
    }

    fn system_uses_light_theme(&self) -> bool {
        Self::light_theme_value("SystemUsesLightTheme")
    }

    fn apps_use_light_theme(&self) -> bool {
        Self::light_theme_value("AppsUseLightTheme")
    }

    fn dpi_for_window(&self, window: WindowHandle) -> u32 {
        match Self::get_dpi_for_window() {
            // SAFETY: resolved from user32 with the matching signature.
            Some(get_dpi) => match unsafe { get_dpi(to_hwnd(window)) } {
                0 => Self::system_dpi(),
                dpi => dpi,
            },
            None => Self::system_dpi(),
        }
    }

    fn primary_monitor(&self) -> MonitorHandle {
        // SAFETY: FFI call.
        let monitor = unsafe { MonitorFromPoint(POINT { x: 0, y: 0 }, MONITOR_DEFAULTTOPRIMARY) };
        MonitorHandle(monitor as isize)
    }

    fn move_window_to_origin(&self, window: WindowHandle) -> bool {
        let monitor = self.primary_monitor();
        // SAFETY: plain data; `cbSize` is set before the call.
        let mut info: MONITORINFO = unsafe { zeroed() };
        info.cbSize = size_of::<MONITORINFO>() as u32;
        // SAFETY: `info` is valid and sized.
        if unsafe { GetMonitorInfoW(monitor.0 as _, &mut info) } == 0 {
            return false;
        }
        // SAFETY: FFI call.
        unsafe {
            SetWindowPos(
                to_hwnd(window),
                HWND_BOTTOM,
                info.rcMonitor.left,
                info.rcMonitor.top,
                0,
                0,
                SWP_NOSIZE | SWP_NOACTIVATE,
            ) != 0
        }
    }

    fn set_foreground(&self, window: WindowHandle) -> bool {
        // SAFETY: FFI call.
        unsafe { SetForegroundWindow(to_hwnd(window)) != 0 }
    }

    fn menu_drop_right_aligned(&self) -> bool {
        let mut value: i32 = 0;
        // SAFETY: SPI_GETMENUDROPALIGNMENT writes one BOOL.
        let ok = unsafe {
            SystemParametersInfoW(
                SPI_GETMENUDROPALIGNMENT,
                0,
                (&mut value as *mut i32).cast::<c_void>(),
                0,
            )
        };
        ok != 0 && value != 0
    }

    fn layout_rtl(&self) -> bool {
        let mut layout: u32 = 0;
        // SAFETY: with LOCALE_RETURN_NUMBER the buffer receives one DWORD,
        // which is two UTF-16 units.
        let written = unsafe {
            GetLocaleInfoEx(
                null(),
                LOCALE_IREADINGLAYOUT | LOCALE_RETURN_NUMBER,
                (&mut layout as *mut u32).cast::<u16>(),
                (size_of::<u32>() / size_of::<u16>()) as i32,
            )
        };
        written != 0 && layout == 1
    }

    fn sub_menu(&self, menu: MenuHandle) -> Option<MenuHandle> {
        // SAFETY: FFI call.
        let sub = unsafe { GetSubMenu(menu.0 as _, 0) };
        MenuHandle(sub as isize).non_null()
    }

    fn track_popup_menu(
        &self,
        menu: MenuHandle,
        flags: u32,
        at: Point,
        window: WindowHandle,
        style: MenuStyle,
    ) -> u32 {
        // The immersive renderer is not linked; the stock menu ignores it.
        trace!(?style, "track popup menu");
        // SAFETY: FFI call; blocks in a modal loop until dismissed.
        let selection = unsafe {
            TrackPopupMenuEx(menu.0 as _, flags, at.x, at.y, to_hwnd(window), null())
        };
        u32::try_from(selection).unwrap_or(0)
    }

    fn post_message(&self, window: WindowHandle, id: u32, wparam: usize, lparam: isize) -> bool {
        // SAFETY: FFI call.
        unsafe { PostMessageW(to_hwnd(window), id, wparam, lparam) != 0 }
    }

    fn send_notify_message(
        &self,
        window: WindowHandle,
        id: u32,
        wparam: usize,
        lparam: isize,
    ) -> bool {
        // SAFETY: FFI call.
        unsafe { SendNotifyMessageW(to_hwnd(window), id, wparam, lparam) != 0 }
    }

    fn destroy_icon(&self, icon: IconHandle) -> bool {
        // SAFETY: the caller hands over ownership of the icon.
        unsafe { DestroyIcon(icon.0 as _) != 0 }
    }

    fn destroy_menu(&self, menu: MenuHandle) -> bool {
        // SAFETY: the caller hands over ownership of the menu.
        unsafe { DestroyMenu(menu.0 as _) != 0 }
    }
}

#[cfg(target_pointer_width = "64")]
unsafe fn window_user_data(hwnd: HWND) -> isize {
    // SAFETY: forwarded from the caller.
    unsafe { windows_sys::Win32::UI::WindowsAndMessaging::GetWindowLongPtrW(hwnd, GWLP_USERDATA) }
}

#[cfg(target_pointer_width = "64")]
unsafe fn set_window_user_data(hwnd: HWND, value: isize) {
    // SAFETY: forwarded from the caller.
    unsafe {
        windows_sys::Win32::UI::WindowsAndMessaging::SetWindowLongPtrW(hwnd, GWLP_USERDATA, value);
    }
}

#[cfg(target_pointer_width = "32")]
unsafe fn window_user_data(hwnd: HWND) -> isize {
    // SAFETY: forwarded from the caller.
    unsafe {
        windows_sys::Win32::UI::WindowsAndMessaging::GetWindowLongW(hwnd, GWLP_USERDATA) as isize
    }
}

#[cfg(target_pointer_width = "32")]
unsafe fn set_window_user_data(hwnd: HWND, value: isize) {
    // SAFETY: forwarded from the caller.
    unsafe {
        windows_sys::Win32::UI::WindowsAndMessaging::SetWindowLongW(
            hwnd,
            GWLP_USERDATA,
            value as i32,
        );
    }
}

/// Reads the string a setting-change broadcast points at, if any.
///
/// # Safety
/// `lparam` must be null or point at a null-terminated UTF-16 string.
unsafe fn setting_name(lparam: LPARAM) -> Option<String> {
    let ptr = lparam as *const u16;
    if ptr.is_null() {
        return None;
    }
    let mut len = 0;
    // SAFETY: reads stop at the terminator or the length cap.
    unsafe {
        while len < MAX_SETTING_NAME && *ptr.add(len) != 0 {
            len += 1;
        }
        Some(String::from_utf16_lossy(std::slice::from_raw_parts(ptr, len)))
    }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    // SAFETY: called by the host with a valid window. The user data holds a
    // target reference taken in WM_NCCREATE and given back in WM_NCDESTROY.
    unsafe {
        if msg == WM_NCCREATE {
            let create = lparam as *const CREATESTRUCTW;
            let param = (*create).lpCreateParams.cast_const();
            if !param.is_null() {
                let owned = DispatchTarget::clone_raw(param);
                set_window_user_data(hwnd, owned.into_raw() as isize);
            }
            return DefWindowProcW(hwnd, msg, wparam, lparam);
        }

        let ptr = window_user_data(hwnd) as *const c_void;
        if ptr.is_null() {
            return DefWindowProcW(hwnd, msg, wparam, lparam);
        }

        if msg == WM_NCDESTROY {
            set_window_user_data(hwnd, 0);
            drop(DispatchTarget::from_raw(ptr));
            return DefWindowProcW(hwnd, msg, wparam, lparam);
        }

        // Holds the slot even if this message destroys the window.
        let target = DispatchTarget::clone_raw(ptr);
        let mut raw = RawMessage::new(msg, wparam, lparam);
        if msg == sys::WM_SETTINGCHANGE {
            raw.text = setting_name(lparam);
        }
        match target.deliver(raw) {
            Some(result) => result,
            None => DefWindowProcW(hwnd, msg, wparam, lparam),
        }
    }
}

/// `GetMessageW` pump for the calling thread.
#[derive(Debug)]
pub struct Win32Pump {
    thread_id: u32,
}

impl Win32Pump {
    pub fn for_current_thread() -> Self {
        // SAFETY: FFI call.
        let thread_id = unsafe { GetCurrentThreadId() };
        Self { thread_id }
    }
}

impl MessagePump for Win32Pump {
    fn pump(&mut self) -> Result<Pumped> {
        // SAFETY: plain data written by GetMessageW.
        let mut msg: MSG = unsafe { zeroed() };
        // SAFETY: `msg` is valid for writes.
        match unsafe { GetMessageW(&mut msg, null_mut(), 0, 0) } {
            -1 => Err(Error::MessageLoopFailed),
            0 => Ok(Pumped::Quit(msg.wParam as i32)),
            _ => {
                // SAFETY: `msg` was filled by GetMessageW.
                unsafe {
                    TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                }
                Ok(Pumped::Dispatched)
            }
        }
    }

    fn waker(&self) -> Option<Waker> {
        let thread_id = self.thread_id;
        Some(Arc::new(move |code| {
            // SAFETY: FFI call; posting to a thread is allowed from any thread.
            let ok = unsafe { PostThreadMessageW(thread_id, WM_QUIT, code as usize, 0) } != 0;
            if !ok {
                debug!(thread_id, "could not wake message loop");
            }
        }))
    }

    fn discard_wake(&mut self) {
        // SAFETY: plain data written by PeekMessageW.
        let mut msg: MSG = unsafe { zeroed() };
        // SAFETY: `msg` is valid for writes; only quit messages are removed.
        while unsafe { PeekMessageW(&mut msg, null_mut(), WM_QUIT, WM_QUIT, PM_REMOVE) } != 0 {
            trace!(code = msg.wParam, "discarded queued quit");
        }
    }
}

pub fn native_shell() -> Result<Box<dyn Shell>> {
    Ok(Box::new(Win32Shell))
}

pub fn native_event_loop() -> Result<EventLoop<Box<dyn MessagePump>>> {
    let pump: Box<dyn MessagePump> = Box::new(Win32Pump::for_current_thread());
    Ok(EventLoop::new(pump))
}
