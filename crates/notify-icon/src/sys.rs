//! Host message ids, notify-icon flags and menu flags.
//!
//! Values match the Windows SDK headers. They are declared here rather than
//! imported so the dispatcher and the control API build and test on every
//! platform; the Win32 backend checks them against `windows-sys` at compile
//! time.

// Window messages.
pub const WM_NULL: u32 = 0x0000;
pub const WM_CREATE: u32 = 0x0001;
pub const WM_DESTROY: u32 = 0x0002;
pub const WM_SETTINGCHANGE: u32 = 0x001A;
pub const WM_CONTEXTMENU: u32 = 0x007B;
pub const WM_DISPLAYCHANGE: u32 = 0x007E;
pub const WM_TIMER: u32 = 0x0113;
pub const WM_LBUTTONUP: u32 = 0x0202;
pub const WM_LBUTTONDBLCLK: u32 = 0x0203;
pub const WM_MBUTTONUP: u32 = 0x0208;
pub const WM_DPICHANGED: u32 = 0x02E0;
pub const WM_USER: u32 = 0x0400;
pub const WM_APP: u32 = 0x8000;

/// Last id of the application-defined message range.
pub const WM_APP_LAST: u32 = 0xBFFF;

// Messages this crate sends to its own window.
pub const WM_NOTIFYICON: u32 = WM_USER;
pub const WM_DPICHANGED_DELAYED: u32 = WM_USER + 1;
pub const WM_NOTIFYAREA_INIT: u32 = WM_USER + 2;
pub const WM_NOTIFYAREA_RELEASE: u32 = WM_USER + 3;
pub const WM_NOTIFYAREA_SHOW: u32 = WM_USER + 4;
pub const WM_NOTIFYAREA_HIDE: u32 = WM_USER + 5;
pub const WM_NOTIFYAREA_ICON_CHANGE: u32 = WM_USER + 6;
pub const WM_NOTIFYAREA_MENU_CHANGE: u32 = WM_USER + 7;
pub const WM_NOTIFYAREA_TIP_CHANGE: u32 = WM_USER + 8;
pub const WM_NOTIFYAREA_TIP_TYPE_CHANGE: u32 = WM_USER + 9;

// Notify-icon callback sub-events (LOWORD of lparam, version 4).
pub const NIN_SELECT: u32 = WM_USER;
pub const NIN_KEYSELECT: u32 = NIN_SELECT | 0x1;
pub const NIN_BALLOONSHOW: u32 = WM_USER + 2;
pub const NIN_BALLOONHIDE: u32 = WM_USER + 3;
pub const NIN_BALLOONTIMEOUT: u32 = WM_USER + 4;
pub const NIN_BALLOONUSERCLICK: u32 = WM_USER + 5;
pub const NIN_POPUPOPEN: u32 = WM_USER + 6;
pub const NIN_POPUPCLOSE: u32 = WM_USER + 7;

// Shell_NotifyIcon operations.
pub const NIM_ADD: u32 = 0x0;
pub const NIM_MODIFY: u32 = 0x1;
pub const NIM_DELETE: u32 = 0x2;
pub const NIM_SETVERSION: u32 = 0x4;

pub const NOTIFYICON_VERSION_4: u32 = 4;

// NOTIFYICONDATA.uFlags
pub const NIF_MESSAGE: u32 = 0x01;
pub const NIF_ICON: u32 = 0x02;
pub const NIF_TIP: u32 = 0x04;
pub const NIF_STATE: u32 = 0x08;
pub const NIF_INFO: u32 = 0x10;
pub const NIF_GUID: u32 = 0x20;
pub const NIF_REALTIME: u32 = 0x40;
pub const NIF_SHOWTIP: u32 = 0x80;

pub const NIS_HIDDEN: u32 = 0x1;

// NOTIFYICONDATA.dwInfoFlags
pub const NIIF_NONE: u32 = 0x00;
pub const NIIF_INFO: u32 = 0x01;
pub const NIIF_WARNING: u32 = 0x02;
pub const NIIF_ERROR: u32 = 0x03;
pub const NIIF_USER: u32 = 0x04;
pub const NIIF_NOSOUND: u32 = 0x10;
pub const NIIF_LARGE_ICON: u32 = 0x20;
pub const NIIF_RESPECT_QUIET_TIME: u32 = 0x80;

// TrackPopupMenu flags.
pub const TPM_LEFTALIGN: u32 = 0x0000;
pub const TPM_TOPALIGN: u32 = 0x0000;
pub const TPM_RIGHTBUTTON: u32 = 0x0002;
pub const TPM_RIGHTALIGN: u32 = 0x0008;
pub const TPM_NONOTIFY: u32 = 0x0080;
pub const TPM_RETURNCMD: u32 = 0x0100;
pub const TPM_LAYOUTRTL: u32 = 0x8000;

/// `wparam` of `WM_SETTINGCHANGE` when high contrast is toggled.
pub const SPI_SETHIGHCONTRAST: usize = 0x0043;

/// `lparam` payload of `WM_SETTINGCHANGE` when the immersive colors change.
pub const IMMERSIVE_COLOR_SET: &str = "ImmersiveColorSet";

/// Name of the broadcast message sent when the taskbar is (re)created.
pub const TASKBAR_CREATED: &str = "TaskbarCreated";

/// Returns `true` if `id` lies in the application-defined message range.
pub fn is_app_message(id: u32) -> bool {
    (WM_APP..=WM_APP_LAST).contains(&id)
}
