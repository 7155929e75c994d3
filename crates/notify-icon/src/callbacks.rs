//! Callback table.
//!
//! Each handler receives the state record it was registered on and may call
//! back into the control API. Handlers are reference counted so a dispatch
//! can hold one while the record is mutably borrowed by the call.

use std::fmt;
use std::rc::Rc;

use crate::config::TipType;
use crate::handles::{IconHandle, MenuHandle};
use crate::icon::NotifyIcon;
use crate::message::{Point, RawMessage};
use crate::theme::ThemeInfo;

pub type Callback = Rc<dyn Fn(&mut NotifyIcon)>;
pub type PointCallback = Rc<dyn Fn(&mut NotifyIcon, Point)>;
pub type IconCallback = Rc<dyn Fn(&mut NotifyIcon, IconHandle)>;
pub type MenuCallback = Rc<dyn Fn(&mut NotifyIcon, MenuHandle)>;
pub type TipCallback = Rc<dyn Fn(&mut NotifyIcon, &str)>;
pub type TipTypeCallback = Rc<dyn Fn(&mut NotifyIcon, TipType)>;
/// Receives a menu command id, DPI value or timer id.
pub type IdCallback = Rc<dyn Fn(&mut NotifyIcon, u32)>;
/// Receives whether a context-menu item was selected.
pub type MenuCloseCallback = Rc<dyn Fn(&mut NotifyIcon, bool)>;
pub type ThemeCallback = Rc<dyn Fn(&mut NotifyIcon, ThemeInfo)>;
pub type MessageCallback = Rc<dyn Fn(&mut NotifyIcon, &RawMessage)>;
/// Returns `true` when the message was handled.
pub type SystemMessageCallback = Rc<dyn Fn(&mut NotifyIcon, &RawMessage) -> bool>;

/// Optional handlers; an absent handler is a silent no-op.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_window_create: Option<Callback>,
    pub on_window_destroy: Option<Callback>,
    pub on_init: Option<Callback>,
    pub on_release: Option<Callback>,
    pub on_show: Option<Callback>,
    pub on_hide: Option<Callback>,
    pub on_icon_change: Option<IconCallback>,
    pub on_menu_change: Option<MenuCallback>,
    pub on_tip_change: Option<TipCallback>,
    pub on_tip_type_change: Option<TipTypeCallback>,

    pub on_key_select: Option<PointCallback>,
    pub on_left_click: Option<PointCallback>,
    pub on_left_double_click: Option<PointCallback>,
    pub on_middle_click: Option<PointCallback>,

    pub on_context_menu_open: Option<Callback>,
    pub on_context_menu_item_click: Option<IdCallback>,
    pub on_context_menu_close: Option<MenuCloseCallback>,

    pub on_balloon_show: Option<Callback>,
    pub on_balloon_hide: Option<Callback>,
    pub on_balloon_timeout: Option<Callback>,
    pub on_balloon_click: Option<Callback>,

    pub on_rich_popup_open: Option<PointCallback>,
    pub on_rich_popup_close: Option<Callback>,

    pub on_dpi_change: Option<IdCallback>,
    pub on_system_theme_change: Option<ThemeCallback>,
    pub on_apps_theme_change: Option<ThemeCallback>,
    pub on_taskbar_created: Option<Callback>,
    pub on_timer: Option<IdCallback>,
    pub on_custom_message: Option<MessageCallback>,
    pub on_system_message: Option<SystemMessageCallback>,
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks").finish_non_exhaustive()
    }
}

/// Invokes an optional handler on `$icon`, cloning the `Rc` first so the
/// handler can borrow the record mutably.
macro_rules! fire {
    ($icon:expr, $field:ident $(, $arg:expr)*) => {
        if let Some(cb) = $icon.callbacks.$field.clone() {
            cb(&mut *$icon $(, $arg)*);
        }
    };
}

pub(crate) use fire;
