//! Initialisation options for a [`NotifyIcon`](crate::NotifyIcon).

use std::any::Any;
use std::rc::Rc;

use uuid::Uuid;

use crate::callbacks::Callbacks;
use crate::handles::{IconHandle, MenuHandle, ModuleHandle, WindowHandle};
use crate::shell::MenuStyle;
use crate::text::TipText;

/// Window class registered when none is configured.
pub const DEFAULT_CLASS_NAME: &str = "NotifyAreaWndClass";

/// First timer id available to callers; lower ids are reserved.
pub const USER_TIMER_ID: u32 = 1000;

/// Opaque value a caller can attach to an icon.
pub type UserData = Rc<dyn Any>;

/// How the icon's hover information is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TipType {
    /// Host-drawn tooltip showing the tip text.
    #[default]
    Standard,
    /// No host tooltip; the application draws its own popup on
    /// popup-open/close events.
    RichPopup,
}

/// Everything [`NotifyIcon::new`](crate::NotifyIcon::new) needs.
#[derive(Debug, Clone, Default)]
pub struct NotifyIconConfig {
    /// Module the window class is registered with (current module if `None`).
    pub module: Option<ModuleHandle>,
    /// Window class name ([`DEFAULT_CLASS_NAME`] if `None` or empty).
    pub class_name: Option<String>,
    /// Identifies the icon across restarts; a nil UUID counts as `None`.
    pub guid: Option<Uuid>,
    pub icon: IconHandle,
    pub menu: MenuHandle,
    pub tip: TipText,
    pub tip_type: TipType,
    pub menu_style: MenuStyle,
    pub window_title: String,
    pub window_style: u32,
    pub parent_window: Option<WindowHandle>,
    pub callbacks: Callbacks,
    pub user_data1: Option<UserData>,
    pub user_data2: Option<UserData>,
}

impl NotifyIconConfig {
    pub(crate) fn resolved_class_name(&self) -> String {
        match self.class_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => DEFAULT_CLASS_NAME.to_owned(),
        }
    }

    pub(crate) fn resolved_guid(&self) -> Option<Uuid> {
        self.guid.filter(|guid| !guid.is_nil())
    }
}
