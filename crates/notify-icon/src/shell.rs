//! Host shell binding.
//!
//! [`Shell`] is the seam between the state record and the desktop shell.
//! The Win32 backend implements it over the real APIs; tests substitute a
//! recording fake. Every method is an opaque host call: it reports success
//! as a `bool` (or a handle/value) and never touches the state record.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::ffi::c_void;
use std::ptr::NonNull;
use std::rc::Rc;

use tracing::trace;
use uuid::Uuid;

use crate::handles::{IconHandle, MenuHandle, ModuleHandle, MonitorHandle, WindowHandle};
use crate::icon::NotifyIcon;
use crate::message::{Point, RawMessage};
use crate::sys;
use crate::text::{BalloonText, BalloonTitle, TipText};
use crate::theme::Color;

/// Operation requested from the notification area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOp {
    Add,
    Modify,
    Delete,
    SetVersion,
}

impl NotifyOp {
    pub fn code(self) -> u32 {
        match self {
            NotifyOp::Add => sys::NIM_ADD,
            NotifyOp::Modify => sys::NIM_MODIFY,
            NotifyOp::Delete => sys::NIM_DELETE,
            NotifyOp::SetVersion => sys::NIM_SETVERSION,
        }
    }
}

/// Platform-neutral notify-icon descriptor.
///
/// Fields not named in `flags` are ignored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotifyIconData {
    pub window: WindowHandle,
    pub flags: u32,
    pub callback_message: u32,
    pub icon: IconHandle,
    pub tip: TipText,
    pub state: u32,
    pub state_mask: u32,
    pub info_title: BalloonTitle,
    pub info_text: BalloonText,
    pub info_flags: u32,
    pub balloon_icon: IconHandle,
    pub guid: Option<Uuid>,
    pub version: u32,
}

impl NotifyIconData {
    /// Descriptor addressing the icon owned by `window`, with the GUID flag
    /// set when the icon is identified by GUID.
    pub fn for_window(window: WindowHandle, guid: Option<Uuid>) -> Self {
        let mut data = Self {
            window,
            guid,
            ..Self::default()
        };
        if guid.is_some() {
            data.flags |= sys::NIF_GUID;
        }
        data
    }

    pub fn has_flag(&self, flag: u32) -> bool {
        self.flags & flag == flag
    }
}

/// Opaque style pair handed to the immersive context-menu renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MenuStyle {
    pub style: u32,
    pub theme: u32,
}

/// Everything needed to register the class and create the hidden window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowParams {
    pub module: ModuleHandle,
    pub class_name: String,
    pub title: String,
    pub style: u32,
    pub parent: Option<WindowHandle>,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// State shared between a record and the window procedure of its window.
///
/// `depth` counts the record's calls in flight. While it is non-zero the
/// record is mutably borrowed, so messages the host delivers synchronously
/// are queued in `deferred` and the record handles them itself before the
/// outermost call returns.
#[derive(Debug, Default)]
pub(crate) struct DispatchSlot {
    record: Cell<Option<NonNull<NotifyIcon>>>,
    depth: Cell<u32>,
    deferred: RefCell<VecDeque<RawMessage>>,
}

impl DispatchSlot {
    pub(crate) fn enter(&self) {
        self.depth.set(self.depth.get() + 1);
    }

    pub(crate) fn leave(&self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }

    /// Records where the record lives once no borrow of it is in use;
    /// `None` once it is released.
    pub(crate) fn publish(&self, record: Option<NonNull<NotifyIcon>>) {
        self.record.set(record);
    }

    pub(crate) fn next_deferred(&self) -> Option<RawMessage> {
        self.deferred.borrow_mut().pop_front()
    }

    #[cfg(test)]
    pub(crate) fn is_busy(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Handle a window keeps to reach its state record.
///
/// Backends that store it as a raw pointer use [`DispatchTarget::into_raw`]
/// and give the reference back when the window is destroyed.
#[derive(Debug, Clone)]
pub struct DispatchTarget(Rc<DispatchSlot>);

impl DispatchTarget {
    pub(crate) fn new(slot: Rc<DispatchSlot>) -> Self {
        Self(slot)
    }

    pub fn into_raw(self) -> *const c_void {
        Rc::into_raw(self.0).cast()
    }

    /// Takes back a reference leaked by [`DispatchTarget::into_raw`].
    ///
    /// # Safety
    /// `ptr` must come from `into_raw` and not have been taken back yet.
    pub unsafe fn from_raw(ptr: *const c_void) -> Self {
        // SAFETY: upheld by the caller.
        Self(unsafe { Rc::from_raw(ptr.cast::<DispatchSlot>()) })
    }

    /// New handle to the slot behind a pointer that stays leaked.
    ///
    /// # Safety
    /// Same contract as [`DispatchTarget::from_raw`].
    pub unsafe fn clone_raw(ptr: *const c_void) -> Self {
        let slot = ptr.cast::<DispatchSlot>();
        // SAFETY: upheld by the caller; the leaked reference stays counted.
        unsafe {
            Rc::increment_strong_count(slot);
            Self(Rc::from_raw(slot))
        }
    }

    /// Hands a message to the record.
    ///
    /// While the record is inside one of its own calls the message is queued
    /// and `None` is returned; a released record also yields `None`.
    ///
    /// # Safety
    /// Unless the record is inside one of its own calls, the caller must not
    /// hold a reference to it, as in a window procedure entered by the host.
    pub unsafe fn deliver(&self, raw: RawMessage) -> Option<isize> {
        let slot = &self.0;
        if slot.depth.get() > 0 {
            trace!(id = raw.id, "record busy, deferring message");
            slot.deferred.borrow_mut().push_back(raw);
            return None;
        }
        let record = slot.record.get()?;
        // SAFETY: no call of the record is in flight, the pointer was
        // published when the last one returned and is withdrawn on release.
        unsafe { (*record.as_ptr()).dispatch(&raw) }
    }
}

/// Host calls the state record depends on.
pub trait Shell {
    /// Registers (or looks up) the "TaskbarCreated" broadcast id.
    fn register_taskbar_created(&self) -> Option<u32>;

    /// Handle of the running module.
    fn module_handle(&self) -> Option<ModuleHandle>;

    fn register_class(&self, module: ModuleHandle, class_name: &str) -> bool;

    fn unregister_class(&self, module: ModuleHandle, class_name: &str) -> bool;

    /// Creates the hidden window; the backend routes its messages to `target`
    /// and keeps it until the window is destroyed.
    fn create_window(&self, params: &WindowParams, target: DispatchTarget)
    -> Option<WindowHandle>;

    fn destroy_window(&self, window: WindowHandle) -> bool;

    fn notify_icon(&self, op: NotifyOp, data: &NotifyIconData) -> bool;

    fn set_timer(&self, window: WindowHandle, id: u32, interval_ms: u32) -> bool;

    fn kill_timer(&self, window: WindowHandle, id: u32) -> bool;

    fn high_contrast_enabled(&self) -> bool;

    /// (window text, window background) colors of the high-contrast scheme.
    fn high_contrast_colors(&self) -> (Color, Color);

    fn system_uses_light_theme(&self) -> bool;

    fn apps_use_light_theme(&self) -> bool;

    /// DPI of `window`, falling back to the system DPI on older hosts.
    fn dpi_for_window(&self, window: WindowHandle) -> u32;

    /// Monitor containing the point (0, 0).
    fn primary_monitor(&self) -> MonitorHandle;

    /// Moves `window` to the origin of the primary monitor, bottom of the
    /// z-order, without activating it.
    fn move_window_to_origin(&self, window: WindowHandle) -> bool;

    fn set_foreground(&self, window: WindowHandle) -> bool;

    /// `true` when menus drop right-aligned to their anchor.
    fn menu_drop_right_aligned(&self) -> bool;

    /// `true` when the user's reading layout is right-to-left.
    fn layout_rtl(&self) -> bool;

    /// First sub-menu of `menu`.
    fn sub_menu(&self, menu: MenuHandle) -> Option<MenuHandle>;

    /// Shows `menu` at `at` and blocks until it is dismissed. Returns the
    /// selected command id, or 0 when nothing was selected.
    fn track_popup_menu(
        &self,
        menu: MenuHandle,
        flags: u32,
        at: Point,
        window: WindowHandle,
        style: MenuStyle,
    ) -> u32;

    fn post_message(&self, window: WindowHandle, id: u32, wparam: usize, lparam: isize) -> bool;

    /// Sends without waiting when called from a thread other than the
    /// window's.
    fn send_notify_message(
        &self,
        window: WindowHandle,
        id: u32,
        wparam: usize,
        lparam: isize,
    ) -> bool;

    fn destroy_icon(&self, icon: IconHandle) -> bool;

    fn destroy_menu(&self, menu: MenuHandle) -> bool;
}
