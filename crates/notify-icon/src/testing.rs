//! Recording host used by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::callbacks::{
    Callback, Callbacks, IconCallback, IdCallback, MenuCallback, MenuCloseCallback,
    MessageCallback, PointCallback, SystemMessageCallback, ThemeCallback, TipCallback,
    TipTypeCallback,
};
use crate::config::{NotifyIconConfig, TipType};
use crate::handles::{IconHandle, MenuHandle, ModuleHandle, MonitorHandle, WindowHandle};
use crate::icon::NotifyIcon;
use crate::message::{Point, RawMessage};
use crate::sys;
use crate::shell::{DispatchTarget, MenuStyle, NotifyIconData, NotifyOp, Shell, WindowParams};
use crate::theme::{Color, ThemeInfo};

pub const TASKBAR_CREATED_ID: u32 = 0xC123;
pub const FIRST_WINDOW: WindowHandle = WindowHandle(0x1000);

/// A host call with its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    RegisterClass(String),
    UnregisterClass(String),
    CreateWindow(WindowParams),
    DestroyWindow(WindowHandle),
    Notify(NotifyOp, NotifyIconData),
    SetTimer(u32, u32),
    KillTimer(u32),
    MoveWindow(WindowHandle),
    SetForeground(WindowHandle),
    TrackPopupMenu {
        menu: MenuHandle,
        flags: u32,
        at: Point,
        style: MenuStyle,
    },
    Post(u32, usize, isize),
    SendNotify(u32, usize, isize),
    DestroyIcon(IconHandle),
    DestroyMenu(MenuHandle),
}

/// Scripted host state plus the log of calls made against it.
#[derive(Debug)]
pub struct FakeHost {
    pub calls: Vec<HostCall>,
    pub taskbar_created_id: Option<u32>,
    pub module: Option<ModuleHandle>,
    pub register_class_ok: bool,
    pub create_window_ok: bool,
    pub next_window: isize,
    pub failing_ops: Vec<NotifyOp>,
    pub timer_ok: bool,
    pub message_ok: bool,
    pub high_contrast: Option<(Color, Color)>,
    pub system_light: bool,
    pub apps_light: bool,
    pub dpi: u32,
    pub primary_monitor: MonitorHandle,
    pub menu_right_aligned: bool,
    pub rtl: bool,
    pub sub_menu: Option<MenuHandle>,
    pub menu_selection: u32,
    /// Deliver window messages from inside host calls, as the real host does
    /// on the window's own thread.
    pub synchronous: bool,
    /// Messages the menu's modal loop delivers while it is open.
    pub menu_messages: Vec<RawMessage>,
    /// Target handed over with the last created window.
    pub target: Option<DispatchTarget>,
    /// What each synchronous delivery returned.
    pub delivered: Vec<Option<isize>>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            taskbar_created_id: Some(TASKBAR_CREATED_ID),
            module: Some(ModuleHandle(0x40_0000)),
            register_class_ok: true,
            create_window_ok: true,
            next_window: FIRST_WINDOW.0,
            failing_ops: Vec::new(),
            timer_ok: true,
            message_ok: true,
            high_contrast: None,
            system_light: false,
            apps_light: false,
            dpi: 96,
            primary_monitor: MonitorHandle(1),
            menu_right_aligned: false,
            rtl: false,
            sub_menu: Some(MenuHandle(0x5001)),
            menu_selection: 0,
            synchronous: false,
            menu_messages: Vec::new(),
            target: None,
            delivered: Vec::new(),
        }
    }
}

impl FakeHost {
    /// Notify-icon calls only.
    pub fn notify_calls(&self) -> Vec<(NotifyOp, NotifyIconData)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Notify(op, data) => Some((*op, data.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn posted(&self) -> Vec<(u32, usize, isize)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                HostCall::Post(id, w, l) => Some((*id, *w, *l)),
                _ => None,
            })
            .collect()
    }
}

pub struct FakeShell {
    host: Rc<RefCell<FakeHost>>,
}

impl FakeShell {
    pub fn new() -> (Self, Rc<RefCell<FakeHost>>) {
        let host = Rc::new(RefCell::new(FakeHost::default()));
        (Self { host: host.clone() }, host)
    }

    fn record(&self, call: HostCall) {
        self.host.borrow_mut().calls.push(call);
    }

    /// Delivers `raw` to the window's target right away when the host is
    /// synchronous.
    fn deliver(&self, raw: RawMessage) {
        let target = {
            let host = self.host.borrow();
            if !host.synchronous {
                return;
            }
            host.target.clone()
        };
        if let Some(target) = target {
            // SAFETY: only reached from inside a call of the record.
            let result = unsafe { target.deliver(raw) };
            self.host.borrow_mut().delivered.push(result);
        }
    }
}

impl Shell for FakeShell {
    fn register_taskbar_created(&self) -> Option<u32> {
        self.host.borrow().taskbar_created_id
    }

    fn module_handle(&self) -> Option<ModuleHandle> {
        self.host.borrow().module
    }

    fn register_class(&self, _module: ModuleHandle, class_name: &str) -> bool {
        self.record(HostCall::RegisterClass(class_name.to_owned()));
        self.host.borrow().register_class_ok
    }

    fn unregister_class(&self, _module: ModuleHandle, class_name: &str) -> bool {
        self.record(HostCall::UnregisterClass(class_name.to_owned()));
        true
    }

    fn create_window(
        &self,
        params: &WindowParams,
        target: DispatchTarget,
    ) -> Option<WindowHandle> {
        self.record(HostCall::CreateWindow(params.clone()));
        let window = {
            let mut host = self.host.borrow_mut();
            if !host.create_window_ok {
                return None;
            }
            let window = WindowHandle(host.next_window);
            host.next_window += 1;
            host.target = Some(target);
            window
        };
        self.deliver(RawMessage::new(sys::WM_CREATE, 0, 0));
        Some(window)
    }

    fn destroy_window(&self, window: WindowHandle) -> bool {
        self.record(HostCall::DestroyWindow(window));
        self.deliver(RawMessage::new(sys::WM_DESTROY, 0, 0));
        true
    }

    fn notify_icon(&self, op: NotifyOp, data: &NotifyIconData) -> bool {
        self.record(HostCall::Notify(op, data.clone()));
        !self.host.borrow().failing_ops.contains(&op)
    }

    fn set_timer(&self, _window: WindowHandle, id: u32, interval_ms: u32) -> bool {
        self.record(HostCall::SetTimer(id, interval_ms));
        self.host.borrow().timer_ok
    }

    fn kill_timer(&self, _window: WindowHandle, id: u32) -> bool {
        self.record(HostCall::KillTimer(id));
        self.host.borrow().timer_ok
    }

    fn high_contrast_enabled(&self) -> bool {
        self.host.borrow().high_contrast.is_some()
    }

    fn high_contrast_colors(&self) -> (Color, Color) {
        self.host.borrow().high_contrast.unwrap_or_default()
    }

    fn system_uses_light_theme(&self) -> bool {
        self.host.borrow().system_light
    }

    fn apps_use_light_theme(&self) -> bool {
        self.host.borrow().apps_light
    }

    fn dpi_for_window(&self, _window: WindowHandle) -> u32 {
        self.host.borrow().dpi
    }

    fn primary_monitor(&self) -> MonitorHandle {
        self.host.borrow().primary_monitor
    }

    fn move_window_to_origin(&self, window: WindowHandle) -> bool {
        self.record(HostCall::MoveWindow(window));
        true
    }

    fn set_foreground(&self, window: WindowHandle) -> bool {
        self.record(HostCall::SetForeground(window));
        true
    }

    fn menu_drop_right_aligned(&self) -> bool {
        self.host.borrow().menu_right_aligned
    }

    fn layout_rtl(&self) -> bool {
        self.host.borrow().rtl
    }

    fn sub_menu(&self, menu: MenuHandle) -> Option<MenuHandle> {
        if menu.is_null() {
            return None;
        }
        self.host.borrow().sub_menu
    }

    fn track_popup_menu(
        &self,
        menu: MenuHandle,
        flags: u32,
        at: Point,
        _window: WindowHandle,
        style: MenuStyle,
    ) -> u32 {
        self.record(HostCall::TrackPopupMenu {
            menu,
            flags,
            at,
            style,
        });
        let modal = self.host.borrow().menu_messages.clone();
        for raw in modal {
            self.deliver(raw);
        }
        self.host.borrow().menu_selection
    }

    fn post_message(&self, _window: WindowHandle, id: u32, wparam: usize, lparam: isize) -> bool {
        self.record(HostCall::Post(id, wparam, lparam));
        self.host.borrow().message_ok
    }

    fn send_notify_message(
        &self,
        _window: WindowHandle,
        id: u32,
        wparam: usize,
        lparam: isize,
    ) -> bool {
        self.record(HostCall::SendNotify(id, wparam, lparam));
        let ok = self.host.borrow().message_ok;
        if ok {
            self.deliver(RawMessage::new(id, wparam, lparam));
        }
        ok
    }

    fn destroy_icon(&self, icon: IconHandle) -> bool {
        self.record(HostCall::DestroyIcon(icon));
        true
    }

    fn destroy_menu(&self, menu: MenuHandle) -> bool {
        self.record(HostCall::DestroyMenu(menu));
        true
    }
}

/// Ordered log of callback invocations.
pub type EventLog = Rc<RefCell<Vec<String>>>;

/// A callback table that appends one entry per invocation to `log`.
pub fn recording_callbacks(log: &EventLog) -> Callbacks {
    macro_rules! push {
        ($log:ident, $($fmt:tt)*) => {
            $log.borrow_mut().push(format!($($fmt)*))
        };
    }

    let l = log.clone();
    let on_window_create: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "window_create"));
    let l = log.clone();
    let on_window_destroy: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "window_destroy"));
    let l = log.clone();
    let on_init: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "init"));
    let l = log.clone();
    let on_release: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "release"));
    let l = log.clone();
    let on_show: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "show"));
    let l = log.clone();
    let on_hide: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "hide"));
    let l = log.clone();
    let on_icon_change: IconCallback =
        Rc::new(move |_: &mut NotifyIcon, icon: IconHandle| push!(l, "icon_change({})", icon.0));
    let l = log.clone();
    let on_menu_change: MenuCallback =
        Rc::new(move |_: &mut NotifyIcon, menu: MenuHandle| push!(l, "menu_change({})", menu.0));
    let l = log.clone();
    let on_tip_change: TipCallback =
        Rc::new(move |_: &mut NotifyIcon, tip: &str| push!(l, "tip_change({tip})"));
    let l = log.clone();
    let on_tip_type_change: TipTypeCallback = Rc::new(move |_: &mut NotifyIcon, tip_type: TipType| {
        push!(l, "tip_type_change({tip_type:?})")
    });
    let l = log.clone();
    let on_key_select: PointCallback =
        Rc::new(move |_: &mut NotifyIcon, p: Point| push!(l, "key_select({},{})", p.x, p.y));
    let l = log.clone();
    let on_left_click: PointCallback =
        Rc::new(move |_: &mut NotifyIcon, p: Point| push!(l, "left_click({},{})", p.x, p.y));
    let l = log.clone();
    let on_left_double_click: PointCallback = Rc::new(move |_: &mut NotifyIcon, p: Point| {
        push!(l, "left_double_click({},{})", p.x, p.y)
    });
    let l = log.clone();
    let on_middle_click: PointCallback =
        Rc::new(move |_: &mut NotifyIcon, p: Point| push!(l, "middle_click({},{})", p.x, p.y));
    let l = log.clone();
    let on_context_menu_open: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "menu_open"));
    let l = log.clone();
    let on_context_menu_item_click: IdCallback =
        Rc::new(move |_: &mut NotifyIcon, id: u32| push!(l, "menu_item({id})"));
    let l = log.clone();
    let on_context_menu_close: MenuCloseCallback =
        Rc::new(move |_: &mut NotifyIcon, selected: bool| push!(l, "menu_close({selected})"));
    let l = log.clone();
    let on_balloon_show: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "balloon_show"));
    let l = log.clone();
    let on_balloon_hide: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "balloon_hide"));
    let l = log.clone();
    let on_balloon_timeout: Callback =
        Rc::new(move |_: &mut NotifyIcon| push!(l, "balloon_timeout"));
    let l = log.clone();
    let on_balloon_click: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "balloon_click"));
    let l = log.clone();
    let on_rich_popup_open: PointCallback =
        Rc::new(move |_: &mut NotifyIcon, p: Point| push!(l, "popup_open({},{})", p.x, p.y));
    let l = log.clone();
    let on_rich_popup_close: Callback = Rc::new(move |_: &mut NotifyIcon| push!(l, "popup_close"));
    let l = log.clone();
    let on_dpi_change: IdCallback =
        Rc::new(move |_: &mut NotifyIcon, dpi: u32| push!(l, "dpi_change({dpi})"));
    let l = log.clone();
    let on_system_theme_change: ThemeCallback = Rc::new(move |_: &mut NotifyIcon, info: ThemeInfo| {
        push!(l, "system_theme({:?})", info.theme)
    });
    let l = log.clone();
    let on_apps_theme_change: ThemeCallback = Rc::new(move |_: &mut NotifyIcon, info: ThemeInfo| {
        push!(l, "apps_theme({:?})", info.theme)
    });
    let l = log.clone();
    let on_taskbar_created: Callback =
        Rc::new(move |_: &mut NotifyIcon| push!(l, "taskbar_created"));
    let l = log.clone();
    let on_timer: IdCallback = Rc::new(move |_: &mut NotifyIcon, id: u32| push!(l, "timer({id})"));
    let l = log.clone();
    let on_custom_message: MessageCallback = Rc::new(move |_: &mut NotifyIcon, raw: &RawMessage| {
        push!(l, "custom({:#x},{},{})", raw.id, raw.wparam, raw.lparam)
    });
    let l = log.clone();
    let on_system_message: SystemMessageCallback =
        Rc::new(move |_: &mut NotifyIcon, raw: &RawMessage| {
            push!(l, "system({:#x})", raw.id);
            false
        });

    Callbacks {
        on_window_create: Some(on_window_create),
        on_window_destroy: Some(on_window_destroy),
        on_init: Some(on_init),
        on_release: Some(on_release),
        on_show: Some(on_show),
        on_hide: Some(on_hide),
        on_icon_change: Some(on_icon_change),
        on_menu_change: Some(on_menu_change),
        on_tip_change: Some(on_tip_change),
        on_tip_type_change: Some(on_tip_type_change),
        on_key_select: Some(on_key_select),
        on_left_click: Some(on_left_click),
        on_left_double_click: Some(on_left_double_click),
        on_middle_click: Some(on_middle_click),
        on_context_menu_open: Some(on_context_menu_open),
        on_context_menu_item_click: Some(on_context_menu_item_click),
        on_context_menu_close: Some(on_context_menu_close),
        on_balloon_show: Some(on_balloon_show),
        on_balloon_hide: Some(on_balloon_hide),
        on_balloon_timeout: Some(on_balloon_timeout),
        on_balloon_click: Some(on_balloon_click),
        on_rich_popup_open: Some(on_rich_popup_open),
        on_rich_popup_close: Some(on_rich_popup_close),
        on_dpi_change: Some(on_dpi_change),
        on_system_theme_change: Some(on_system_theme_change),
        on_apps_theme_change: Some(on_apps_theme_change),
        on_taskbar_created: Some(on_taskbar_created),
        on_timer: Some(on_timer),
        on_custom_message: Some(on_custom_message),
        on_system_message: Some(on_system_message),
    }
}

/// A live icon on a fresh fake host, with every callback recorded.
pub struct Harness {
    pub icon: Box<NotifyIcon>,
    pub host: Rc<RefCell<FakeHost>>,
    pub log: EventLog,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(NotifyIconConfig::default())
    }

    pub fn with_config(config: NotifyIconConfig) -> Self {
        Self::with_host(config, |_| {})
    }

    /// Lets the test script the host before the icon is created.
    pub fn with_host(mut config: NotifyIconConfig, setup: impl FnOnce(&mut FakeHost)) -> Self {
        let (shell, host) = FakeShell::new();
        setup(&mut host.borrow_mut());
        let log = EventLog::default();
        config.callbacks = recording_callbacks(&log);
        let icon = NotifyIcon::new(config, Box::new(shell)).expect("icon init");
        Self { icon, host, log }
    }

    /// Takes the recorded events, leaving the log empty.
    pub fn events(&self) -> Vec<String> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Clears the host call log.
    pub fn reset_calls(&self) {
        self.host.borrow_mut().calls.clear();
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.host.borrow().calls.clone()
    }

    pub fn dispatch(&mut self, raw: RawMessage) -> Option<isize> {
        self.icon.dispatch(&raw)
    }
}
