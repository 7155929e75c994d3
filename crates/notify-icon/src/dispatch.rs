//! Message dispatcher.
//!
//! Turns raw window messages into callback invocations against the state
//! record, reconciling DPI, theme and shell-restart notifications on the way.

use tracing::{debug, info, trace};

use crate::callbacks::fire;
use crate::config::USER_TIMER_ID;
use crate::icon::NotifyIcon;
use crate::message::{Message, NotifyEvent, Point, RawMessage};
use crate::sys;
use crate::theme;

/// Internal timer that re-arms keyboard selection.
pub(crate) const KEY_SELECT_TIMER_ID: u32 = 2;
const KEY_SELECT_DELAY_MS: u32 = 100;

impl NotifyIcon {
    /// Handles one window message.
    ///
    /// `Some(result)` means the message was consumed; `None` hands it back to
    /// the host's default window procedure. A released record handles
    /// nothing.
    pub fn dispatch(&mut self, raw: &RawMessage) -> Option<isize> {
        self.guarded(|this| this.handle_message(raw))
    }

    pub(crate) fn handle_message(&mut self, raw: &RawMessage) -> Option<isize> {
        if self.ensure_live().is_err() {
            return None;
        }
        trace!(id = raw.id, wparam = raw.wparam, lparam = raw.lparam, "dispatch");

        if self.taskbar_created_id.is_none() {
            self.taskbar_created_id = self.shell.register_taskbar_created().filter(|id| *id != 0);
        }

        if let Some(msg) = Message::decode(raw)
            && let Some(result) = self.route(msg)
        {
            return Some(result);
        }

        if self.taskbar_created_id == Some(raw.id) {
            self.on_taskbar_created();
            return Some(0);
        }

        if sys::is_app_message(raw.id) {
            fire!(self, on_custom_message, raw);
            return Some(0);
        }

        if let Some(cb) = self.callbacks.on_system_message.clone()
            && cb(&mut *self, raw)
        {
            return Some(0);
        }
        None
    }

    /// Handles a decoded message. Internal notifications from the control
    /// API come straight here.
    pub(crate) fn route(&mut self, msg: Message) -> Option<isize> {
        match msg {
            Message::WindowCreate => fire!(self, on_window_create),
            Message::WindowDestroy => {
                fire!(self, on_window_destroy);
                self.detach_window();
            }
            Message::Notify(event) => self.on_notify_event(event),
            Message::DpiChanged => {
                // Wait for the taskbar to settle; it rebroadcasts
                // TaskbarCreated once it has rescaled.
                self.is_dpi_event = true;
            }
            Message::DisplayChange => self.on_display_change(),
            Message::ThemeSetting => self.on_theme_setting(),
            Message::Timer(id) => self.on_timer(id),
            Message::DelayedDpi(dpi) => {
                if dpi != self.dpi {
                    debug!(old = self.dpi, new = dpi, "dpi changed");
                    self.dpi = dpi;
                    fire!(self, on_dpi_change, dpi);
                }
            }
            Message::Init => fire!(self, on_init),
            Message::Release => fire!(self, on_release),
            Message::Show => fire!(self, on_show),
            Message::Hide => fire!(self, on_hide),
            Message::IconChange => {
                let icon = self.icon;
                fire!(self, on_icon_change, icon);
            }
            Message::MenuChange => {
                let menu = self.menu;
                fire!(self, on_menu_change, menu);
            }
            Message::TipChange => {
                let tip = self.tip.to_string_lossy();
                fire!(self, on_tip_change, tip.as_str());
            }
            Message::TipTypeChange => {
                let tip_type = self.tip_type;
                fire!(self, on_tip_type_change, tip_type);
            }
        }
        Some(0)
    }

    fn on_notify_event(&mut self, event: NotifyEvent) {
        match event {
            NotifyEvent::KeySelect(at) => self.on_key_select(at),
            NotifyEvent::ContextMenu(at) => self.show_context_menu(at),
            NotifyEvent::LeftClick(at) => fire!(self, on_left_click, at),
            NotifyEvent::LeftDoubleClick(at) => fire!(self, on_left_double_click, at),
            NotifyEvent::MiddleClick(at) => fire!(self, on_middle_click, at),
            NotifyEvent::BalloonShow => fire!(self, on_balloon_show),
            NotifyEvent::BalloonHide => fire!(self, on_balloon_hide),
            NotifyEvent::BalloonTimeout => fire!(self, on_balloon_timeout),
            NotifyEvent::BalloonClick => fire!(self, on_balloon_click),
            NotifyEvent::PopupOpen(at) => fire!(self, on_rich_popup_open, at),
            NotifyEvent::PopupClose => fire!(self, on_rich_popup_close),
        }
    }

    /// The shell reports keyboard selection twice per keystroke.
    fn on_key_select(&mut self, at: Point) {
        if self.key_select_pending {
            trace!("key select suppressed");
            return;
        }
        // The latch only closes while a timer is armed to reopen it.
        if let Some(window) = self.window {
            self.key_select_pending =
                self.shell.set_timer(window, KEY_SELECT_TIMER_ID, KEY_SELECT_DELAY_MS);
        }
        fire!(self, on_key_select, at);
    }

    fn show_context_menu(&mut self, at: Point) {
        fire!(self, on_context_menu_open);

        let selection = self.track_context_menu(at);
        debug!(selection, "context menu closed");
        if selection != 0 {
            fire!(self, on_context_menu_item_click, selection);
        }
        fire!(self, on_context_menu_close, selection != 0);
    }

    /// Shows the first sub-menu of the context menu and returns the chosen
    /// command, 0 when nothing was chosen or there is no menu to show.
    fn track_context_menu(&mut self, at: Point) -> u32 {
        let Some(window) = self.window else {
            return 0;
        };
        let sub_menu = if self.menu.is_null() {
            None
        } else {
            self.shell.sub_menu(self.menu)
        };
        let Some(sub_menu) = sub_menu else {
            return 0;
        };

        // The menu only dismisses on an outside click when its owner is
        // in the foreground.
        self.shell.set_foreground(window);

        let mut flags =
            sys::TPM_RETURNCMD | sys::TPM_NONOTIFY | sys::TPM_RIGHTBUTTON | sys::TPM_TOPALIGN;
        flags |= if self.shell.menu_drop_right_aligned() {
            sys::TPM_RIGHTALIGN
        } else {
            sys::TPM_LEFTALIGN
        };
        if self.shell.layout_rtl() {
            flags |= sys::TPM_LAYOUTRTL;
        }

        let selection = self
            .shell
            .track_popup_menu(sub_menu, flags, at, window, self.menu_style);
        self.shell.post_message(window, sys::WM_NULL, 0, 0);
        // Messages the menu's modal loop delivered.
        self.drain_deferred();
        selection
    }

    fn on_display_change(&mut self) {
        let monitor = self.shell.primary_monitor();
        if monitor == self.primary_monitor {
            return;
        }
        debug!(old = ?self.primary_monitor, new = ?monitor, "primary monitor changed");
        self.primary_monitor = monitor;
        if let Some(window) = self.window {
            self.shell.move_window_to_origin(window);
        }
    }

    fn on_theme_setting(&mut self) {
        let (system, apps) = theme::current_themes(self.shell.as_ref());

        if system != self.system_theme {
            debug!(old = ?self.system_theme.theme, new = ?system.theme, "system theme changed");
            self.system_theme = system;
            fire!(self, on_system_theme_change, system);
        }
        if apps != self.apps_theme {
            debug!(old = ?self.apps_theme.theme, new = ?apps.theme, "apps theme changed");
            self.apps_theme = apps;
            fire!(self, on_apps_theme_change, apps);
        }
    }

    fn on_timer(&mut self, id: u32) {
        if id >= USER_TIMER_ID {
            fire!(self, on_timer, id);
        } else if id == KEY_SELECT_TIMER_ID {
            if let Some(window) = self.window {
                self.shell.kill_timer(window, KEY_SELECT_TIMER_ID);
            }
            self.key_select_pending = false;
        }
    }

    fn on_taskbar_created(&mut self) {
        if self.is_dpi_event {
            self.is_dpi_event = false;
        } else {
            info!("taskbar restarted");
            fire!(self, on_taskbar_created);
        }

        let Some(window) = self.window else {
            return;
        };
        let dpi = self.shell.dpi_for_window(window);
        if dpi != self.dpi {
            self.shell
                .post_message(window, sys::WM_DPICHANGED_DELAYED, dpi as usize, 0);
        }
    }
}
