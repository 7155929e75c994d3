//! The notify-icon state record and its control API.
//!
//! A [`NotifyIcon`] owns one hidden window and at most one icon in the
//! notification area. Setters are diff-based: when nothing changes they
//! return without touching the host; otherwise the host is updated first and
//! only on success is the cached state changed and the matching callback
//! fired.

use std::ptr::NonNull;
use std::rc::Rc;

use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::balloon::Balloon;
use crate::callbacks::Callbacks;
use crate::config::{NotifyIconConfig, TipType, USER_TIMER_ID, UserData};
use crate::error::{Error, Result, Status};
use crate::handles::{IconHandle, MenuHandle, ModuleHandle, MonitorHandle, WindowHandle};
use crate::message::Message;
use crate::shell::{
    DispatchSlot, DispatchTarget, MenuStyle, NotifyIconData, NotifyOp, Shell, WindowParams,
};
use crate::sys;
use crate::text::TipText;
use crate::theme::{self, ThemeInfo};

const WINDOW_WIDTH: i32 = 100;
const WINDOW_HEIGHT: i32 = 40;
const DEFAULT_DPI: u32 = 96;

/// One notification-area icon and its hidden owner window.
///
/// Always heap allocated: the window reaches the record through a pointer
/// republished at the end of every mutating call.
pub struct NotifyIcon {
    pub(crate) shell: Box<dyn Shell>,
    pub(crate) callbacks: Callbacks,
    pub(crate) slot: Rc<DispatchSlot>,

    pub(crate) window: Option<WindowHandle>,
    module: Option<ModuleHandle>,
    requested_module: Option<ModuleHandle>,
    class_name: String,
    class_registered: bool,
    window_title: String,
    window_style: u32,
    parent_window: Option<WindowHandle>,

    pub(crate) icon: IconHandle,
    pub(crate) menu: MenuHandle,
    pub(crate) tip: TipText,
    pub(crate) tip_type: TipType,
    guid: Option<Uuid>,
    pub(crate) icon_created: bool,
    pub(crate) icon_visible: bool,

    pub(crate) system_theme: ThemeInfo,
    pub(crate) apps_theme: ThemeInfo,
    pub(crate) dpi: u32,
    pub(crate) primary_monitor: MonitorHandle,
    pub(crate) is_dpi_event: bool,
    pub(crate) key_select_pending: bool,
    pub(crate) taskbar_created_id: Option<u32>,
    pub(crate) menu_style: MenuStyle,

    user_data1: Option<UserData>,
    user_data2: Option<UserData>,
    released: bool,
}

impl NotifyIcon {
    /// Creates the hidden window, snapshots monitor, theme and DPI, then
    /// fires `on_init`.
    pub fn new(config: NotifyIconConfig, shell: Box<dyn Shell>) -> Result<Box<Self>> {
        debug!(
            class_name = ?config.class_name,
            guid = ?config.guid,
            icon = ?config.icon,
            menu = ?config.menu,
            tip = %config.tip,
            tip_type = ?config.tip_type,
            window_style = config.window_style,
            "notify icon init"
        );

        let class_name = config.resolved_class_name();
        let guid = config.resolved_guid();
        let mut icon = Box::new(Self {
            shell,
            callbacks: config.callbacks,
            slot: Rc::default(),
            window: None,
            module: None,
            requested_module: config.module.and_then(ModuleHandle::non_null),
            class_name,
            class_registered: false,
            window_title: config.window_title,
            window_style: config.window_style,
            parent_window: config.parent_window,
            icon: config.icon,
            menu: config.menu,
            tip: config.tip,
            tip_type: config.tip_type,
            guid,
            icon_created: false,
            icon_visible: false,
            system_theme: ThemeInfo::default(),
            apps_theme: ThemeInfo::default(),
            dpi: DEFAULT_DPI,
            primary_monitor: MonitorHandle::NULL,
            is_dpi_event: false,
            key_select_pending: false,
            taskbar_created_id: None,
            menu_style: config.menu_style,
            user_data1: config.user_data1,
            user_data2: config.user_data2,
            released: false,
        });

        icon.guarded(Self::initialise)?;
        Ok(icon)
    }

    fn initialise(&mut self) -> Result {
        if let Err(err) = self.create_window() {
            self.released = true;
            return Err(err);
        }

        self.primary_monitor = self.shell.primary_monitor();
        let (system, apps) = theme::current_themes(self.shell.as_ref());
        self.system_theme = system;
        self.apps_theme = apps;
        if let Some(window) = self.window {
            self.dpi = self.shell.dpi_for_window(window);
        }

        info!(
            window = ?self.window,
            dpi = self.dpi,
            system_theme = ?self.system_theme.theme,
            apps_theme = ?self.apps_theme.theme,
            "notify icon window created"
        );

        self.notify_window(Message::Init);
        Ok(Status::Ok)
    }

    /// Removes the icon, destroys the window and unregisters the class.
    ///
    /// `destroy_icon` / `destroy_menu` also free the current icon and menu.
    /// Every later operation fails with [`Error::InstanceNull`].
    pub fn release(&mut self, destroy_icon: bool, destroy_menu: bool) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(destroy_icon, destroy_menu, "release");

            this.notify_window(Message::Release);

            match this.delete_icon() {
                Ok(_) | Err(Error::IconNotCreated) => {}
                Err(err) => warn!(%err, "release: icon could not be removed"),
            }
            this.destroy_window();

            if destroy_icon && !this.icon.is_null() {
                this.shell.destroy_icon(this.icon);
            }
            if destroy_menu && !this.menu.is_null() {
                this.shell.destroy_menu(this.menu);
            }

            this.invalidate();
            info!("notify icon released");
            Ok(Status::Ok)
        })
    }

    /// Shows the icon, adding it to the notification area if needed.
    ///
    /// With `recreate` the icon is removed and added again, which is how a
    /// caller restores it after the taskbar restarted.
    pub fn show(&mut self, recreate: bool) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(
                recreate,
                visible = this.icon_visible,
                created = this.icon_created,
                window = ?this.window,
                "show"
            );

            if this.icon_visible && !recreate {
                return Ok(Status::IconAlreadyShown);
            }

            if this.window.is_none() {
                this.create_window()?;
            }

            if recreate && let Err(err) = this.delete_icon() {
                // Usually the shell has already forgotten the icon.
                debug!(%err, "recreate: treating icon as gone");
                this.icon_created = false;
                this.icon_visible = false;
            }

            if !this.icon_created {
                this.create_icon()?;
            } else {
                let mut data = this.descriptor()?;
                data.flags |= sys::NIF_STATE;
                data.state = 0;
                data.state_mask = sys::NIS_HIDDEN;
                if this.tip_type == TipType::Standard {
                    data.flags |= sys::NIF_SHOWTIP;
                }
                if !this.shell.notify_icon(NotifyOp::Modify, &data) {
                    return Err(Error::FailedToShowIcon);
                }
            }

            this.icon_visible = true;
            this.notify_window(Message::Show);
            Ok(Status::Ok)
        })
    }

    pub fn hide(&mut self) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(
                visible = this.icon_visible,
                created = this.icon_created,
                window = ?this.window,
                "hide"
            );

            if !this.icon_visible {
                return Ok(Status::IconAlreadyHidden);
            }
            if !this.icon_created {
                return Err(Error::IconNotCreated);
            }

            let mut data = this.descriptor()?;
            data.flags |= sys::NIF_STATE;
            data.state = sys::NIS_HIDDEN;
            data.state_mask = sys::NIS_HIDDEN;
            if !this.shell.notify_icon(NotifyOp::Modify, &data) {
                return Err(Error::FailedToHideIcon);
            }

            this.icon_visible = false;
            this.notify_window(Message::Hide);
            Ok(Status::Ok)
        })
    }

    /// Swaps the icon image. With `destroy_current` the previous image is
    /// freed once the swap succeeded.
    pub fn set_icon(&mut self, icon: IconHandle, destroy_current: bool) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(?icon, destroy_current, current = ?this.icon, "set_icon");

            if icon == this.icon {
                return Ok(Status::Ok);
            }

            if this.icon_created {
                let mut data = this.descriptor()?;
                data.flags |= sys::NIF_ICON;
                data.icon = icon;
                if this.tip_type == TipType::Standard {
                    data.flags |= sys::NIF_SHOWTIP;
                }
                if !this.shell.notify_icon(NotifyOp::Modify, &data) {
                    return Err(Error::FailedToChangeIcon);
                }
            }

            let previous = std::mem::replace(&mut this.icon, icon);
            if destroy_current && !previous.is_null() {
                this.shell.destroy_icon(previous);
            }
            this.notify_window(Message::IconChange);
            Ok(Status::Ok)
        })
    }

    /// Swaps the context menu. The host is not involved until the menu is
    /// next opened.
    pub fn set_menu(&mut self, menu: MenuHandle, destroy_current: bool) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(?menu, destroy_current, current = ?this.menu, "set_menu");

            if menu == this.menu {
                return Ok(Status::Ok);
            }

            let previous = std::mem::replace(&mut this.menu, menu);
            if destroy_current && !previous.is_null() {
                this.shell.destroy_menu(previous);
            }
            this.notify_window(Message::MenuChange);
            Ok(Status::Ok)
        })
    }

    /// Sets the tip text, truncated to 127 UTF-16 units.
    pub fn set_tip(&mut self, tip: &str) -> Result {
        self.guarded(|this| -> Result {
            this.set_tip_text(TipText::from_str(tip))
        })
    }

    /// Sets the tip from UTF-16 units (up to the first NUL).
    pub fn set_tip_wide(&mut self, tip: &[u16]) -> Result {
        self.guarded(|this| -> Result {
            this.set_tip_text(TipText::from_wide(tip))
        })
    }

    /// Sets the tip from raw UTF-8 bytes (up to the first NUL).
    pub fn set_tip_utf8(&mut self, tip: &[u8]) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            let tip = TipText::from_utf8(tip).map_err(|_| Error::FailedToConvertTip)?;
            this.set_tip_text(tip)
        })
    }

    pub fn set_tip_text(&mut self, tip: TipText) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(%tip, current = %this.tip, "set_tip");

            if tip == this.tip {
                return Ok(Status::Ok);
            }

            if this.icon_created {
                let mut data = this.descriptor()?;
                data.flags |= sys::NIF_TIP;
                if this.tip_type == TipType::Standard {
                    data.flags |= sys::NIF_SHOWTIP;
                    data.tip = tip;
                }
                if !this.shell.notify_icon(NotifyOp::Modify, &data) {
                    return Err(Error::FailedToChangeTip);
                }
            }

            this.tip = tip;
            this.notify_window(Message::TipChange);
            Ok(Status::Ok)
        })
    }

    pub fn set_tip_type(&mut self, tip_type: TipType) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(?tip_type, current = ?this.tip_type, "set_tip_type");

            if tip_type == this.tip_type {
                return Ok(Status::Ok);
            }

            if this.icon_created {
                let mut data = this.descriptor()?;
                data.flags |= sys::NIF_TIP;
                if tip_type == TipType::Standard {
                    data.flags |= sys::NIF_SHOWTIP;
                    data.tip = this.tip;
                }
                if !this.shell.notify_icon(NotifyOp::Modify, &data) {
                    return Err(Error::FailedToChangeTip);
                }
            }

            this.tip_type = tip_type;
            this.notify_window(Message::TipTypeChange);
            Ok(Status::Ok)
        })
    }

    pub fn icon(&self) -> Result<IconHandle> {
        self.ensure_live()?;
        Ok(self.icon)
    }

    pub fn menu(&self) -> Result<MenuHandle> {
        self.ensure_live()?;
        Ok(self.menu)
    }

    pub fn tip(&self) -> Result<&TipText> {
        self.ensure_live()?;
        Ok(&self.tip)
    }

    /// Tip as UTF-8; fails if it holds unpaired surrogates.
    pub fn tip_string(&self) -> Result<String> {
        self.ensure_live()?;
        self.tip.to_utf8().map_err(|_| Error::FailedToConvertTip)
    }

    /// Copies the tip into `buffer` as null-terminated UTF-16.
    ///
    /// Returns the length including the terminator. With no buffer only the
    /// required length is returned.
    pub fn tip_wide_into(&self, buffer: Option<&mut [u16]>) -> Result<usize> {
        self.ensure_live()?;
        let required = self.tip.len() + 1;
        let Some(buffer) = buffer else {
            return Ok(required);
        };
        if buffer.len() < required {
            return Err(Error::InsufficientBuffer);
        }
        Ok(self.tip.copy_into(buffer))
    }

    /// Copies the tip into `buffer` as null-terminated UTF-8.
    ///
    /// Same contract as [`NotifyIcon::tip_wide_into`], in bytes.
    pub fn tip_utf8_into(&self, buffer: Option<&mut [u8]>) -> Result<usize> {
        let tip = self.tip_string()?;
        let required = tip.len() + 1;
        let Some(buffer) = buffer else {
            return Ok(required);
        };
        if buffer.len() < required {
            return Err(Error::InsufficientBuffer);
        }
        buffer[..tip.len()].copy_from_slice(tip.as_bytes());
        buffer[tip.len()] = 0;
        Ok(required)
    }

    pub fn tip_type(&self) -> Result<TipType> {
        self.ensure_live()?;
        Ok(self.tip_type)
    }

    pub fn is_icon_created(&self) -> Result<bool> {
        self.ensure_live()?;
        Ok(self.icon_created)
    }

    pub fn is_icon_visible(&self) -> Result<bool> {
        self.ensure_live()?;
        Ok(self.icon_visible)
    }

    pub fn window_handle(&self) -> Result<Option<WindowHandle>> {
        self.ensure_live()?;
        Ok(self.window)
    }

    pub fn module_handle(&self) -> Result<Option<ModuleHandle>> {
        self.ensure_live()?;
        Ok(self.module)
    }

    pub fn guid(&self) -> Result<Option<Uuid>> {
        self.ensure_live()?;
        Ok(self.guid)
    }

    /// Last DPI delivered to `on_dpi_change` (or read at init).
    pub fn dpi(&self) -> Result<u32> {
        self.ensure_live()?;
        Ok(self.dpi)
    }

    pub fn system_theme(&self) -> Result<ThemeInfo> {
        self.ensure_live()?;
        Ok(self.system_theme)
    }

    pub fn apps_theme(&self) -> Result<ThemeInfo> {
        self.ensure_live()?;
        Ok(self.apps_theme)
    }

    pub fn menu_style(&self) -> Result<MenuStyle> {
        self.ensure_live()?;
        Ok(self.menu_style)
    }

    /// Style value passed to the context-menu renderer.
    pub fn set_menu_style(&mut self, style: u32) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(style, "set_menu_style");
            this.menu_style.style = style;
            Ok(Status::Ok)
        })
    }

    /// Theme value passed to the context-menu renderer.
    pub fn set_menu_theme(&mut self, theme: u32) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(theme, "set_menu_theme");
            this.menu_style.theme = theme;
            Ok(Status::Ok)
        })
    }

    pub fn user_data1(&self) -> Result<Option<UserData>> {
        self.ensure_live()?;
        Ok(self.user_data1.clone())
    }

    pub fn user_data2(&self) -> Result<Option<UserData>> {
        self.ensure_live()?;
        Ok(self.user_data2.clone())
    }

    pub fn set_user_data1(&mut self, data: Option<UserData>) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            this.user_data1 = data;
            Ok(Status::Ok)
        })
    }

    pub fn set_user_data2(&mut self, data: Option<UserData>) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            this.user_data2 = data;
            Ok(Status::Ok)
        })
    }

    /// Replaces handlers at runtime.
    pub fn update_callbacks(&mut self, update: impl FnOnce(&mut Callbacks)) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            update(&mut this.callbacks);
            Ok(Status::Ok)
        })
    }

    /// Shows a balloon notification; the icon must exist.
    pub fn send_balloon(&mut self, balloon: &Balloon) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(
                title = %balloon.title,
                text = %balloon.text,
                icon_kind = ?balloon.icon_kind,
                icon = ?balloon.icon,
                flags = ?balloon.flags,
                created = this.icon_created,
                "send_balloon"
            );

            if !this.icon_created {
                return Err(Error::IconNotCreated);
            }

            let mut data = this.descriptor()?;
            balloon.apply(&mut data, this.tip_type);
            if !this.shell.notify_icon(NotifyOp::Modify, &data) {
                return Err(Error::FailedToShowBalloon);
            }
            Ok(Status::Ok)
        })
    }

    /// Dismisses the balloon currently shown, if any.
    pub fn remove_balloon(&mut self) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(created = this.icon_created, "remove_balloon");

            if !this.icon_created {
                return Err(Error::IconNotCreated);
            }

            let mut data = this.descriptor()?;
            data.flags |= sys::NIF_INFO;
            data.info_flags = sys::NIIF_NONE;
            if !this.shell.notify_icon(NotifyOp::Modify, &data) {
                return Err(Error::FailedToRemoveBalloon);
            }
            Ok(Status::Ok)
        })
    }

    /// Starts (or restarts) a caller timer. Ids below
    /// [`USER_TIMER_ID`] are reserved.
    pub fn start_timer(&mut self, id: u32, interval_ms: u32) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(id, interval_ms, "start_timer");

            let window = this.window.ok_or(Error::InvalidWindowHandle)?;
            if id < USER_TIMER_ID {
                return Err(Error::InvalidTimerId);
            }
            if !this.shell.set_timer(window, id, interval_ms) {
                return Err(Error::FailedToStartTimer);
            }
            Ok(Status::Ok)
        })
    }

    pub fn stop_timer(&mut self, id: u32) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(id, "stop_timer");

            let window = this.window.ok_or(Error::InvalidWindowHandle)?;
            if id < USER_TIMER_ID {
                return Err(Error::InvalidTimerId);
            }
            if !this.shell.kill_timer(window, id) {
                return Err(Error::FailedToStopTimer);
            }
            Ok(Status::Ok)
        })
    }

    /// Delivers an application message to the window. Ids outside the
    /// application range are ignored.
    pub fn send_custom_message(&mut self, id: u32, wparam: usize, lparam: isize) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(id, wparam, lparam, "send_custom_message");

            let window = this.window.ok_or(Error::InvalidWindowHandle)?;
            if sys::is_app_message(id)
                && !this.shell.send_notify_message(window, id, wparam, lparam)
            {
                return Err(Error::FailedToSendMessage);
            }
            Ok(Status::Ok)
        })
    }

    /// Queues an application message for the window. Ids outside the
    /// application range are ignored.
    pub fn post_custom_message(&mut self, id: u32, wparam: usize, lparam: isize) -> Result {
        self.guarded(|this| -> Result {
            this.ensure_live()?;
            debug!(id, wparam, lparam, "post_custom_message");

            let window = this.window.ok_or(Error::InvalidWindowHandle)?;
            if sys::is_app_message(id) && !this.shell.post_message(window, id, wparam, lparam) {
                return Err(Error::FailedToPostMessage);
            }
            Ok(Status::Ok)
        })
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub(crate) fn ensure_live(&self) -> Result<()> {
        if self.released {
            return Err(Error::InstanceNull);
        }
        Ok(())
    }

    /// Runs `f` with the record marked busy, handles whatever the host
    /// delivered meanwhile, then republishes the record for its window.
    pub(crate) fn guarded<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let slot = Rc::clone(&self.slot);
        slot.enter();
        let result = f(&mut *self);
        self.drain_deferred();
        slot.leave();
        let record = if self.released {
            None
        } else {
            Some(NonNull::from(&mut *self))
        };
        slot.publish(record);
        result
    }

    /// Handles messages the host delivered while the record was busy.
    pub(crate) fn drain_deferred(&mut self) {
        while let Some(raw) = self.slot.next_deferred() {
            trace!(id = raw.id, "deferred message");
            self.handle_message(&raw);
        }
    }

    /// Forgets the window after the host destroyed it.
    pub(crate) fn detach_window(&mut self) {
        self.window = None;
        self.icon_created = false;
        self.icon_visible = false;
    }

    /// Routes an internal notification, as long as a window exists to
    /// receive it.
    pub(crate) fn notify_window(&mut self, msg: Message) {
        if self.window.is_some() {
            self.route(msg);
        }
    }

    fn descriptor(&self) -> Result<NotifyIconData> {
        let window = self.window.ok_or(Error::InvalidWindowHandle)?;
        Ok(NotifyIconData::for_window(window, self.guid))
    }

    fn create_window(&mut self) -> Result {
        if self.window.is_some() {
            return Ok(Status::WindowAlreadyCreated);
        }

        let module = self
            .requested_module
            .or_else(|| self.shell.module_handle())
            .and_then(ModuleHandle::non_null)
            .ok_or(Error::InvalidModuleHandle)?;

        if !self.class_registered {
            if !self.shell.register_class(module, &self.class_name) {
                return Err(Error::FailedToRegisterWindowClass);
            }
            self.class_registered = true;
        }
        self.module = Some(module);

        let params = WindowParams {
            module,
            class_name: self.class_name.clone(),
            title: self.window_title.clone(),
            style: self.window_style,
            parent: self.parent_window,
            x: 0,
            y: 0,
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
        };
        let target = DispatchTarget::new(Rc::clone(&self.slot));
        let Some(window) = self.shell.create_window(&params, target) else {
            self.shell.unregister_class(module, &self.class_name);
            self.class_registered = false;
            return Err(Error::FailedToCreateWindow);
        };

        self.window = Some(window);
        // Creation messages arrive before the host returns the handle.
        self.drain_deferred();
        Ok(Status::Ok)
    }

    /// Destroys the window if it still exists and unregisters the class.
    fn destroy_window(&mut self) {
        if let Some(window) = self.window {
            self.shell.destroy_window(window);
            self.drain_deferred();
        }
        self.detach_window();

        if self.class_registered
            && let Some(module) = self.module
        {
            self.shell.unregister_class(module, &self.class_name);
            self.class_registered = false;
        }
    }

    fn create_icon(&mut self) -> Result {
        if self.icon_created {
            return Ok(Status::IconAlreadyCreated);
        }

        let mut data = self.descriptor()?;
        // The tip flag is needed for both the standard tip and rich popups.
        data.flags |= sys::NIF_TIP | sys::NIF_ICON | sys::NIF_MESSAGE;
        data.callback_message = sys::WM_NOTIFYICON;
        data.icon = self.icon;
        data.version = sys::NOTIFYICON_VERSION_4;
        if self.tip_type == TipType::Standard {
            data.flags |= sys::NIF_SHOWTIP;
            data.tip = self.tip;
        }

        if !self.shell.notify_icon(NotifyOp::Add, &data) {
            return Err(Error::FailedToAddIcon);
        }
        if !self.shell.notify_icon(NotifyOp::SetVersion, &data) {
            if !self.shell.notify_icon(NotifyOp::Delete, &data) {
                return Err(Error::FailedToDeleteIcon);
            }
            return Err(Error::UnsupportedVersion);
        }

        self.icon_created = true;
        self.icon_visible = true;
        info!(window = ?self.window, guid = ?self.guid, "notify icon added");
        Ok(Status::Ok)
    }

    fn delete_icon(&mut self) -> Result {
        if !self.icon_created {
            return Err(Error::IconNotCreated);
        }

        let data = self.descriptor()?;
        if !self.shell.notify_icon(NotifyOp::Delete, &data) {
            return Err(Error::FailedToDeleteIcon);
        }

        self.icon_created = false;
        self.icon_visible = false;
        Ok(Status::Ok)
    }

    fn invalidate(&mut self) {
        self.callbacks = Callbacks::default();
        self.window = None;
        self.module = None;
        self.icon = IconHandle::NULL;
        self.menu = MenuHandle::NULL;
        self.tip = TipText::new();
        self.icon_created = false;
        self.icon_visible = false;
        self.is_dpi_event = false;
        self.key_select_pending = false;
        self.user_data1 = None;
        self.user_data2 = None;
        self.released = true;
    }
}

impl Drop for NotifyIcon {
    fn drop(&mut self) {
        if !self.released {
            warn!("notify icon dropped without release");
            let _ = self.release(false, false);
        }
        self.slot.publish(None);
    }
}
