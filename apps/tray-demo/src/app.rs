//! Application orchestrator: wires the icon, its callbacks and the event loop.

use std::cell::Cell;
use std::rc::Rc;

use notifyarea_icon::{
    Balloon, BalloonFlags, BalloonIcon, Callback, Callbacks, IdCallback, IconHandle, MenuHandle,
    MessageCallback, NotifyIcon, NotifyIconConfig, Point, PointCallback, RawMessage, StopSignal,
    ThemeCallback, ThemeInfo, TipText, TipType, USER_TIMER_ID,
};
use tracing::{info, warn};

use crate::config::DemoConfig;

const HEARTBEAT_TIMER_ID: u32 = USER_TIMER_ID;

/// Context-menu commands, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    ShowBalloon = 1,
    ToggleTipMode = 2,
    Quit = 3,
}

impl MenuCommand {
    pub const ALL: [MenuCommand; 3] = [
        MenuCommand::ShowBalloon,
        MenuCommand::ToggleTipMode,
        MenuCommand::Quit,
    ];

    pub fn id(self) -> u32 {
        self as u32
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.id() == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuCommand::ShowBalloon => "Show balloon",
            MenuCommand::ToggleTipMode => "Toggle tooltip mode",
            MenuCommand::Quit => "Quit",
        }
    }
}

/// Runs the demo until the user quits; returns the exit code.
pub fn run(config: DemoConfig) -> anyhow::Result<i32> {
    let shell = notifyarea_icon::native_shell()?;
    let mut event_loop = notifyarea_icon::native_event_loop()?;
    let stop = event_loop.stop_signal();

    let icon_config = NotifyIconConfig {
        class_name: Some(config.class_name.clone()),
        guid: config.guid,
        icon: resources::application_icon(),
        menu: resources::context_menu(),
        tip: TipText::from_str(&config.tip),
        tip_type: config.tip_mode.into(),
        window_title: "notifyarea demo".into(),
        callbacks: callbacks(&config, stop),
        ..NotifyIconConfig::default()
    };

    let mut icon = NotifyIcon::new(icon_config, shell)?;
    icon.show(false)?;
    if config.heartbeat_ms > 0 {
        icon.start_timer(HEARTBEAT_TIMER_ID, config.heartbeat_ms)?;
    }
    if config.balloon_on_start {
        icon.send_balloon(&balloon(&config))?;
    }

    let code = event_loop.run()?;

    if config.heartbeat_ms > 0
        && let Err(e) = icon.stop_timer(HEARTBEAT_TIMER_ID)
    {
        warn!("heartbeat timer: {e}");
    }
    // The stock icon is shared; only the menu is ours to free.
    icon.release(false, true)?;
    Ok(code)
}

fn balloon(config: &DemoConfig) -> Balloon {
    let flags = if config.balloon_sound {
        BalloonFlags::PLAY_SOUND
    } else {
        BalloonFlags::DEFAULT
    };
    Balloon::new(&config.balloon_title, &config.balloon_text)
        .with_icon(BalloonIcon::SystemInfo, IconHandle::NULL)
        .with_flags(flags)
}

fn callbacks(config: &DemoConfig, stop: StopSignal) -> Callbacks {
    let base_tip = config.tip.clone();
    let beats = Rc::new(Cell::new(0u64));
    let demo_balloon = balloon(config);

    let on_init: Callback = Rc::new(|icon: &mut NotifyIcon| {
        info!(dpi = ?icon.dpi(), "icon initialised");
    });
    let on_left_click: PointCallback = Rc::new(|_: &mut NotifyIcon, at: Point| {
        info!(x = at.x, y = at.y, "left click");
    });
    let on_key_select: PointCallback = Rc::new(|_: &mut NotifyIcon, at: Point| {
        info!(x = at.x, y = at.y, "keyboard select");
    });

    let on_context_menu_item_click: IdCallback = Rc::new(move |icon: &mut NotifyIcon, id: u32| {
        match MenuCommand::from_id(id) {
            Some(MenuCommand::ShowBalloon) => {
                if let Err(e) = icon.send_balloon(&demo_balloon) {
                    warn!("balloon: {e}");
                }
            }
            Some(MenuCommand::ToggleTipMode) => {
                let next = match icon.tip_type() {
                    Ok(TipType::Standard) => TipType::RichPopup,
                    _ => TipType::Standard,
                };
                if let Err(e) = icon.set_tip_type(next) {
                    warn!("tip mode: {e}");
                }
            }
            Some(MenuCommand::Quit) => stop.quit(0),
            None => warn!(id, "unknown menu command"),
        }
    });

    let on_taskbar_created: Callback = Rc::new(|icon: &mut NotifyIcon| {
        info!("taskbar restarted, restoring icon");
        if let Err(e) = icon.show(true) {
            warn!("restore icon: {e}");
        }
    });

    let on_timer: IdCallback = Rc::new(move |icon: &mut NotifyIcon, id: u32| {
        if id != HEARTBEAT_TIMER_ID {
            return;
        }
        beats.set(beats.get() + 1);
        if let Err(e) = icon.set_tip(&format!("{base_tip} ({} beats)", beats.get())) {
            warn!("heartbeat tip: {e}");
        }
    });

    let on_dpi_change: IdCallback = Rc::new(|_: &mut NotifyIcon, dpi: u32| {
        info!(dpi, "dpi changed");
    });
    let on_system_theme_change: ThemeCallback = Rc::new(|_: &mut NotifyIcon, theme: ThemeInfo| {
        info!(theme = ?theme.theme, "system theme changed");
    });
    let on_apps_theme_change: ThemeCallback = Rc::new(|_: &mut NotifyIcon, theme: ThemeInfo| {
        info!(theme = ?theme.theme, "apps theme changed");
    });
    let on_custom_message: MessageCallback = Rc::new(|_: &mut NotifyIcon, raw: &RawMessage| {
        info!(id = raw.id, wparam = raw.wparam, lparam = raw.lparam, "custom message");
    });

    Callbacks {
        on_init: Some(on_init),
        on_left_click: Some(on_left_click),
        on_key_select: Some(on_key_select),
        on_context_menu_item_click: Some(on_context_menu_item_click),
        on_taskbar_created: Some(on_taskbar_created),
        on_timer: Some(on_timer),
        on_dpi_change: Some(on_dpi_change),
        on_system_theme_change: Some(on_system_theme_change),
        on_apps_theme_change: Some(on_apps_theme_change),
        on_custom_message: Some(on_custom_message),
        ..Callbacks::default()
    }
}

/// Native icon and menu resources for the demo.
mod resources {
    use super::*;

    /// Stock application icon.
    pub fn application_icon() -> IconHandle {
        #[cfg(windows)]
        {
            use windows_sys::Win32::UI::WindowsAndMessaging::{IDI_APPLICATION, LoadIconW};
            // SAFETY: loading a stock icon needs no module.
            let icon = unsafe { LoadIconW(std::ptr::null_mut(), IDI_APPLICATION) };
            IconHandle(icon as isize)
        }

        #[cfg(not(windows))]
        {
            IconHandle::NULL
        }
    }

    /// Menu bar whose first sub-menu holds [`MenuCommand::ALL`].
    pub fn context_menu() -> MenuHandle {
        #[cfg(windows)]
        {
            use windows_sys::Win32::UI::WindowsAndMessaging::{
                AppendMenuW, CreatePopupMenu, MF_POPUP, MF_SEPARATOR, MF_STRING,
            };

            fn wide(s: &str) -> Vec<u16> {
                s.encode_utf16().chain(std::iter::once(0)).collect()
            }

            // SAFETY: menus are created here and owned by the icon; label
            // buffers outlive each call.
            unsafe {
                let bar = CreatePopupMenu();
                let popup = CreatePopupMenu();
                if bar.is_null() || popup.is_null() {
                    return MenuHandle::NULL;
                }
                for cmd in MenuCommand::ALL {
                    if cmd == MenuCommand::Quit {
                        AppendMenuW(popup, MF_SEPARATOR, 0, std::ptr::null());
                    }
                    let label = wide(cmd.label());
                    AppendMenuW(popup, MF_STRING, cmd.id() as usize, label.as_ptr());
                }
                let empty = wide("");
                AppendMenuW(bar, MF_POPUP, popup as usize, empty.as_ptr());
                MenuHandle(bar as isize)
            }
        }

        #[cfg(not(windows))]
        {
            MenuHandle::NULL
        }
    }
}
