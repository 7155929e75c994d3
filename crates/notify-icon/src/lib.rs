//! Notification-area icon for the Windows shell.
//!
//! One [`NotifyIcon`] owns a hidden window and an icon in the notification
//! area, and turns the shell's messages into a single callback model:
//! clicks, keyboard selection, context menus, balloons, rich popups, theme
//! and DPI changes, timers and application messages.
//!
//! ```ignore
//! let shell = notifyarea_icon::native_shell()?;
//! let mut icon = NotifyIcon::new(config, shell)?;
//! icon.show(false)?;
//! notifyarea_icon::native_event_loop()?.run()?;
//! ```
//!
//! # Platform notes
//! - Windows: Win32 `Shell_NotifyIconW` with notify-icon version 4.
//! - Elsewhere the native binding reports [`Error::UnsupportedVersion`]; the
//!   state machine itself is host independent behind [`Shell`].
//! - Icons are `!Send`; all calls and callbacks happen on the thread that
//!   owns the window. [`StopSignal`] is the cross-thread handle.

mod balloon;
mod callbacks;
mod config;
mod dispatch;
mod error;
mod event_loop;
mod handles;
mod icon;
mod message;
mod shell;
pub mod sys;
mod text;
mod theme;

#[cfg(test)]
mod testing;

#[cfg(target_os = "windows")]
#[path = "native_windows.rs"]
mod platform;

#[cfg(not(target_os = "windows"))]
#[path = "native_other.rs"]
mod platform;

pub use balloon::{Balloon, BalloonFlags, BalloonIcon};
pub use callbacks::{
    Callback, Callbacks, IconCallback, IdCallback, MenuCallback, MenuCloseCallback,
    MessageCallback, PointCallback, SystemMessageCallback, ThemeCallback, TipCallback,
    TipTypeCallback,
};
pub use config::{DEFAULT_CLASS_NAME, NotifyIconConfig, TipType, USER_TIMER_ID, UserData};
pub use error::{Error, Result, Status, describe, describe_wide, status_code};
pub use event_loop::{EventLoop, MessagePump, Pumped, StopSignal, Waker};
pub use handles::{IconHandle, MenuHandle, ModuleHandle, MonitorHandle, WindowHandle};
pub use icon::NotifyIcon;
pub use message::{Message, NotifyEvent, Point, RawMessage};
pub use platform::{native_event_loop, native_shell};
pub use shell::{DispatchTarget, MenuStyle, NotifyIconData, NotifyOp, Shell, WindowParams};
pub use text::{BalloonText, BalloonTitle, TipText, WideText};
pub use theme::{Color, Theme, ThemeInfo, current_themes};

#[cfg(target_os = "windows")]
pub use platform::{Win32Pump, Win32Shell};
