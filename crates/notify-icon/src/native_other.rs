//! Stub binding for hosts without a notification area this crate drives.

use crate::error::{Error, Result};
use crate::event_loop::{EventLoop, MessagePump};
use crate::shell::Shell;

pub fn native_shell() -> Result<Box<dyn Shell>> {
    Err(Error::UnsupportedVersion)
}

pub fn native_event_loop() -> Result<EventLoop<Box<dyn MessagePump>>> {
    Err(Error::UnsupportedVersion)
}
