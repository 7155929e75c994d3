//! Balloon notifications.

use bitflags::bitflags;

use crate::config::TipType;
use crate::error::{Error, Result};
use crate::handles::IconHandle;
use crate::shell::NotifyIconData;
use crate::sys;
use crate::text::{BalloonText, BalloonTitle};

bitflags! {
    /// Delivery options for a balloon.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BalloonFlags: u32 {
        const DEFAULT = 0x1;
        /// Drop the balloon instead of queueing it if it cannot show now.
        const REALTIME = 0x2;
        const PLAY_SOUND = 0x4;
        /// Suppress during the user's quiet time.
        const RESPECT_QUIET_TIME = 0x8;
    }
}

impl Default for BalloonFlags {
    fn default() -> Self {
        BalloonFlags::DEFAULT
    }
}

/// Icon shown in the balloon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalloonIcon {
    #[default]
    None,
    SystemInfo,
    SystemWarning,
    SystemError,
    /// The balloon's own [`Balloon::icon`] handle, even if it is null.
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Balloon {
    pub title: BalloonTitle,
    pub text: BalloonText,
    pub icon_kind: BalloonIcon,
    pub icon: IconHandle,
    pub flags: BalloonFlags,
}

impl Balloon {
    /// Balloon with the given title and text, truncated to fit.
    pub fn new(title: &str, text: &str) -> Self {
        Self {
            title: BalloonTitle::from_str(title),
            text: BalloonText::from_str(text),
            ..Self::default()
        }
    }

    /// Balloon from raw UTF-8 title and text bytes.
    pub fn from_utf8(title: &[u8], text: &[u8]) -> Result<Self> {
        Ok(Self {
            title: BalloonTitle::from_utf8(title).map_err(|_| Error::FailedToConvertTitle)?,
            text: BalloonText::from_utf8(text).map_err(|_| Error::FailedToConvertText)?,
            ..Self::default()
        })
    }

    pub fn with_icon(mut self, kind: BalloonIcon, icon: IconHandle) -> Self {
        self.icon_kind = kind;
        self.icon = icon;
        self
    }

    pub fn with_flags(mut self, flags: BalloonFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Fills the balloon fields of a modify descriptor.
    pub(crate) fn apply(&self, data: &mut NotifyIconData, tip_type: TipType) {
        data.flags |= sys::NIF_INFO;
        if tip_type == TipType::Standard {
            data.flags |= sys::NIF_SHOWTIP;
        }
        if self.flags.contains(BalloonFlags::REALTIME) {
            data.flags |= sys::NIF_REALTIME;
        }

        let (mut info, balloon_icon) = match self.icon_kind {
            BalloonIcon::None => (sys::NIIF_NONE, IconHandle::NULL),
            BalloonIcon::SystemInfo => (sys::NIIF_INFO | sys::NIIF_LARGE_ICON, IconHandle::NULL),
            BalloonIcon::SystemWarning => {
                (sys::NIIF_WARNING | sys::NIIF_LARGE_ICON, IconHandle::NULL)
            }
            BalloonIcon::SystemError => (sys::NIIF_ERROR | sys::NIIF_LARGE_ICON, IconHandle::NULL),
            BalloonIcon::Custom => (sys::NIIF_USER | sys::NIIF_LARGE_ICON, self.icon),
        };
        if !self.flags.contains(BalloonFlags::PLAY_SOUND) {
            info |= sys::NIIF_NOSOUND;
        }
        if self.flags.contains(BalloonFlags::RESPECT_QUIET_TIME) {
            info |= sys::NIIF_RESPECT_QUIET_TIME;
        }

        data.info_flags = info;
        data.balloon_icon = balloon_icon;
        data.info_title = self.title;
        data.info_text = self.text;
    }
}
