//! System and apps theme snapshots.

use crate::shell::Shell;

/// Color in the host's `0x00BBGGRR` layout.
pub type Color = u32;

pub const BLACK: Color = 0x0000_0000;
pub const WHITE: Color = 0x00FF_FFFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
    HighContrast,
}

/// Theme snapshot; two snapshots are equal when all three fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeInfo {
    pub theme: Theme,
    pub text_color: Color,
    pub background_color: Color,
}

impl ThemeInfo {
    pub const LIGHT: ThemeInfo = ThemeInfo {
        theme: Theme::Light,
        text_color: BLACK,
        background_color: WHITE,
    };

    pub const DARK: ThemeInfo = ThemeInfo {
        theme: Theme::Dark,
        text_color: WHITE,
        background_color: BLACK,
    };

    pub fn high_contrast(text_color: Color, background_color: Color) -> Self {
        Self {
            theme: Theme::HighContrast,
            text_color,
            background_color,
        }
    }

    fn from_light_flag(light: bool) -> Self {
        if light { Self::LIGHT } else { Self::DARK }
    }
}

impl Default for ThemeInfo {
    fn default() -> Self {
        Self::DARK
    }
}

/// Current (system, apps) theme pair.
///
/// With high contrast on, both collapse to the high-contrast snapshot built
/// from the host's window text and window colors.
pub fn current_themes(shell: &dyn Shell) -> (ThemeInfo, ThemeInfo) {
    if shell.high_contrast_enabled() {
        let (text, background) = shell.high_contrast_colors();
        let hc = ThemeInfo::high_contrast(text, background);
        return (hc, hc);
    }
    (
        ThemeInfo::from_light_flag(shell.system_uses_light_theme()),
        ThemeInfo::from_light_flag(shell.apps_use_light_theme()),
    )
}
