//! Decoding of raw host messages into the events the dispatcher handles.

use crate::sys;

/// A host window message as received by the window procedure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawMessage {
    pub id: u32,
    pub wparam: usize,
    pub lparam: isize,
    /// String payload of `WM_SETTINGCHANGE` broadcasts, decoded by the backend.
    pub text: Option<String>,
}

impl RawMessage {
    pub fn new(id: u32, wparam: usize, lparam: isize) -> Self {
        Self {
            id,
            wparam,
            lparam,
            text: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Screen position reported with icon events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Unpacks the signed 16-bit x (low word) and y (high word) coordinates.
    pub fn from_packed(packed: usize) -> Self {
        Self {
            x: i32::from((packed & 0xFFFF) as u16 as i16),
            y: i32::from(((packed >> 16) & 0xFFFF) as u16 as i16),
        }
    }

    /// Inverse of [`Point::from_packed`].
    pub fn pack(self) -> usize {
        (self.x as u16 as usize) | ((self.y as u16 as usize) << 16)
    }
}

/// Sub-event of the icon callback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyEvent {
    KeySelect(Point),
    ContextMenu(Point),
    LeftClick(Point),
    LeftDoubleClick(Point),
    MiddleClick(Point),
    BalloonShow,
    BalloonHide,
    BalloonTimeout,
    BalloonClick,
    PopupOpen(Point),
    PopupClose,
}

impl NotifyEvent {
    fn decode(wparam: usize, lparam: isize) -> Option<Self> {
        let point = Point::from_packed(wparam);
        let event = match (lparam as usize & 0xFFFF) as u32 {
            sys::NIN_KEYSELECT => NotifyEvent::KeySelect(point),
            sys::WM_CONTEXTMENU => NotifyEvent::ContextMenu(point),
            sys::WM_LBUTTONUP => NotifyEvent::LeftClick(point),
            sys::WM_LBUTTONDBLCLK => NotifyEvent::LeftDoubleClick(point),
            sys::WM_MBUTTONUP => NotifyEvent::MiddleClick(point),
            sys::NIN_BALLOONSHOW => NotifyEvent::BalloonShow,
            sys::NIN_BALLOONHIDE => NotifyEvent::BalloonHide,
            sys::NIN_BALLOONTIMEOUT => NotifyEvent::BalloonTimeout,
            sys::NIN_BALLOONUSERCLICK => NotifyEvent::BalloonClick,
            sys::NIN_POPUPOPEN => NotifyEvent::PopupOpen(point),
            sys::NIN_POPUPCLOSE => NotifyEvent::PopupClose,
            _ => return None,
        };
        Some(event)
    }
}

/// Messages with a dedicated dispatcher case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    WindowCreate,
    WindowDestroy,
    Notify(NotifyEvent),
    DpiChanged,
    DisplayChange,
    ThemeSetting,
    Timer(u32),
    DelayedDpi(u32),
    Init,
    Release,
    Show,
    Hide,
    IconChange,
    MenuChange,
    TipChange,
    TipTypeChange,
}

impl Message {
    /// Decodes the explicit cases; anything else returns `None` and is left
    /// to the taskbar-created, custom and system categories.
    pub fn decode(raw: &RawMessage) -> Option<Self> {
        let msg = match raw.id {
            sys::WM_CREATE => Message::WindowCreate,
            sys::WM_DESTROY => Message::WindowDestroy,
            sys::WM_NOTIFYICON => {
                return NotifyEvent::decode(raw.wparam, raw.lparam).map(Message::Notify);
            }
            sys::WM_DPICHANGED => Message::DpiChanged,
            sys::WM_DISPLAYCHANGE => Message::DisplayChange,
            sys::WM_SETTINGCHANGE => {
                let immersive = raw.text.as_deref() == Some(sys::IMMERSIVE_COLOR_SET);
                if raw.wparam == sys::SPI_SETHIGHCONTRAST || immersive {
                    Message::ThemeSetting
                } else {
                    return None;
                }
            }
            sys::WM_TIMER => Message::Timer(raw.wparam as u32),
            sys::WM_DPICHANGED_DELAYED => Message::DelayedDpi(raw.wparam as u32),
            sys::WM_NOTIFYAREA_INIT => Message::Init,
            sys::WM_NOTIFYAREA_RELEASE => Message::Release,
            sys::WM_NOTIFYAREA_SHOW => Message::Show,
            sys::WM_NOTIFYAREA_HIDE => Message::Hide,
            sys::WM_NOTIFYAREA_ICON_CHANGE => Message::IconChange,
            sys::WM_NOTIFYAREA_MENU_CHANGE => Message::MenuChange,
            sys::WM_NOTIFYAREA_TIP_CHANGE => Message::TipChange,
            sys::WM_NOTIFYAREA_TIP_TYPE_CHANGE => Message::TipTypeChange,
            _ => return None,
        };
        Some(msg)
    }

    /// Host message id this event travels under.
    pub fn id(self) -> u32 {
        match self {
            Message::WindowCreate => sys::WM_CREATE,
            Message::WindowDestroy => sys::WM_DESTROY,
            Message::Notify(_) => sys::WM_NOTIFYICON,
            Message::DpiChanged => sys::WM_DPICHANGED,
            Message::DisplayChange => sys::WM_DISPLAYCHANGE,
            Message::ThemeSetting => sys::WM_SETTINGCHANGE,
            Message::Timer(_) => sys::WM_TIMER,
            Message::DelayedDpi(_) => sys::WM_DPICHANGED_DELAYED,
            Message::Init => sys::WM_NOTIFYAREA_INIT,
            Message::Release => sys::WM_NOTIFYAREA_RELEASE,
            Message::Show => sys::WM_NOTIFYAREA_SHOW,
            Message::Hide => sys::WM_NOTIFYAREA_HIDE,
            Message::IconChange => sys::WM_NOTIFYAREA_ICON_CHANGE,
            Message::MenuChange => sys::WM_NOTIFYAREA_MENU_CHANGE,
            Message::TipChange => sys::WM_NOTIFYAREA_TIP_CHANGE,
            Message::TipTypeChange => sys::WM_NOTIFYAREA_TIP_TYPE_CHANGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notify(event: u32, point: Point) -> RawMessage {
        RawMessage::new(sys::WM_NOTIFYICON, point.pack(), event as isize)
    }

    #[test]
    fn point_unpacks_negative_coordinates() {
        let p = Point::from_packed(0xFFF6_0014);
        assert_eq!(p, Point::new(20, -10));
        assert_eq!(Point::from_packed(p.pack()), p);
    }

    #[test]
    fn decodes_icon_events_with_point() {
        let at = Point::new(100, 200);
        assert_eq!(
            Message::decode(&notify(sys::WM_LBUTTONUP, at)),
            Some(Message::Notify(NotifyEvent::LeftClick(at)))
        );
        assert_eq!(
            Message::decode(&notify(sys::NIN_KEYSELECT, at)),
            Some(Message::Notify(NotifyEvent::KeySelect(at)))
        );
        assert_eq!(
            Message::decode(&notify(sys::NIN_POPUPCLOSE, at)),
            Some(Message::Notify(NotifyEvent::PopupClose))
        );
    }

    #[test]
    fn sub_event_uses_low_word_only() {
        // Version 4 puts the icon id in the high word.
        let raw = RawMessage::new(
            sys::WM_NOTIFYICON,
            0,
            ((7 << 16) | sys::NIN_BALLOONUSERCLICK) as isize,
        );
        assert_eq!(
            Message::decode(&raw),
            Some(Message::Notify(NotifyEvent::BalloonClick))
        );
    }

    #[test]
    fn unknown_icon_event_is_not_decoded() {
        assert_eq!(Message::decode(&notify(sys::NIN_SELECT, Point::default())), None);
        assert_eq!(Message::decode(&notify(0x0200, Point::default())), None);
    }

    #[test]
    fn setting_change_needs_matching_payload() {
        let hc = RawMessage::new(sys::WM_SETTINGCHANGE, sys::SPI_SETHIGHCONTRAST, 0);
        assert_eq!(Message::decode(&hc), Some(Message::ThemeSetting));

        let immersive = RawMessage::new(sys::WM_SETTINGCHANGE, 0, 0).with_text("ImmersiveColorSet");
        assert_eq!(Message::decode(&immersive), Some(Message::ThemeSetting));

        let other = RawMessage::new(sys::WM_SETTINGCHANGE, 0, 0).with_text("intl");
        assert_eq!(Message::decode(&other), None);

        let prefix = RawMessage::new(sys::WM_SETTINGCHANGE, 0, 0).with_text("ImmersiveColorSetX");
        assert_eq!(Message::decode(&prefix), None);
    }

    #[test]
    fn internal_notifications_round_trip_ids() {
        for msg in [
            Message::Init,
            Message::Release,
            Message::Show,
            Message::Hide,
            Message::IconChange,
            Message::MenuChange,
            Message::TipChange,
            Message::TipTypeChange,
        ] {
            assert_eq!(Message::decode(&RawMessage::new(msg.id(), 0, 0)), Some(msg));
        }
    }

    #[test]
    fn timer_and_delayed_dpi_carry_wparam() {
        assert_eq!(
            Message::decode(&RawMessage::new(sys::WM_TIMER, 1001, 0)),
            Some(Message::Timer(1001))
        );
        assert_eq!(
            Message::decode(&RawMessage::new(sys::WM_DPICHANGED_DELAYED, 144, 0)),
            Some(Message::DelayedDpi(144))
        );
    }
}
