//! Status and error codes.
//!
//! Every operation returns [`Result<Status, Error>`](Result). Both sides map
//! to a signed status code: zero or positive is success (small positive values
//! mean "already in that state"), negative is failure, so callers can branch
//! on the sign alone.

/// Successful outcome of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    WindowAlreadyCreated,
    IconAlreadyCreated,
    IconAlreadyShown,
    IconAlreadyHidden,
}

impl Status {
    /// Signed status code (always non-negative).
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::WindowAlreadyCreated => 1,
            Status::IconAlreadyCreated => 2,
            Status::IconAlreadyShown => 3,
            Status::IconAlreadyHidden => 4,
        }
    }

    fn description(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::WindowAlreadyCreated => "window already created",
            Status::IconAlreadyCreated => "icon already created",
            Status::IconAlreadyShown => "icon already shown",
            Status::IconAlreadyHidden => "icon already hidden",
        }
    }
}

/// Failure of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("notify icon instance is null or released")]
    InstanceNull,

    #[error("unsupported shell version")]
    UnsupportedVersion,

    #[error("failed to add icon")]
    FailedToAddIcon,

    #[error("failed to delete icon")]
    FailedToDeleteIcon,

    #[error("failed to show icon")]
    FailedToShowIcon,

    #[error("failed to hide icon")]
    FailedToHideIcon,

    #[error("failed to change icon")]
    FailedToChangeIcon,

    #[error("failed to change tip")]
    FailedToChangeTip,

    /// Reserved code; never returned.
    #[error("failed to copy tip")]
    FailedToCopyTip,

    /// Reserved code; never returned.
    #[error("failed to copy balloon title")]
    FailedToCopyBalloonTitle,

    /// Reserved code; never returned.
    #[error("failed to copy balloon text")]
    FailedToCopyBalloonText,

    #[error("failed to show balloon")]
    FailedToShowBalloon,

    #[error("failed to remove balloon")]
    FailedToRemoveBalloon,

    #[error("failed to register window class")]
    FailedToRegisterWindowClass,

    #[error("failed to create window")]
    FailedToCreateWindow,

    #[error("failed to start timer")]
    FailedToStartTimer,

    #[error("failed to stop timer")]
    FailedToStopTimer,

    #[error("invalid module handle")]
    InvalidModuleHandle,

    #[error("invalid window handle")]
    InvalidWindowHandle,

    /// Reserved code; never returned.
    #[error("invalid icon")]
    InvalidIcon,

    /// Reserved code; never returned.
    #[error("invalid menu")]
    InvalidMenu,

    #[error("invalid timer id")]
    InvalidTimerId,

    /// Reserved code; never returned.
    #[error("invalid argument")]
    InvalidArgument,

    #[error("icon not created")]
    IconNotCreated,

    #[error("insufficient buffer")]
    InsufficientBuffer,

    #[error("failed to convert tip")]
    FailedToConvertTip,

    #[error("failed to convert title")]
    FailedToConvertTitle,

    #[error("failed to convert text")]
    FailedToConvertText,

    #[error("failed to send message")]
    FailedToSendMessage,

    #[error("failed to post message")]
    FailedToPostMessage,

    #[error("message loop failed")]
    MessageLoopFailed,
}

impl Error {
    const ALL: [Error; 31] = [
        Error::InstanceNull,
        Error::UnsupportedVersion,
        Error::FailedToAddIcon,
        Error::FailedToDeleteIcon,
        Error::FailedToShowIcon,
        Error::FailedToHideIcon,
        Error::FailedToChangeIcon,
        Error::FailedToChangeTip,
        Error::FailedToCopyTip,
        Error::FailedToCopyBalloonTitle,
        Error::FailedToCopyBalloonText,
        Error::FailedToShowBalloon,
        Error::FailedToRemoveBalloon,
        Error::FailedToRegisterWindowClass,
        Error::FailedToCreateWindow,
        Error::FailedToStartTimer,
        Error::FailedToStopTimer,
        Error::InvalidModuleHandle,
        Error::InvalidWindowHandle,
        Error::InvalidIcon,
        Error::InvalidMenu,
        Error::InvalidTimerId,
        Error::InvalidArgument,
        Error::IconNotCreated,
        Error::InsufficientBuffer,
        Error::FailedToConvertTip,
        Error::FailedToConvertTitle,
        Error::FailedToConvertText,
        Error::FailedToSendMessage,
        Error::FailedToPostMessage,
        Error::MessageLoopFailed,
    ];

    /// Signed status code (always negative).
    ///
    /// Codes follow declaration order: `InstanceNull` is -1,
    /// `MessageLoopFailed` is -31.
    pub fn code(self) -> i32 {
        let index = Self::ALL
            .iter()
            .position(|e| *e == self)
            .unwrap_or_default();
        -(index as i32) - 1
    }

    /// Looks up the error for a negative status code.
    pub fn from_code(code: i32) -> Option<Error> {
        let index = code.checked_neg()?.checked_sub(1)?;
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }
}

/// Result of every notify-icon operation.
pub type Result<T = Status> = std::result::Result<T, Error>;

/// Collapses an operation result into its signed status code.
pub fn status_code(result: &Result<Status>) -> i32 {
    match result {
        Ok(status) => status.code(),
        Err(err) => err.code(),
    }
}

/// Human-readable text for a signed status code.
pub fn describe(code: i32) -> String {
    match code {
        0 => Status::Ok.description().to_owned(),
        1 => Status::WindowAlreadyCreated.description().to_owned(),
        2 => Status::IconAlreadyCreated.description().to_owned(),
        3 => Status::IconAlreadyShown.description().to_owned(),
        4 => Status::IconAlreadyHidden.description().to_owned(),
        _ => match Error::from_code(code) {
            Some(err) => err.to_string(),
            None => "unknown error".to_owned(),
        },
    }
}

/// UTF-16 (null-terminated) form of [`describe`].
pub fn describe_wide(code: i32) -> Vec<u16> {
    describe(code)
        .encode_utf16()
        .chain(std::iter::once(0))
        .collect()
}
