//! Fixed-capacity UTF-16 text used at the shell boundary.
//!
//! The shell stores tips and balloon strings in fixed, null-terminated UTF-16
//! arrays. [`WideText`] mirrors that layout: `N` units including the
//! terminator, so at most `N - 1` units of text. Excess input is truncated
//! deterministically.

use std::fmt;

/// Tip buffer size in UTF-16 units (127 characters + terminator).
pub const TIP_CAPACITY: usize = 128;

/// Balloon title buffer size in UTF-16 units (63 characters + terminator).
pub const BALLOON_TITLE_CAPACITY: usize = 64;

/// Balloon text buffer size in UTF-16 units (255 characters + terminator).
pub const BALLOON_TEXT_CAPACITY: usize = 256;

pub type TipText = WideText<TIP_CAPACITY>;
pub type BalloonTitle = WideText<BALLOON_TITLE_CAPACITY>;
pub type BalloonText = WideText<BALLOON_TEXT_CAPACITY>;

/// Null-terminated UTF-16 text in a fixed buffer of `N` units.
#[derive(Clone, Copy)]
pub struct WideText<const N: usize> {
    buf: [u16; N],
    len: usize,
}

impl<const N: usize> WideText<N> {
    /// Maximum number of text units (excluding the terminator).
    pub const MAX_LEN: usize = N - 1;

    /// Empty text.
    pub fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
        }
    }

    /// Copies UTF-16 units up to the first NUL, truncating to `N - 1` units.
    pub fn from_wide(src: &[u16]) -> Self {
        let mut text = Self::new();
        let end = src.iter().position(|&c| c == 0).unwrap_or(src.len());
        let len = end.min(Self::MAX_LEN);
        text.buf[..len].copy_from_slice(&src[..len]);
        text.len = len;
        text
    }

    /// Encodes `s` as UTF-16, truncating on a character boundary.
    ///
    /// Input stops at the first NUL character, like the wide-string form.
    pub fn from_str(s: &str) -> Self {
        let mut text = Self::new();
        let mut units = [0u16; 2];
        for ch in s.chars() {
            if ch == '\0' {
                break;
            }
            let encoded = ch.encode_utf16(&mut units);
            if text.len + encoded.len() > Self::MAX_LEN {
                break;
            }
            text.buf[text.len..text.len + encoded.len()].copy_from_slice(encoded);
            text.len += encoded.len();
        }
        text
    }

    /// Decodes raw UTF-8 bytes (stopping at the first NUL byte).
    pub fn from_utf8(bytes: &[u8]) -> Result<Self, std::str::Utf8Error> {
        let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        let s = std::str::from_utf8(&bytes[..end])?;
        Ok(Self::from_str(s))
    }

    /// Text units without the terminator.
    pub fn as_wide(&self) -> &[u16] {
        &self.buf[..self.len]
    }

    /// Text units followed by the terminator.
    pub fn as_wide_with_nul(&self) -> &[u16] {
        &self.buf[..self.len + 1]
    }

    /// Number of text units (excluding the terminator).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Strict UTF-8 conversion; fails on unpaired surrogates.
    pub fn to_utf8(&self) -> Result<String, std::string::FromUtf16Error> {
        String::from_utf16(self.as_wide())
    }

    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(self.as_wide())
    }

    /// Copies the text into a host buffer, always null-terminating it.
    ///
    /// Returns the number of units written including the terminator.
    pub fn copy_into(&self, dest: &mut [u16]) -> usize {
        if dest.is_empty() {
            return 0;
        }
        let len = self.len.min(dest.len() - 1);
        dest[..len].copy_from_slice(&self.buf[..len]);
        dest[len] = 0;
        len + 1
    }
}

impl<const N: usize> Default for WideText<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PartialEq for WideText<N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_wide() == other.as_wide()
    }
}

impl<const N: usize> Eq for WideText<N> {}

impl<const N: usize> fmt::Debug for WideText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("WideText")
            .field(&self.to_string_lossy())
            .finish()
    }
}

impl<const N: usize> fmt::Display for WideText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
