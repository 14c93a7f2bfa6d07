//! Building wire messages for the transmitter.

use thiserror::Error;

use crate::message::record::FIELD_DELIMITER;

/// Smallest cap code a pager can be addressed with.
pub const MIN_CAP_CODE: u16 = 1;
/// Largest cap code a pager can be addressed with.
pub const MAX_CAP_CODE: u16 = 9999;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("cap code {0} is outside {min}..={max}", min = MIN_CAP_CODE, max = MAX_CAP_CODE)]
    CapCodeOutOfBounds(u16),

    #[error("message body is empty")]
    EmptyBody,

    #[error("message body must be ASCII")]
    NonAscii,

    #[error("message body contains the field delimiter")]
    Delimiter,
}

/// Format `<cap>\r<text>\r\r`.
///
/// The body must be non-empty ASCII without the field delimiter.
pub fn encode_transmission(cap_code: u16, text: &str) -> Result<String, FrameError> {
    if !(MIN_CAP_CODE..=MAX_CAP_CODE).contains(&cap_code) {
        return Err(FrameError::CapCodeOutOfBounds(cap_code));
    }
    if text.is_empty() {
        return Err(FrameError::EmptyBody);
    }
    if !text.is_ascii() {
        return Err(FrameError::NonAscii);
    }
    if text.contains(FIELD_DELIMITER) {
        return Err(FrameError::Delimiter);
    }
    Ok(format!("{cap_code}{FIELD_DELIMITER}{text}{FIELD_DELIMITER}{FIELD_DELIMITER}"))
}
