//! Device responses
//!
//! Each command produces exactly one [`Response`], rendered into a bounded
//! [`ResponseBuffer`] and transmitted whole. Every rendered line ends with
//! `\n`.

use heapless::Vec;

use crate::decimal::{self, EncodeError, MAX_DIGITS};
use crate::{BAD_COMMAND_TOKEN, FIRMWARE_IDENTITY};

/// Capacity of a response buffer
///
/// The longest response is a status line with two ten-digit counters:
/// `"OK " + 10 + " " + 10 + "\n"` = 25 bytes.
pub const MAX_RESPONSE_LEN: usize = 32;

/// Errors that can occur while rendering a response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseError {
    /// Rendered line exceeds [`MAX_RESPONSE_LEN`]
    BufferFull,
}

impl From<EncodeError> for ResponseError {
    fn from(e: EncodeError) -> Self {
        match e {
            EncodeError::BufferTooSmall => ResponseError::BufferFull,
        }
    }
}

/// Response to a single command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// `OK <identity>`
    Identity,
    /// `OK`
    Ack,
    /// `OK 0` / `OK 1`
    Level(bool),
    /// `OK <uptime_ms> <cmd_count>`
    Status { uptime_ms: u32, commands: u32 },
    /// `E BAD_CMD`
    BadCommand,
}

impl Response {
    /// Render this response into a fresh buffer
    pub fn render(&self) -> Result<ResponseBuffer, ResponseError> {
        let mut out = ResponseBuffer::new();
        match self {
            Response::Identity => {
                out.push_str("OK ")?;
                out.push_str(FIRMWARE_IDENTITY)?;
            }
            Response::Ack => out.push_str("OK")?,
            Response::Level(high) => {
                out.push_str(if *high { "OK 1" } else { "OK 0" })?;
            }
            Response::Status {
                uptime_ms,
                commands,
            } => {
                out.push_str("OK ")?;
                out.push_decimal(*uptime_ms)?;
                out.push_byte(b' ')?;
                out.push_decimal(*commands)?;
            }
            Response::BadCommand => {
                out.push_str("E ")?;
                out.push_str(BAD_COMMAND_TOKEN)?;
            }
        }
        out.push_byte(b'\n')?;
        Ok(out)
    }
}

/// Bounded byte buffer holding one rendered response line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBuffer {
    bytes: Vec<u8, MAX_RESPONSE_LEN>,
}

impl ResponseBuffer {
    /// Create an empty buffer
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Append one byte
    pub fn push_byte(&mut self, byte: u8) -> Result<(), ResponseError> {
        self.bytes.push(byte).map_err(|_| ResponseError::BufferFull)
    }

    /// Append literal text
    pub fn push_str(&mut self, text: &str) -> Result<(), ResponseError> {
        self.bytes
            .extend_from_slice(text.as_bytes())
            .map_err(|_| ResponseError::BufferFull)
    }

    /// Append an unsigned integer in decimal
    pub fn push_decimal(&mut self, value: u32) -> Result<(), ResponseError> {
        let mut digits = [0u8; MAX_DIGITS];
        let len = decimal::encode(value, &mut digits)?;
        self.bytes
            .extend_from_slice(&digits[..len])
            .map_err(|_| ResponseError::BufferFull)
    }

    /// Rendered bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(response: Response) -> ResponseBuffer {
        response.render().unwrap()
    }

    #[test]
    fn test_identity_line() {
        assert_eq!(
            rendered(Response::Identity).as_bytes(),
            b"OK MSPM0_HIL_v1.0\n"
        );
    }

    #[test]
    fn test_ack_line() {
        assert_eq!(rendered(Response::Ack).as_bytes(), b"OK\n");
    }

    #[test]
    fn test_level_lines() {
        assert_eq!(rendered(Response::Level(true)).as_bytes(), b"OK 1\n");
        assert_eq!(rendered(Response::Level(false)).as_bytes(), b"OK 0\n");
    }

    #[test]
    fn test_status_line() {
        let status = Response::Status {
            uptime_ms: 1234,
            commands: 3,
        };
        assert_eq!(rendered(status).as_bytes(), b"OK 1234 3\n");
    }

    #[test]
    fn test_status_with_zero_fields() {
        let status = Response::Status {
            uptime_ms: 0,
            commands: 0,
        };
        assert_eq!(rendered(status).as_bytes(), b"OK 0 0\n");
    }

    #[test]
    fn test_longest_status_fits() {
        let status = Response::Status {
            uptime_ms: u32::MAX,
            commands: u32::MAX,
        };
        let buf = rendered(status);
        assert_eq!(buf.as_bytes(), b"OK 4294967295 4294967295\n");
        assert_eq!(buf.as_bytes().len(), 25);
        assert!(buf.as_bytes().len() <= MAX_RESPONSE_LEN);
    }

    #[test]
    fn test_bad_command_line() {
        assert_eq!(rendered(Response::BadCommand).as_bytes(), b"E BAD_CMD\n");
    }

    #[test]
    fn test_buffer_overflow_is_reported() {
        let mut buf = ResponseBuffer::new();
        for _ in 0..MAX_RESPONSE_LEN {
            buf.push_byte(b'x').unwrap();
        }
        assert_eq!(buf.push_byte(b'x'), Err(ResponseError::BufferFull));
        assert_eq!(buf.push_decimal(0), Err(ResponseError::BufferFull));
    }
}
