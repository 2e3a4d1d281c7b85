//! Host-side response parsing
//!
//! Splits a received line (newline already stripped) into success flag and
//! payload, and decodes the typed payloads of `R` and `S`.

/// A decoded response line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply<'a> {
    /// `OK` or `OK <payload>`
    Ok(&'a str),
    /// `E` or `E <payload>`
    Err(&'a str),
    /// Anything else, carried verbatim
    Unexpected(&'a str),
}

/// Errors decoding a reply payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyError {
    /// Level payload was not `0` or `1`
    InvalidLevel,
    /// Status payload did not hold two unsigned integers
    InvalidStatus,
}

impl<'a> Reply<'a> {
    /// Parse one response line
    ///
    /// Surrounding whitespace (including a trailing `\r\n`) is ignored.
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("OK") {
            return match rest.strip_prefix(' ') {
                Some(payload) => Reply::Ok(payload),
                None if rest.is_empty() => Reply::Ok(""),
                None => Reply::Unexpected(line),
            };
        }
        if let Some(rest) = line.strip_prefix('E') {
            return match rest.strip_prefix(' ') {
                Some(payload) => Reply::Err(payload),
                None if rest.is_empty() => Reply::Err(""),
                None => Reply::Unexpected(line),
            };
        }
        Reply::Unexpected(line)
    }

    /// Whether this is a success line
    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok(_))
    }

    /// Payload text, whatever the outcome
    pub fn payload(&self) -> &'a str {
        match self {
            Reply::Ok(p) | Reply::Err(p) | Reply::Unexpected(p) => p,
        }
    }
}

/// Decode the payload of an `R` response
pub fn parse_level(payload: &str) -> Result<bool, ReplyError> {
    match payload.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ReplyError::InvalidLevel),
    }
}

/// Decode the payload of an `S` response into `(uptime_ms, cmd_count)`
pub fn parse_status(payload: &str) -> Result<(u32, u32), ReplyError> {
    let mut fields = payload.split_ascii_whitespace();
    let uptime = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or(ReplyError::InvalidStatus)?;
    let count = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or(ReplyError::InvalidStatus)?;
    if fields.next().is_some() {
        return Err(ReplyError::InvalidStatus);
    }
    Ok((uptime, count))
}
