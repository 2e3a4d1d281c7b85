//! Command byte classification
//!
//! Every received byte falls into exactly one of three classes. Line
//! terminators are silently skipped so hosts can send `"H\n"`; anything that
//! is not a command is reported back as an error. The two paths are kept
//! separate on purpose: a terminator neither produces output nor counts as a
//! command.

/// Recognized command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `?` - report firmware identity
    Identify,
    /// `H` - drive the stimulus pin high
    DriveHigh,
    /// `L` - drive the stimulus pin low
    DriveLow,
    /// `R` - sample the measurement pin
    ReadLevel,
    /// `S` - report uptime and command count
    Status,
}

impl Command {
    /// All commands, in protocol table order
    pub const ALL: [Command; 5] = [
        Command::Identify,
        Command::DriveHigh,
        Command::DriveLow,
        Command::ReadLevel,
        Command::Status,
    ];

    /// Wire byte for this command
    pub const fn as_byte(self) -> u8 {
        match self {
            Command::Identify => b'?',
            Command::DriveHigh => b'H',
            Command::DriveLow => b'L',
            Command::ReadLevel => b'R',
            Command::Status => b'S',
        }
    }

    /// Parse a command byte; terminators and unknown bytes yield `None`
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'?' => Some(Command::Identify),
            b'H' => Some(Command::DriveHigh),
            b'L' => Some(Command::DriveLow),
            b'R' => Some(Command::ReadLevel),
            b'S' => Some(Command::Status),
            _ => None,
        }
    }
}

/// Classification of a single received byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ByteClass {
    /// `\r` or `\n`: no response, not counted
    Terminator,
    /// One of the command alphabet
    Command(Command),
    /// Any other byte: answered with `E BAD_CMD`, counted
    Unrecognized(u8),
}

impl ByteClass {
    /// Classify a received byte
    pub const fn of(byte: u8) -> Self {
        match byte {
            b'\r' | b'\n' => ByteClass::Terminator,
            _ => match Command::from_byte(byte) {
                Some(cmd) => ByteClass::Command(cmd),
                None => ByteClass::Unrecognized(byte),
            },
        }
    }

    /// Whether this byte increments the command counter
    pub const fn is_counted(&self) -> bool {
        !matches!(self, ByteClass::Terminator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_alphabet() {
        assert_eq!(ByteClass::of(b'?'), ByteClass::Command(Command::Identify));
        assert_eq!(ByteClass::of(b'H'), ByteClass::Command(Command::DriveHigh));
        assert_eq!(ByteClass::of(b'L'), ByteClass::Command(Command::DriveLow));
        assert_eq!(ByteClass::of(b'R'), ByteClass::Command(Command::ReadLevel));
        assert_eq!(ByteClass::of(b'S'), ByteClass::Command(Command::Status));
    }

    #[test]
    fn test_terminators_are_not_counted() {
        assert_eq!(ByteClass::of(b'\r'), ByteClass::Terminator);
        assert_eq!(ByteClass::of(b'\n'), ByteClass::Terminator);
        assert!(!ByteClass::of(b'\n').is_counted());
    }

    #[test]
    fn test_commands_are_case_sensitive() {
        assert_eq!(ByteClass::of(b'h'), ByteClass::Unrecognized(b'h'));
        assert_eq!(ByteClass::of(b's'), ByteClass::Unrecognized(b's'));
        assert!(ByteClass::of(b'h').is_counted());
    }

    #[test]
    fn test_unrecognized_bytes() {
        for byte in [b'X', b'Z', b'!', b' ', 0x00, 0xFF] {
            assert_eq!(ByteClass::of(byte), ByteClass::Unrecognized(byte));
        }
    }

    #[test]
    fn test_as_byte_matches_from_byte() {
        for cmd in Command::ALL {
            assert_eq!(Command::from_byte(cmd.as_byte()), Some(cmd));
        }
    }
}
