// src/client.rs - Serial client for the loopback HIL agent
//!
//! One command per round trip: write the command byte and a newline, read a
//! single response line. The newline is a line terminator on the device, so it
//! is neither counted nor answered.

use std::io::{self, Read, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use hil_protocol::reply::{parse_level, parse_status};
use hil_protocol::{Command, Reply, FIRMWARE_IDENTITY};
use thiserror::Error;

/// Time the board gets to come out of reset before the banner is discarded
pub const SETTLE_TIME: Duration = Duration::from_millis(100);

/// Default baud rate of the agent's console
pub const DEFAULT_BAUD: u32 = 115_200;

/// Default time to wait for a response line
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Longest line accepted before giving up on the terminator
const MAX_LINE: usize = 64;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("serial I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("no response to '{command}' within the timeout")]
    Timeout { command: char },
    #[error("link closed while waiting for a response to '{command}'")]
    Closed { command: char },
    #[error("'{command}' rejected by device: {payload}")]
    Rejected { command: char, payload: String },
    #[error("unexpected response to '{command}': {line:?}")]
    Unexpected { command: char, line: String },
    #[error("malformed payload for '{command}': {payload:?}")]
    Malformed { command: char, payload: String },
    #[error("wrong device identity: {0:?}")]
    WrongIdentity(String),
}

/// Byte link to the agent
///
/// Blocking `Read`/`Write` plus the ability to drop whatever the device sent
/// before the next command (boot banner, stale replies). Reads time out with
/// `io::ErrorKind::TimedOut` when nothing arrives.
pub trait Link: Read + Write {
    fn discard_input(&mut self) -> io::Result<()>;
}

impl Link for serial2::SerialPort {
    fn discard_input(&mut self) -> io::Result<()> {
        self.discard_input_buffer()
    }
}

/// Client for the single-character command protocol
pub struct HilClient<P: Link> {
    port: P,
}

impl HilClient<serial2::SerialPort> {
    /// Open a serial port and connect to the agent behind it
    pub fn open(path: impl AsRef<Path>, baud: u32, timeout: Duration) -> Result<Self, ClientError> {
        let path = path.as_ref();
        tracing::info!("Opening {} @ {} baud", path.display(), baud);

        let mut port = serial2::SerialPort::open(path, baud)?;
        port.set_read_timeout(timeout)?;

        thread::sleep(SETTLE_TIME);
        Self::connect(port)
    }
}

impl<P: Link> HilClient<P> {
    /// Wrap an already open link, discarding anything buffered so far
    pub fn connect(mut port: P) -> Result<Self, ClientError> {
        port.discard_input()?;
        tracing::debug!("Input buffer flushed");
        Ok(Self { port })
    }

    /// Give the link back
    pub fn into_inner(self) -> P {
        self.port
    }

    /// Send one command character and return the trimmed response line
    pub fn send_command(&mut self, command: char) -> Result<String, ClientError> {
        self.port.discard_input()?;

        let mut frame = [0u8; 5];
        let encoded = command.encode_utf8(&mut frame).len();
        frame[encoded] = b'\n';
        self.port.write_all(&frame[..=encoded])?;
        self.port.flush()?;
        tracing::debug!("TX: {:?}", command);

        let line = self.read_line(command)?;
        tracing::debug!("RX: {}", line);
        Ok(line)
    }

    /// Read up to and including `\n`
    fn read_line(&mut self, command: char) -> Result<String, ClientError> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            match self.port.read(&mut byte) {
                Ok(0) if line.is_empty() => return Err(ClientError::Closed { command }),
                Ok(0) => break,
                Ok(_) if byte[0] == b'\n' => break,
                Ok(_) => {
                    line.push(byte[0]);
                    if line.len() > MAX_LINE {
                        return Err(ClientError::Unexpected {
                            command,
                            line: String::from_utf8_lossy(&line).into_owned(),
                        });
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::TimedOut && line.is_empty() => {
                    return Err(ClientError::Timeout { command });
                }
                // Partial line: hand back what arrived
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(String::from_utf8_lossy(&line).trim().to_string())
    }

    /// Send a command and require an `OK` response, returning its payload
    fn expect_ok(&mut self, command: Command) -> Result<String, ClientError> {
        let command = char::from(command.as_byte());
        let line = self.send_command(command)?;
        match Reply::parse(&line) {
            Reply::Ok(payload) => Ok(payload.to_string()),
            Reply::Err(payload) => Err(ClientError::Rejected {
                command,
                payload: payload.to_string(),
            }),
            Reply::Unexpected(_) => Err(ClientError::Unexpected { command, line }),
        }
    }

    /// `?`: firmware identity string
    pub fn identity(&mut self) -> Result<String, ClientError> {
        self.expect_ok(Command::Identify)
    }

    /// `?` and check the identity is the expected firmware
    pub fn verify_identity(&mut self) -> Result<(), ClientError> {
        let identity = self.identity()?;
        if identity == FIRMWARE_IDENTITY {
            Ok(())
        } else {
            Err(ClientError::WrongIdentity(identity))
        }
    }

    /// `H`: drive the stimulus line high
    pub fn set_high(&mut self) -> Result<(), ClientError> {
        self.expect_ok(Command::DriveHigh).map(|_| ())
    }

    /// `L`: drive the stimulus line low
    pub fn set_low(&mut self) -> Result<(), ClientError> {
        self.expect_ok(Command::DriveLow).map(|_| ())
    }

    /// `R`: sample the measurement line
    pub fn read_level(&mut self) -> Result<bool, ClientError> {
        let payload = self.expect_ok(Command::ReadLevel)?;
        parse_level(&payload).map_err(|_| ClientError::Malformed {
            command: 'R',
            payload,
        })
    }

    /// `S`: `(uptime_ms, cmd_count)`
    pub fn status(&mut self) -> Result<(u32, u32), ClientError> {
        let payload = self.expect_ok(Command::Status)?;
        parse_status(&payload).map_err(|_| ClientError::Malformed {
            command: 'S',
            payload,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::sim::SimAgent;
    use super::*;
    use std::collections::VecDeque;

    /// Link that replays canned bytes and records what was written
    struct Scripted {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        flushes: usize,
    }

    impl Scripted {
        fn new(rx: &[u8]) -> Self {
            Self {
                rx: rx.iter().copied().collect(),
                tx: Vec::new(),
                flushes: 0,
            }
        }
    }

    impl Read for Scripted {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.rx.pop_front() {
                Some(byte) => {
                    buf[0] = byte;
                    Ok(1)
                }
                None => Err(io::ErrorKind::TimedOut.into()),
            }
        }
    }

    impl Write for Scripted {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Link for Scripted {
        fn discard_input(&mut self) -> io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_connect_discards_banner() {
        let agent = SimAgent::wired();
        assert_eq!(agent.pending(), hil_protocol::BOOT_BANNER.len());

        let mut client = HilClient::connect(agent).unwrap();
        assert_eq!(client.identity().unwrap(), FIRMWARE_IDENTITY);
    }

    #[test]
    fn test_send_command_frames_with_newline() {
        let mut client = HilClient::connect(Scripted::new(b"OK\n")).unwrap();
        assert_eq!(client.send_command('H').unwrap(), "OK");

        let port = client.into_inner();
        assert_eq!(port.tx, b"H\n");
        // once on connect, once before the command
        assert_eq!(port.flushes, 2);
    }

    #[test]
    fn test_send_command_trims_carriage_return() {
        let mut client = HilClient::connect(Scripted::new(b"OK 1\r\n")).unwrap();
        assert_eq!(client.send_command('R').unwrap(), "OK 1");
    }

    #[test]
    fn test_timeout_without_response() {
        let mut client = HilClient::connect(Scripted::new(b"")).unwrap();
        assert!(matches!(
            client.send_command('?'),
            Err(ClientError::Timeout { command: '?' })
        ));
    }

    #[test]
    fn test_overlong_line_is_unexpected() {
        let mut rx = vec![b'A'; MAX_LINE + 8];
        rx.push(b'\n');
        let mut client = HilClient::connect(Scripted::new(&rx)).unwrap();
        match client.send_command('?') {
            Err(ClientError::Unexpected { command, line }) => {
                assert_eq!(command, '?');
                assert_eq!(line.len(), MAX_LINE + 1);
            }
            other => panic!("expected overlong line to be rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_line_returned_on_timeout() {
        let mut client = HilClient::connect(Scripted::new(b"OK 12")).unwrap();
        assert_eq!(client.send_command('S').unwrap(), "OK 12");
    }

    #[test]
    fn test_loopback_helpers() {
        let mut client = HilClient::connect(SimAgent::wired()).unwrap();

        client.verify_identity().unwrap();
        client.set_high().unwrap();
        assert!(client.read_level().unwrap());
        client.set_low().unwrap();
        assert!(!client.read_level().unwrap());

        // ?, H, R, L, R, S
        let (uptime, count) = client.status().unwrap();
        assert_eq!(uptime, 1_000);
        assert_eq!(count, 6);
    }

    #[test]
    fn test_unwired_reads_low() {
        let mut client = HilClient::connect(SimAgent::unwired()).unwrap();
        client.set_high().unwrap();
        assert!(!client.read_level().unwrap());
    }

    #[test]
    fn test_terminators_are_not_counted() {
        let mut client = HilClient::connect(SimAgent::wired()).unwrap();
        assert!(matches!(
            client.send_command('\r'),
            Err(ClientError::Timeout { command: '\r' })
        ));
        // only the S itself: \r and both \n went uncounted
        assert_eq!(client.status().unwrap().1, 1);
    }

    #[test]
    fn test_bad_command_rejected() {
        let mut client = HilClient::connect(SimAgent::wired()).unwrap();
        assert_eq!(client.send_command('X').unwrap(), "E BAD_CMD");
    }

    #[test]
    fn test_error_reply_surfaces_as_rejected() {
        let mut client = HilClient::connect(Scripted::new(b"E BAD_CMD\n")).unwrap();
        match client.identity() {
            Err(ClientError::Rejected { command, payload }) => {
                assert_eq!(command, '?');
                assert_eq!(payload, "BAD_CMD");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_level() {
        let mut client = HilClient::connect(Scripted::new(b"OK 7\n")).unwrap();
        assert!(matches!(
            client.read_level(),
            Err(ClientError::Malformed { command: 'R', .. })
        ));
    }

    #[test]
    fn test_wrong_identity() {
        let mut client = HilClient::connect(Scripted::new(b"OK OTHER_FW\n")).unwrap();
        assert!(matches!(
            client.verify_identity(),
            Err(ClientError::WrongIdentity(id)) if id == "OTHER_FW"
        ));
    }

    #[test]
    fn test_unexpected_line() {
        let mut client = HilClient::connect(Scripted::new(b"garbage\n")).unwrap();
        assert!(matches!(
            client.set_high(),
            Err(ClientError::Unexpected { command: 'H', .. })
        ));
    }
}
