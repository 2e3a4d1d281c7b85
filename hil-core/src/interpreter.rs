//! Command interpreter
//!
//! A two-state machine that runs forever on the main loop:
//!
//! ```text
//!        byte received
//!   Idle ─────────────► Dispatching
//!    ▲                       │
//!    └───────────────────────┘
//!        response sent (or none for \r, \n)
//! ```
//!
//! One iteration reads exactly one byte, classifies it, counts it unless it
//! is a line terminator, executes the action and transmits the complete
//! response before the next byte is read. The read is the loop's only
//! suspension point; there is no cancellation and no timeout.

use embedded_io::{Error as _, ErrorKind};
use embedded_io_async::{Read, Write};

use hil_hal::{InputPin, OutputPin};
use hil_protocol::{ByteClass, Command, Response, ResponseError, BOOT_BANNER};

use crate::clock::UptimeClock;
use crate::counter::CommandCounter;
use crate::pins::HilPins;

/// Interpreter states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterpreterState {
    /// Waiting for the next byte
    Idle,
    /// Executing one command and sending its response
    Dispatching,
}

/// Errors surfaced by a serve iteration
///
/// None of these are protocol errors; an unrecognized byte is answered with
/// `E BAD_CMD` and reported as a normal [`Served`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServeError {
    /// Transport reported end of stream
    Closed,
    /// Transport receive failed
    Read(ErrorKind),
    /// Transport transmit failed
    Write(ErrorKind),
    /// Response did not fit the response buffer
    Render(ResponseError),
}

/// Outcome of one serve iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Served {
    /// How the received byte was classified
    pub class: ByteClass,
    /// Response transmitted, if any
    pub response: Option<Response>,
}

/// Single-character command interpreter
///
/// Owns the pins and the command counter; borrows the uptime clock, which the
/// timer interrupt advances concurrently.
pub struct Interpreter<'c, O, I> {
    pins: HilPins<O, I>,
    clock: &'c UptimeClock,
    commands: CommandCounter,
    state: InterpreterState,
}

impl<'c, O: OutputPin, I: InputPin> Interpreter<'c, O, I> {
    /// Create an interpreter in the Idle state
    pub fn new(pins: HilPins<O, I>, clock: &'c UptimeClock) -> Self {
        Self {
            pins,
            clock,
            commands: CommandCounter::new(),
            state: InterpreterState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> InterpreterState {
        self.state
    }

    /// Commands counted since startup
    pub fn command_count(&self) -> u32 {
        self.commands.get()
    }

    /// Access the pins (for diagnostics)
    pub fn pins(&self) -> &HilPins<O, I> {
        &self.pins
    }

    /// Classify a byte, update the counter and execute the action
    ///
    /// Returns the response to transmit, or `None` for line terminators.
    pub fn dispatch(&mut self, byte: u8) -> Served {
        let class = ByteClass::of(byte);
        if class.is_counted() {
            self.commands.record();
        }

        let response = match class {
            ByteClass::Terminator => None,
            ByteClass::Command(cmd) => Some(self.execute(cmd)),
            ByteClass::Unrecognized(_) => Some(Response::BadCommand),
        };

        Served { class, response }
    }

    fn execute(&mut self, cmd: Command) -> Response {
        match cmd {
            Command::Identify => Response::Identity,
            Command::DriveHigh => {
                self.pins.set_stimulus(true);
                Response::Ack
            }
            Command::DriveLow => {
                self.pins.set_stimulus(false);
                Response::Ack
            }
            Command::ReadLevel => Response::Level(self.pins.read_measurement()),
            Command::Status => Response::Status {
                // Counter already includes this command
                uptime_ms: self.clock.read(),
                commands: self.commands.get(),
            },
        }
    }

    /// Send the boot banner
    ///
    /// A failure here means the transport is unusable; the caller must not
    /// enter the command loop.
    pub async fn announce<W: Write>(&self, tx: &mut W) -> Result<(), ServeError> {
        send(tx, BOOT_BANNER.as_bytes()).await
    }

    /// Run one Idle -> Dispatching -> Idle iteration
    ///
    /// Suspends until one byte is available on `rx`, dispatches it and writes
    /// the full response to `tx`. The interpreter is back in Idle when this
    /// returns, whatever the outcome.
    pub async fn serve_one<R: Read, W: Write>(
        &mut self,
        rx: &mut R,
        tx: &mut W,
    ) -> Result<Served, ServeError> {
        self.state = InterpreterState::Idle;

        let mut byte = [0u8; 1];
        let n = rx
            .read(&mut byte)
            .await
            .map_err(|e| ServeError::Read(e.kind()))?;
        if n == 0 {
            return Err(ServeError::Closed);
        }

        self.state = InterpreterState::Dispatching;
        let served = self.dispatch(byte[0]);
        let result = match served.response {
            Some(response) => transmit(tx, &response).await,
            None => Ok(()),
        };
        self.state = InterpreterState::Idle;

        result.map(|()| served)
    }
}

async fn transmit<W: Write>(tx: &mut W, response: &Response) -> Result<(), ServeError> {
    let line = response.render().map_err(ServeError::Render)?;
    send(tx, line.as_bytes()).await
}

async fn send<W: Write>(tx: &mut W, bytes: &[u8]) -> Result<(), ServeError> {
    tx.write_all(bytes)
        .await
        .map_err(|e| ServeError::Write(e.kind()))?;
    tx.flush().await.map_err(|e| ServeError::Write(e.kind()))
}
