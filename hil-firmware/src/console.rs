//! Host console loop
//!
//! Sends the boot banner, then serves commands forever. The only suspension
//! point is the UART read inside `serve_one`.

use defmt::*;
use embedded_io_async::{Read, Write};

use hil_core::{Interpreter, ServeError};
use hil_hal::{InputPin, OutputPin};

/// Announce readiness and run the command loop
///
/// Never returns once the banner is out. If the banner cannot be written the
/// transport is unusable and the device halts instead of accepting commands.
pub async fn run<O, I, R, W>(mut interp: Interpreter<'static, O, I>, mut rx: R, mut tx: W)
where
    O: OutputPin,
    I: InputPin,
    R: Read,
    W: Write,
{
    if let Err(e) = interp.announce(&mut tx).await {
        error!("Failed to send boot banner: {:?}", e);
        crate::halt();
    }

    info!("Console ready, waiting for commands");

    loop {
        match interp.serve_one(&mut rx, &mut tx).await {
            Ok(served) => match served.response {
                Some(response) => {
                    debug!(
                        "{:?} -> {:?} (count={}, stimulus={})",
                        served.class,
                        response,
                        interp.command_count(),
                        interp.pins().stimulus()
                    );
                }
                None => trace!("Line terminator skipped"),
            },
            Err(ServeError::Closed) => {
                warn!("UART returned end of stream");
            }
            Err(e) => {
                warn!("Console error: {:?} (state={:?})", e, interp.state());
            }
        }
    }
}
