//! UART configuration for RP2040
//!
//! RP2040 has two PL011 UARTs supporting 5 to 8 data bits.

use embassy_rp::uart::{Config, DataBits, Parity, StopBits};

use hil_hal::uart::{DataBits as HalDataBits, Parity as HalParity, StopBits as HalStopBits};
use hil_hal::UartConfig;

/// Error converting a UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartConfigError {
    /// PL011 has no nine-bit mode
    UnsupportedDataBits,
    /// Baud rate of zero
    InvalidBaudrate,
}

/// Build an `embassy-rp` UART config from the chip-independent description
pub fn to_rp_config(config: &UartConfig) -> Result<Config, UartConfigError> {
    if config.baudrate == 0 {
        return Err(UartConfigError::InvalidBaudrate);
    }

    let mut rp = Config::default();
    rp.baudrate = config.baudrate;
    rp.data_bits = match config.data_bits {
        HalDataBits::Seven => DataBits::DataBits7,
        HalDataBits::Eight => DataBits::DataBits8,
        HalDataBits::Nine => return Err(UartConfigError::UnsupportedDataBits),
    };
    rp.parity = match config.parity {
        HalParity::None => Parity::ParityNone,
        HalParity::Even => Parity::ParityEven,
        HalParity::Odd => Parity::ParityOdd,
    };
    rp.stop_bits = match config.stop_bits {
        HalStopBits::One => StopBits::STOP1,
        HalStopBits::Two => StopBits::STOP2,
    };
    Ok(rp)
}
