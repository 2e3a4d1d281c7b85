//! Loopback HIL Agent Firmware
//!
//! Hardware-in-the-loop test agent for RP2040 boards. A host harness drives
//! the stimulus pin, reads the measurement pin back through a loopback wire
//! and polls a millisecond uptime clock, all with single-character commands
//! over UART0.
//!
//! Two control paths run on the device:
//! - the SysTick exception, once per millisecond, advancing [`UPTIME`]
//! - the console loop, serving one command per received byte

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Uart};
use embassy_time::Instant;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hil_core::{HilPins, Interpreter, UptimeClock};
use hil_hal::timer::TickConfig;
use hil_hal_rp2040::gpio::{MeasurementInput, StimulusOutput};
use hil_hal_rp2040::timer::{start_systick, SysTickSource};
use hil_hal_rp2040::uart::to_rp_config;

#[macro_use]
mod config;
mod console;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Millisecond uptime, advanced only by the SysTick exception
static UPTIME: UptimeClock = UptimeClock::new();

/// 1 ms timer interrupt
///
/// Acknowledges SysTick and advances the uptime by one. Touches nothing else.
#[cortex_m_rt::exception]
fn SysTick() {
    UPTIME.on_interrupt(&SysTickSource);
}

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("HIL agent starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Lines under test: stimulus driven low, measurement pulled down
    let stimulus = StimulusOutput::new(stimulus_pin!(p));
    let measurement = MeasurementInput::new(measurement_pin!(p));
    let pins = HilPins::new(stimulus, measurement);
    info!(
        "Test lines: stimulus=gpio{}, measurement=gpio{} (pull-down)",
        config::STIMULUS_GPIO,
        config::MEASUREMENT_GPIO
    );

    // Host UART on GPIO0 (TX) / GPIO1 (RX)
    let uart_config = match to_rp_config(&config::UART) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Unusable UART configuration: {:?}", e);
            halt();
        }
    };

    let tx_buf = TX_BUF.init([0u8; 64]);
    let rx_buf = RX_BUF.init([0u8; 64]);

    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, uart_config);
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    info!("UART initialized at {} baud", config::UART.baudrate);

    // 1 ms uptime tick from SysTick
    let Some(mut core) = cortex_m::Peripherals::take() else {
        error!("Core peripherals already taken");
        halt();
    };
    let tick = TickConfig::millisecond(embassy_rp::clocks::clk_sys_freq());
    match start_systick(&mut core.SYST, tick) {
        Ok(reload) => info!("SysTick armed (reload={})", reload),
        Err(e) => {
            error!("Cannot derive 1 ms tick: {:?}", e);
            halt();
        }
    }

    let interp = Interpreter::new(pins, &UPTIME);
    info!("Init complete after {} ms", Instant::now().as_millis());

    console::run(interp, rx, tx).await;
}

/// Park the device after a fatal initialization failure
///
/// The stimulus line stays in whatever state init left it (low) and the
/// host never sees a banner.
fn halt() -> ! {
    loop {
        cortex_m::asm::nop();
    }
}
