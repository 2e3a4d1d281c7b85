// src/suite.rs - Loopback validation suite
//!
//! The checks a bench run performs against a live agent. Every check uses the
//! same connection; a failing check is recorded and the suite moves on.
//!
//! Wired checks need the stimulus pin jumpered to the measurement pin. The
//! manual check needs that jumper removed and is only run on request.

use std::thread;
use std::time::Duration;

use hil_protocol::{Reply, BAD_COMMAND_TOKEN};
use thiserror::Error;

use crate::client::{ClientError, HilClient, Link};

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("{0}")]
    Mismatch(String),
}

/// Suite settings
#[derive(Debug, Clone)]
pub struct SuiteOptions {
    /// Run the wire-removed check instead of the wired ones
    pub manual: bool,
    /// Sleep between the two status reads of the uptime check
    pub uptime_wait: Duration,
    /// Smallest uptime advance accepted over `uptime_wait`
    pub min_uptime_delta_ms: u32,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            manual: false,
            uptime_wait: Duration::from_millis(500),
            min_uptime_delta_ms: 400,
        }
    }
}

/// Result of one check
#[derive(Debug)]
pub struct Outcome {
    pub name: &'static str,
    pub result: Result<(), CheckError>,
}

/// Results of a suite run, in execution order
#[derive(Debug, Default)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
}

impl Report {
    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    fn record(&mut self, name: &'static str, result: Result<(), CheckError>) {
        match &result {
            Ok(()) => tracing::info!("PASS {}", name),
            Err(e) => tracing::error!("FAIL {}: {}", name, e),
        }
        self.outcomes.push(Outcome { name, result });
    }
}

fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), CheckError> {
    if condition {
        Ok(())
    } else {
        Err(CheckError::Mismatch(message()))
    }
}

/// Run the suite against a connected agent
pub fn run<P: Link>(client: &mut HilClient<P>, options: &SuiteOptions) -> Report {
    let mut report = Report::default();

    report.record("identity", client.verify_identity().map_err(CheckError::from));

    if options.manual {
        tracing::warn!("Manual run: loopback wire must be DISCONNECTED");
        report.record("read low with wire removed", wire_removed(client));
        return report;
    }

    report.record("set high, read high", set_and_read(client, true));
    report.record("set low, read low", set_and_read(client, false));
    report.record("toggle sequence", toggle_sequence(client));
    report.record("status", status_sane(client));
    report.record("uptime increases", uptime_increases(client, options));
    report.record("invalid command", invalid_command(client));
    report.record("recovery after errors", recovery(client));

    report
}

fn set_and_read<P: Link>(client: &mut HilClient<P>, high: bool) -> Result<(), CheckError> {
    if high {
        client.set_high()?;
    } else {
        client.set_low()?;
    }
    let level = client.read_level()?;
    tracing::debug!("  drove {}, read {}", u8::from(high), u8::from(level));
    ensure(level == high, || {
        format!(
            "expected {}, read {} (check loopback wire)",
            u8::from(high),
            u8::from(level)
        )
    })
}

fn toggle_sequence<P: Link>(client: &mut HilClient<P>) -> Result<(), CheckError> {
    let expected = [true, false, true, false];
    let mut actual = Vec::with_capacity(expected.len());
    for &level in &expected {
        if level {
            client.set_high()?;
        } else {
            client.set_low()?;
        }
        actual.push(client.read_level()?);
    }
    ensure(actual == expected, || {
        format!("sequence mismatch: expected {:?}, got {:?}", expected, actual)
    })
}

fn status_sane<P: Link>(client: &mut HilClient<P>) -> Result<(), CheckError> {
    let (uptime, count) = client.status()?;
    tracing::debug!("  uptime={}ms count={}", uptime, count);
    ensure(uptime > 0, || format!("uptime should be > 0, got {}", uptime))?;
    ensure(count >= 1, || format!("command count should be >= 1, got {}", count))
}

fn uptime_increases<P: Link>(
    client: &mut HilClient<P>,
    options: &SuiteOptions,
) -> Result<(), CheckError> {
    let (first, _) = client.status()?;
    thread::sleep(options.uptime_wait);
    let (second, _) = client.status()?;

    let delta = second.wrapping_sub(first);
    tracing::debug!("  {}ms -> {}ms (delta {}ms)", first, second, delta);
    ensure(delta >= options.min_uptime_delta_ms, || {
        format!(
            "uptime advanced {}ms over {:?}, expected at least {}ms",
            delta, options.uptime_wait, options.min_uptime_delta_ms
        )
    })
}

fn invalid_command<P: Link>(client: &mut HilClient<P>) -> Result<(), CheckError> {
    let line = client.send_command('X')?;
    let reply = Reply::parse(&line);
    let rejected = matches!(reply, Reply::Err(_)) && reply.payload() == BAD_COMMAND_TOKEN;
    ensure(rejected, || format!("expected E {}, got {:?}", BAD_COMMAND_TOKEN, line))
}

fn recovery<P: Link>(client: &mut HilClient<P>) -> Result<(), CheckError> {
    client.send_command('Z')?;
    client.send_command('!')?;
    client.verify_identity()?;
    Ok(())
}

fn wire_removed<P: Link>(client: &mut HilClient<P>) -> Result<(), CheckError> {
    client.set_high()?;
    let level = client.read_level()?;
    ensure(!level, || {
        "input should read 0 with the wire removed (pull-down)".to_string()
    })
}
