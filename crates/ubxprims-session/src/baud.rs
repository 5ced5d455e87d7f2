//! Line-speed negotiation.
//!
//! The receiver's port speed is not known up front. Each candidate speed is
//! tried in turn with a CFG-PRT poll; once the receiver answers, its port is
//! reconfigured to the target and the change is confirmed at the new speed.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};
use ubxprims_message::{MessageId, PortConfig, Record};

use crate::clock::Clock;
use crate::config::{RetryPolicy, DEFAULT_TIMEOUT};
use crate::controller::Controller;
use crate::error::{Result, SessionError};
use ubxprims_transport::Transport;

/// Line speeds tried in order, slowest first.
pub const DEFAULT_CANDIDATES: [u32; 7] = [9600, 19200, 38400, 57600, 115200, 230400, 460800];

/// Settings for [`negotiate`].
#[derive(Debug, Clone)]
pub struct BaudConfig {
    /// Speed the receiver and host should end up on.
    pub target: u32,
    pub candidates: Vec<u32>,
    /// Configure-and-confirm rounds per answering candidate.
    pub attempts_per_candidate: u32,
    /// Policy for CFG-PRT polls, both probing and confirming.
    pub probe: RetryPolicy,
    /// Policy for the CFG-PRT configuration exchange.
    pub configure: RetryPolicy,
    /// Pause after the receiver accepts a new speed, before the host switches.
    pub settle: Duration,
}

impl BaudConfig {
    pub fn new(target: u32) -> Self {
        Self {
            target,
            candidates: DEFAULT_CANDIDATES.to_vec(),
            attempts_per_candidate: 3,
            probe: RetryPolicy::once(DEFAULT_TIMEOUT),
            configure: RetryPolicy::once(DEFAULT_TIMEOUT),
            settle: Duration::from_millis(100),
        }
    }

    pub fn with_candidates(mut self, candidates: impl Into<Vec<u32>>) -> Self {
        self.candidates = candidates.into();
        self
    }
}

/// Result of a successful negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaudOutcome {
    /// Speed both sides now use.
    pub rate: u32,
    /// Speed at which the receiver first answered.
    pub found_at: u32,
    /// False when the receiver was already configured for the target.
    pub changed: bool,
}

/// Bring host and receiver to `config.target`.
///
/// Fails with [`SessionError::BaudNegotiationFailed`] once every candidate is
/// exhausted. A NACK for the new port settings and any transport error end
/// negotiation immediately.
pub fn negotiate<T, C>(controller: &mut Controller<T, C>, config: &BaudConfig) -> Result<BaudOutcome>
where
    T: Transport,
    C: Clock,
{
    let target = config.target;
    let mut tried = Vec::with_capacity(config.candidates.len());

    for &candidate in &config.candidates {
        tried.push(candidate);
        info!(candidate, target, "probing line speed");
        controller.set_baud_rate(candidate)?;

        let port = match probe(controller, config.probe)? {
            Some(port) => port,
            None => {
                debug!(candidate, "no answer");
                continue;
            }
        };
        info!(candidate, reported = port.baud_rate(), "receiver answered");

        if port.baud_rate() == target {
            info!(rate = target, "receiver already at target speed");
            return Ok(BaudOutcome {
                rate: candidate,
                found_at: candidate,
                changed: false,
            });
        }

        for attempt in 1..=config.attempts_per_candidate {
            if switch(controller, config, &port, attempt)? {
                info!(rate = target, found_at = candidate, "line speed changed");
                return Ok(BaudOutcome {
                    rate: target,
                    found_at: candidate,
                    changed: true,
                });
            }
            warn!(candidate, attempt, "speed change not confirmed, reverting");
            controller.set_baud_rate(candidate)?;
        }
    }

    Err(SessionError::BaudNegotiationFailed { target, tried })
}

/// Poll the current port settings, treating silence as `None`.
fn probe<T: Transport, C: Clock>(
    controller: &mut Controller<T, C>,
    policy: RetryPolicy,
) -> Result<Option<PortConfig>> {
    match controller.poll_with(MessageId::CfgPrt, &[], policy) {
        Ok(message) => Ok(Some(PortConfig::first(&message)?)),
        Err(err) if err.is_no_response() => Ok(None),
        Err(err) => Err(err),
    }
}

/// One configure-and-confirm round. Returns whether the receiver reported
/// the target speed after the host switched.
fn switch<T: Transport, C: Clock>(
    controller: &mut Controller<T, C>,
    config: &BaudConfig,
    port: &PortConfig,
    attempt: u32,
) -> Result<bool> {
    let mut updated = port.clone();
    updated.set_baud_rate(config.target);
    let payload = controller
        .registry()
        .encode(MessageId::CfgPrt, &Record::new(), &[updated.to_record()])?;

    debug!(target = config.target, attempt, "sending port configuration");
    match controller.send_configuration(MessageId::CfgPrt, &payload, config.configure) {
        Ok(_) => {}
        // The acknowledgement may go out at the new speed and be lost; the
        // confirmation poll decides.
        Err(err) if err.is_no_response() => debug!("no acknowledgement for new port settings"),
        Err(err) => return Err(err),
    }

    controller.clock().sleep(config.settle);
    controller.set_baud_rate(config.target)?;

    Ok(probe(controller, config.probe)?.is_some_and(|port| port.baud_rate() == config.target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_scan_slowest_first() {
        let config = BaudConfig::new(115_200);
        assert_eq!(config.candidates.first(), Some(&9600));
        assert!(config.candidates.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(config.attempts_per_candidate, 3);
        assert_eq!(config.probe.attempts(), 1);
    }

    #[test]
    fn candidates_can_be_narrowed() {
        let config = BaudConfig::new(9600).with_candidates([115_200, 9600]);
        assert_eq!(config.candidates, vec![115_200, 9600]);
    }
}
