//! Network formation and steering. The controller has no terminal
//! state: it keeps the network joinable indefinitely, re-opening the
//! steering window periodically and backing off on failures.

use log::{debug, error, info, warn};

use crate::{
    constants::{
        FORMATION_RETRY_DELAY, STEERING_REISSUE_RETRY_DELAY, STEERING_REOPEN_PERIOD,
        STEERING_RETRY_DELAY,
    },
    stack::{StackError, TimerEvent, ZigbeeStack},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommissioningState {
    AwaitingStackReady,
    Forming,
    /// Network formed and currently open for joining.
    SteeringOpen,
    /// Network formed but the joining window is closed; a reopen is
    /// scheduled.
    SteeringClosed,
}

pub struct Commissioning {
    state: CommissioningState,
    formation_retry_pending: bool,
    reopen_pending: bool,
}

impl Commissioning {
    pub fn new() -> Self {
        Self {
            state: CommissioningState::AwaitingStackReady,
            formation_retry_pending: false,
            reopen_pending: false,
        }
    }

    pub fn state(&self) -> CommissioningState {
        self.state
    }

    pub fn on_stack_ready<S: ZigbeeStack>(&mut self, stack: &mut S) {
        match self.state {
            CommissioningState::AwaitingStackReady => self.issue_formation(stack),
            CommissioningState::Forming => {
                // A repeated ready signal while a retry is pending must
                // not stack a second timer.
                if self.formation_retry_pending {
                    debug!("stack ready re-signalled; formation retry already scheduled");
                } else {
                    self.issue_formation(stack);
                }
            }
            _ => warn!("ignoring stack ready signal in state {:?}", self.state),
        }
    }

    pub fn on_formation_complete<S: ZigbeeStack>(
        &mut self,
        stack: &mut S,
        result: Result<(), StackError>,
    ) {
        match result {
            Ok(()) => {
                info!(
                    "network formed on channel {}; opening for joining",
                    stack.current_channel()
                );
                self.issue_steering(stack);
            }
            Err(err) => {
                error!("network formation failed ({err}); retrying in {FORMATION_RETRY_DELAY:?}");
                self.schedule_formation_retry(stack);
            }
        }
    }

    pub fn on_steering_complete<S: ZigbeeStack>(
        &mut self,
        stack: &mut S,
        result: Result<(), StackError>,
    ) -> bool {
        match result {
            Ok(()) => {
                info!(
                    "steering complete; network open, reopening every {STEERING_REOPEN_PERIOD:?}"
                );
                self.state = CommissioningState::SteeringOpen;
                self.schedule_reopen(stack, STEERING_REOPEN_PERIOD);
                true
            }
            Err(err) => {
                warn!("steering failed or cancelled ({err}); retrying in {STEERING_RETRY_DELAY:?}");
                self.state = CommissioningState::SteeringClosed;
                self.schedule_reopen(stack, STEERING_RETRY_DELAY);
                false
            }
        }
    }

    pub fn on_retry_formation<S: ZigbeeStack>(&mut self, stack: &mut S) {
        self.formation_retry_pending = false;
        if self.state == CommissioningState::Forming {
            self.issue_formation(stack);
        }
    }

    pub fn on_reopen_steering<S: ZigbeeStack>(&mut self, stack: &mut S) {
        self.reopen_pending = false;
        match self.state {
            CommissioningState::SteeringOpen | CommissioningState::SteeringClosed => {
                info!("reopening network for joining");
                if let Err(err) = stack.open_network() {
                    warn!(
                        "could not reissue steering ({err}); retrying in {STEERING_REISSUE_RETRY_DELAY:?}"
                    );
                    self.state = CommissioningState::SteeringClosed;
                    self.schedule_reopen(stack, STEERING_REISSUE_RETRY_DELAY);
                }
            }
            _ => debug!("reopen timer fired in state {:?}; ignoring", self.state),
        }
    }

    fn issue_formation<S: ZigbeeStack>(&mut self, stack: &mut S) {
        info!("forming network");
        self.state = CommissioningState::Forming;
        if let Err(err) = stack.form_network() {
            error!("formation request rejected ({err}); retrying in {FORMATION_RETRY_DELAY:?}");
            self.schedule_formation_retry(stack);
        }
    }

    fn issue_steering<S: ZigbeeStack>(&mut self, stack: &mut S) {
        match stack.open_network() {
            Ok(()) => self.state = CommissioningState::SteeringOpen,
            Err(err) => {
                warn!(
                    "steering request rejected ({err}); retrying in {STEERING_REISSUE_RETRY_DELAY:?}"
                );
                self.state = CommissioningState::SteeringClosed;
                self.schedule_reopen(stack, STEERING_REISSUE_RETRY_DELAY);
            }
        }
    }

    fn schedule_formation_retry<S: ZigbeeStack>(&mut self, stack: &mut S) {
        if !self.formation_retry_pending {
            self.formation_retry_pending = true;
            stack.schedule(FORMATION_RETRY_DELAY, TimerEvent::RetryFormation);
        }
    }

    fn schedule_reopen<S: ZigbeeStack>(&mut self, stack: &mut S, delay: std::time::Duration) {
        if !self.reopen_pending {
            self.reopen_pending = true;
            stack.schedule(delay, TimerEvent::ReopenSteering);
        }
    }
}

impl Default for Commissioning {
    fn default() -> Self {
        Self::new()
    }
}
