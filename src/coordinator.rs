//! The event loop. Every stack signal, query completion and timer
//! expiry is dispatched serially through [`Coordinator::handle_event`],
//! so the shared state (alerted set, commissioning state, interview
//! contexts) needs sequencing, never locking.

use log::{debug, info, warn};
use tokio::sync::mpsc::Receiver;

use crate::{
    alarm::{AlarmConfig, AlarmController},
    alerted::AlertedSet,
    commissioning::{Commissioning, CommissioningState},
    constants::{SCAN_CHANNEL_MASK, SCAN_DURATION_EXP},
    denylist::DenyList,
    interview::{self, InterviewManager},
    scanner::DiscoveryScanner,
    stack::{AlertActuators, Event, TimerEvent, ZigbeeStack},
    zcl::ReadAttributesResponse,
};

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub denylist: DenyList,
    pub alarm: AlarmConfig,
    pub scan_enabled: bool,
    pub scan_channel_mask: u32,
    pub scan_duration_exp: u8,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            denylist: DenyList::default(),
            alarm: AlarmConfig::default(),
            scan_enabled: false,
            scan_channel_mask: SCAN_CHANNEL_MASK,
            scan_duration_exp: SCAN_DURATION_EXP,
        }
    }
}

/// Owns the collaborator handles and all process-wide state.
pub struct Coordinator<S, A> {
    stack: S,
    actuators: A,
    commissioning: Commissioning,
    interviews: InterviewManager,
    scanner: DiscoveryScanner,
    alarm: AlarmController,
    alerted: AlertedSet,
    denylist: DenyList,
    scan_enabled: bool,
}

impl<S: ZigbeeStack, A: AlertActuators> Coordinator<S, A> {
    pub fn new(config: CoordinatorConfig, stack: S, actuators: A) -> Self {
        Self {
            stack,
            actuators,
            commissioning: Commissioning::new(),
            interviews: InterviewManager::new(),
            scanner: DiscoveryScanner::new(config.scan_channel_mask, config.scan_duration_exp),
            alarm: AlarmController::new(config.alarm),
            alerted: AlertedSet::new(),
            denylist: config.denylist,
            scan_enabled: config.scan_enabled,
        }
    }

    /// Drain the serialized event stream until every sender is gone.
    pub async fn run(&mut self, events: &mut Receiver<Event>) {
        info!("coordinator event loop started");
        while let Some(event) = events.recv().await {
            self.handle_event(event);
        }
        info!("coordinator event loop stopped");
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::StackReady => self.commissioning.on_stack_ready(&mut self.stack),
            Event::FormationComplete(result) => self
                .commissioning
                .on_formation_complete(&mut self.stack, result),
            Event::SteeringComplete(result) => {
                let open = self
                    .commissioning
                    .on_steering_complete(&mut self.stack, result);
                if open && self.scan_enabled && !self.scanner.is_running() {
                    self.scanner.start(&mut self.stack);
                }
            }
            Event::DeviceAnnounce(Some(announce)) => self
                .interviews
                .on_device_announce(&mut self.stack, &announce),
            Event::DeviceAnnounce(None) => {
                warn!("device announce with missing parameters; ignoring");
            }
            Event::ActiveEndpoints { addr, result } => self
                .interviews
                .on_active_endpoints(&mut self.stack, addr, result),
            Event::SimpleDescriptorResult {
                addr,
                endpoint,
                result,
            } => self
                .interviews
                .on_simple_descriptor(&mut self.stack, addr, endpoint, result),
            Event::ReadAttributesResult(response) => self.on_read_attributes(response),
            Event::ScanComplete { status, networks } => {
                self.scanner
                    .on_scan_complete(&mut self.stack, status, &networks)
            }
            Event::Timer(timer) => self.on_timer(timer),
        }
    }

    fn on_timer(&mut self, timer: TimerEvent) {
        match timer {
            TimerEvent::RetryFormation => self.commissioning.on_retry_formation(&mut self.stack),
            TimerEvent::ReopenSteering => self.commissioning.on_reopen_steering(&mut self.stack),
            TimerEvent::StartScan => self.scanner.start(&mut self.stack),
            TimerEvent::AlarmToggle { generation } => {
                self.alarm
                    .on_toggle(generation, &mut self.stack, &mut self.actuators)
            }
            TimerEvent::AlarmClear { generation } => {
                self.alarm.on_clear(generation, &mut self.actuators)
            }
        }
    }

    /// Classify a read response and alert at most once per address. A
    /// response from an interview that is already gone is still checked,
    /// but the cache keeps it from re-triggering the actuators.
    fn on_read_attributes(&mut self, response: ReadAttributesResponse) {
        let evidence = interview::classify(&response, &self.denylist);
        let tracked = self
            .interviews
            .note_read_response(response.src, response.tsn, evidence);
        if !tracked {
            debug!(
                "read response from {} (tsn {}) matches no tracked interview",
                response.src, response.tsn
            );
        }
        if !evidence.matched() {
            return;
        }
        if self.alerted.contains(response.src) {
            info!(
                "denylisted device {} matched again; alert suppressed",
                response.src
            );
            return;
        }
        warn!(
            "ALERT: denylisted device detected ({} endpoint {})",
            response.src, response.src_endpoint
        );
        self.alerted.insert(response.src);
        self.alarm.trigger(&mut self.stack, &mut self.actuators);
    }

    pub fn commissioning_state(&self) -> CommissioningState {
        self.commissioning.state()
    }

    pub fn alerted(&self) -> &AlertedSet {
        &self.alerted
    }

    pub fn interviews_in_flight(&self) -> usize {
        self.interviews.in_flight()
    }

    pub fn stack(&self) -> &S {
        &self.stack
    }

    pub fn actuators(&self) -> &A {
        &self.actuators
    }
}
