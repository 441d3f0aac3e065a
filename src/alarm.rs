//! Translates an alert decision into indicator and audible actuator
//! calls, with a one-shot auto-clear and a 2 Hz audible toggle.

use std::time::Duration;

use log::{debug, info};

use crate::stack::{AlertActuators, TimerEvent, ZigbeeStack};

#[derive(Debug, Clone)]
pub struct AlarmConfig {
    /// How long an alert stays active before auto-clearing.
    pub clear_after: Duration,
    /// Period of the audible on/off toggle.
    pub toggle_period: Duration,
    pub sound_duty: u8,
    pub alert_color: (u8, u8, u8),
    pub idle_color: (u8, u8, u8),
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            clear_after: Duration::from_secs(10),
            toggle_period: Duration::from_millis(250),
            sound_duty: 128,
            alert_color: (255, 0, 0),
            idle_color: (0, 0, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlarmState {
    Idle,
    Alerting { sound_on: bool },
}

/// Two-state timer-driven alarm. Every trigger bumps the generation;
/// timer events scheduled under an older generation are ignored, so a
/// re-trigger restarts both timers instead of stacking them.
pub struct AlarmController {
    config: AlarmConfig,
    state: AlarmState,
    generation: u32,
}

impl AlarmController {
    pub fn new(config: AlarmConfig) -> Self {
        Self {
            config,
            state: AlarmState::Idle,
            generation: 0,
        }
    }

    pub fn is_alerting(&self) -> bool {
        matches!(self.state, AlarmState::Alerting { .. })
    }

    /// Raise the alert: indicator to the alert colour, audible on, both
    /// timers (re)started from zero.
    pub fn trigger<S: ZigbeeStack, A: AlertActuators>(&mut self, stack: &mut S, actuators: &mut A) {
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let (r, g, b) = self.config.alert_color;
        actuators.set_indicator_color(r, g, b);
        actuators.set_sound_level(self.config.sound_duty);
        self.state = AlarmState::Alerting { sound_on: true };
        stack.schedule(self.config.toggle_period, TimerEvent::AlarmToggle { generation });
        stack.schedule(self.config.clear_after, TimerEvent::AlarmClear { generation });
        info!("alarm raised (auto-clear in {:?})", self.config.clear_after);
    }

    /// Periodic audible toggle. Reschedules itself until cleared.
    pub fn on_toggle<S: ZigbeeStack, A: AlertActuators>(
        &mut self,
        generation: u32,
        stack: &mut S,
        actuators: &mut A,
    ) {
        if generation != self.generation {
            debug!("ignoring stale alarm toggle (generation {generation})");
            return;
        }
        let AlarmState::Alerting { sound_on } = self.state else {
            return;
        };
        let sound_on = !sound_on;
        actuators.set_sound_level(if sound_on { self.config.sound_duty } else { 0 });
        self.state = AlarmState::Alerting { sound_on };
        stack.schedule(self.config.toggle_period, TimerEvent::AlarmToggle { generation });
    }

    /// Auto-clear expiry: back to idle, audible silenced. Stopping the
    /// toggle is implicit: its next event no longer matches an alerting
    /// state.
    pub fn on_clear<A: AlertActuators>(&mut self, generation: u32, actuators: &mut A) {
        if generation != self.generation {
            debug!("ignoring stale alarm clear (generation {generation})");
            return;
        }
        if self.state == AlarmState::Idle {
            return;
        }
        let (r, g, b) = self.config.idle_color;
        actuators.set_indicator_color(r, g, b);
        actuators.set_sound_level(0);
        self.state = AlarmState::Idle;
        info!("alarm cleared");
    }
}

#[cfg(test)]
mod tests {
    use crate::stack::testing::{RecordingActuators, RecordingStack};

    use super::*;

    fn setup() -> (AlarmController, RecordingStack, RecordingActuators) {
        (
            AlarmController::new(AlarmConfig::default()),
            RecordingStack::default(),
            RecordingActuators::default(),
        )
    }

    #[test]
    fn trigger_sets_outputs_and_starts_both_timers() {
        let (mut alarm, mut stack, mut out) = setup();
        alarm.trigger(&mut stack, &mut out);
        assert!(alarm.is_alerting());
        assert_eq!(out.colors, vec![(255, 0, 0)]);
        assert_eq!(out.levels, vec![128]);
        assert_eq!(
            stack.scheduled,
            vec![
                (Duration::from_millis(250), TimerEvent::AlarmToggle { generation: 1 }),
                (Duration::from_secs(10), TimerEvent::AlarmClear { generation: 1 }),
            ]
        );
    }

    #[test]
    fn toggle_alternates_audible_and_reschedules() {
        let (mut alarm, mut stack, mut out) = setup();
        alarm.trigger(&mut stack, &mut out);
        alarm.on_toggle(1, &mut stack, &mut out);
        alarm.on_toggle(1, &mut stack, &mut out);
        assert_eq!(out.levels, vec![128, 0, 128]);
        assert_eq!(stack.scheduled_count(TimerEvent::AlarmToggle { generation: 1 }), 3);
    }

    #[test]
    fn clear_silences_and_returns_to_idle() {
        let (mut alarm, mut stack, mut out) = setup();
        alarm.trigger(&mut stack, &mut out);
        alarm.on_clear(1, &mut out);
        assert!(!alarm.is_alerting());
        assert_eq!(out.colors, vec![(255, 0, 0), (0, 0, 0)]);
        assert_eq!(out.levels, vec![128, 0]);
        // A toggle surviving past the clear does nothing.
        alarm.on_toggle(1, &mut stack, &mut out);
        assert_eq!(out.levels, vec![128, 0]);
    }

    #[test]
    fn retrigger_restarts_timers_and_invalidates_old_generation() {
        let (mut alarm, mut stack, mut out) = setup();
        alarm.trigger(&mut stack, &mut out);
        alarm.trigger(&mut stack, &mut out);
        assert!(alarm.is_alerting());
        // Old-generation events are ignored.
        alarm.on_toggle(1, &mut stack, &mut out);
        alarm.on_clear(1, &mut out);
        assert!(alarm.is_alerting());
        assert_eq!(out.levels, vec![128, 128]);
        // New generation still functions.
        alarm.on_clear(2, &mut out);
        assert!(!alarm.is_alerting());
    }
}
