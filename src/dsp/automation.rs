/*
Gain Automation
===============

A timeline of scheduled value changes for one gain stage. Instead of
stepping an envelope state machine per sample, the caller describes the
shape up front and the mixer asks "what is the value at time t?".

Event kinds
-----------

  Set { time, value }          jump to `value` at `time`
  Linear { end, value }        straight line from the previous event to
                               (`end`, `value`)
  Exponential { end, value }   geometric curve from the previous event to
                               (`end`, `value`)

A ramp always starts from the time and value of the event before it, so a
voice schedule reads naturally:

  set(0.00, 0.0)           gain
  linear(0.05, 0.3)         0.3 ┐  ╱╲
  linear(0.30, 0.2)             │ ╱  ╲______
                            0.2 │╱
                              0 └──────────────→ t
                                0  .05  .30

Release
-------

Cancelling removes every event at or after the cancel time. The shape then
falls back to whatever the earlier events describe, which is why a release
first snapshots the current value, cancels, pins the snapshot with `set`
and only then ramps down:

  let held = timeline.value_at(now);
  timeline.cancel_from(now);
  timeline.set(now, held);
  timeline.exponential(now + 0.3, 0.001);

Exponential curves are undefined through zero. A ramp whose start or end
is not strictly positive holds its start value and jumps at the end.
*/

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AutomationEvent {
    Set { time: f64, value: f32 },
    Linear { end: f64, value: f32 },
    Exponential { end: f64, value: f32 },
}

impl AutomationEvent {
    pub fn time(&self) -> f64 {
        match *self {
            AutomationEvent::Set { time, .. } => time,
            AutomationEvent::Linear { end, .. } => end,
            AutomationEvent::Exponential { end, .. } => end,
        }
    }

    pub fn value(&self) -> f32 {
        match *self {
            AutomationEvent::Set { value, .. }
            | AutomationEvent::Linear { value, .. }
            | AutomationEvent::Exponential { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GainAutomation {
    /// Value before the first event
    default_value: f32,
    /// Sorted by time; equal times keep insertion order
    events: Vec<AutomationEvent>,
}

impl GainAutomation {
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: Vec::with_capacity(8),
        }
    }

    pub fn set(&mut self, time: f64, value: f32) {
        self.insert(AutomationEvent::Set { time, value });
    }

    pub fn linear(&mut self, end: f64, value: f32) {
        self.insert(AutomationEvent::Linear { end, value });
    }

    pub fn exponential(&mut self, end: f64, value: f32) {
        self.insert(AutomationEvent::Exponential { end, value });
    }

    pub fn schedule(&mut self, event: AutomationEvent) {
        self.insert(event);
    }

    /// Drop every event scheduled at or after `time`.
    pub fn cancel_from(&mut self, time: f64) {
        self.events.retain(|e| e.time() < time);
    }

    pub fn events(&self) -> &[AutomationEvent] {
        &self.events
    }

    /// Forget events that can no longer influence values at or after `time`.
    ///
    /// The last event at or before `time` is kept: it anchors any ramp that
    /// is still in progress.
    pub fn prune_before(&mut self, time: f64) {
        let settled = self.events.iter().take_while(|e| e.time() <= time).count();
        if settled > 1 {
            let last = self.events[settled - 1];
            self.default_value = last.value();
            self.events.drain(..settled - 1);
        }
    }

    /// Evaluate the timeline at `time`.
    pub fn value_at(&self, time: f64) -> f32 {
        let next_idx = self.events.partition_point(|e| e.time() <= time);

        let (start_time, start_value) = match next_idx.checked_sub(1) {
            Some(prev) => (self.events[prev].time(), self.events[prev].value()),
            None => (0.0, self.default_value),
        };

        let Some(next) = self.events.get(next_idx) else {
            return start_value;
        };

        let span = next.time() - start_time;
        if span <= 0.0 {
            return start_value;
        }
        let progress = ((time - start_time) / span).clamp(0.0, 1.0) as f32;

        match *next {
            AutomationEvent::Set { .. } => start_value,
            AutomationEvent::Linear { value, .. } => {
                start_value + (value - start_value) * progress
            }
            AutomationEvent::Exponential { value, .. } => {
                if start_value <= 0.0 || value <= 0.0 {
                    start_value
                } else {
                    start_value * (value / start_value).powf(progress)
                }
            }
        }
    }

    fn insert(&mut self, event: AutomationEvent) {
        let at = self.events.partition_point(|e| e.time() <= event.time());
        self.events.insert(at, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voice_shape() -> GainAutomation {
        let mut gain = GainAutomation::new(1.0);
        gain.set(0.0, 0.0);
        gain.linear(0.05, 0.3);
        gain.linear(0.3, 0.2);
        gain
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn attack_and_decay_are_linear() {
        let gain = voice_shape();
        assert!(close(gain.value_at(0.0), 0.0));
        assert!(close(gain.value_at(0.025), 0.15));
        assert!(close(gain.value_at(0.05), 0.3));
        assert!(close(gain.value_at(0.175), 0.25));
        assert!(close(gain.value_at(0.3), 0.2));
        assert!(close(gain.value_at(10.0), 0.2), "sustain holds forever");
    }

    #[test]
    fn release_from_mid_attack_starts_at_current_level() {
        let mut gain = voice_shape();
        let now = 0.025;

        let held = gain.value_at(now);
        gain.cancel_from(now);
        gain.set(now, held);
        gain.exponential(now + 0.3, 0.001);

        assert!(close(gain.value_at(now), 0.15), "no jump at release");
        let mid = gain.value_at(now + 0.15);
        assert!(close(mid, (0.15f32 * 0.001).sqrt()), "geometric midpoint, got {mid}");
        assert!(close(gain.value_at(now + 0.3), 0.001));
    }

    #[test]
    fn cancel_without_pin_falls_back_to_earlier_events() {
        let mut gain = voice_shape();
        gain.cancel_from(0.1);
        // Decay ramp removed: holds the attack target
        assert!(close(gain.value_at(0.2), 0.3));
    }

    #[test]
    fn exponential_from_zero_holds_then_jumps() {
        let mut gain = GainAutomation::new(0.0);
        gain.set(0.0, 0.0);
        gain.exponential(1.0, 0.5);
        assert_eq!(gain.value_at(0.5), 0.0);
        assert_eq!(gain.value_at(1.0), 0.5);
    }

    #[test]
    fn prune_keeps_ramp_anchor() {
        let mut gain = voice_shape();
        let before = gain.value_at(0.1);
        gain.prune_before(0.1);
        assert_eq!(gain.events().len(), 2);
        assert!(close(gain.value_at(0.1), before));
    }
}
