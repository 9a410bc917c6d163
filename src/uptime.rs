//! Turning ON/OFF events into a total ON duration.

use crate::timestamp::Timestamp;
use crate::types::{EventRecord, StateKind};
use chrono::TimeDelta;
use log::debug;

/// Pairs the i-th ON with the i-th OFF and sums `off - on` over the pairs.
///
/// Trailing events of the longer sequence are ignored. A pair whose OFF
/// precedes its ON contributes a negative amount.
pub fn compute_uptime(on_events: &[Timestamp], off_events: &[Timestamp]) -> TimeDelta {
    on_events
        .iter()
        .zip(off_events)
        .fold(TimeDelta::zero(), |total, (&on, &off)| total + (off - on))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    Unknown,
    On(Timestamp),
    Off,
}

/// Accumulates ON time across ON to OFF transitions seen in time order.
#[derive(Debug, Clone)]
pub struct UptimeTracker {
    state: DeviceState,
    total: TimeDelta,
    last_seen: Option<Timestamp>,
    rejected: usize,
}

impl UptimeTracker {
    pub fn new() -> Self {
        Self {
            state: DeviceState::Unknown,
            total: TimeDelta::zero(),
            last_seen: None,
            rejected: 0,
        }
    }

    pub fn observe(&mut self, event: EventRecord) {
        if let Some(last) = self.last_seen {
            if event.at < last {
                debug!("Ignoring {:?} at {}: earlier than {}", event.kind, event.at, last);
                self.rejected += 1;
                return;
            }
        }
        self.last_seen = Some(event.at);

        self.state = match (self.state, event.kind) {
            (DeviceState::On(since), StateKind::On) => DeviceState::On(since),
            (_, StateKind::On) => DeviceState::On(event.at),
            (DeviceState::On(since), StateKind::Off) => {
                self.total = self.total + (event.at - since);
                DeviceState::Off
            }
            (_, StateKind::Off) => DeviceState::Off,
        };
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn total(&self) -> TimeDelta {
        self.total
    }

    /// Events dropped for arriving out of time order.
    pub fn rejected(&self) -> usize {
        self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(text: &str) -> Timestamp {
        text.parse().unwrap()
    }

    fn on(text: &str) -> EventRecord {
        EventRecord {
            kind: StateKind::On,
            at: ts(text),
        }
    }

    fn off(text: &str) -> EventRecord {
        EventRecord {
            kind: StateKind::Off,
            at: ts(text),
        }
    }

    #[test]
    fn empty_sequences_are_zero() {
        assert_eq!(compute_uptime(&[], &[]), TimeDelta::zero());
        assert_eq!(
            compute_uptime(&[ts("Jul 11 16:11:51:490")], &[]),
            TimeDelta::zero()
        );
        assert_eq!(
            compute_uptime(&[], &[ts("Jul 11 16:11:51:490")]),
            TimeDelta::zero()
        );
    }

    #[test]
    fn single_pair_two_seconds() {
        let uptime = compute_uptime(&[ts("Jul 11 16:11:51:490")], &[ts("Jul 11 16:11:53:490")]);
        assert_eq!(uptime, TimeDelta::seconds(2));
    }

    #[test]
    fn pairs_across_midnight_and_month_end() {
        let uptime = compute_uptime(&[ts("Jan 31 23:59:59:000")], &[ts("Feb 01 00:00:01:500")]);
        assert_eq!(uptime, TimeDelta::milliseconds(2_500));
    }

    #[test]
    fn unmatched_trailing_events_are_ignored() {
        let ons = [
            ts("Jul 11 10:00:00:000"),
            ts("Jul 11 11:00:00:000"),
            ts("Jul 11 12:00:00:000"),
        ];
        let offs = [ts("Jul 11 10:00:10:000"), ts("Jul 11 11:00:05:000")];
        assert_eq!(compute_uptime(&ons, &offs), TimeDelta::seconds(15));
        assert_eq!(compute_uptime(&ons[..1], &offs), TimeDelta::seconds(10));
    }

    #[test]
    fn misordered_pair_contributes_negative_time() {
        let uptime = compute_uptime(&[ts("Jul 11 10:00:05:000")], &[ts("Jul 11 10:00:00:000")]);
        assert_eq!(uptime, TimeDelta::seconds(-5));
    }

    #[test]
    fn tracker_sums_transitions() {
        let mut tracker = UptimeTracker::new();
        tracker.observe(on("Jul 11 10:00:00:000"));
        tracker.observe(off("Jul 11 10:00:02:000"));
        tracker.observe(on("Jul 11 10:01:00:000"));
        tracker.observe(off("Jul 11 10:01:03:250"));
        assert_eq!(tracker.total(), TimeDelta::milliseconds(5_250));
        assert_eq!(tracker.state(), DeviceState::Off);
        assert_eq!(tracker.rejected(), 0);
    }

    #[test]
    fn tracker_keeps_first_on_and_ignores_leading_off() {
        let mut tracker = UptimeTracker::new();
        tracker.observe(off("Jul 11 09:59:00:000"));
        assert_eq!(tracker.state(), DeviceState::Off);
        tracker.observe(on("Jul 11 10:00:00:000"));
        tracker.observe(on("Jul 11 10:00:05:000"));
        tracker.observe(off("Jul 11 10:00:10:000"));
        tracker.observe(off("Jul 11 10:00:20:000"));
        assert_eq!(tracker.total(), TimeDelta::seconds(10));
    }

    #[test]
    fn tracker_rejects_out_of_order_events() {
        let mut tracker = UptimeTracker::new();
        tracker.observe(on("Jul 11 10:00:05:000"));
        tracker.observe(off("Jul 11 10:00:00:000"));
        assert_eq!(tracker.total(), TimeDelta::zero());
        assert_eq!(tracker.rejected(), 1);
        assert_eq!(tracker.state(), DeviceState::On(ts("Jul 11 10:00:05:000")));
        tracker.observe(off("Jul 11 10:00:07:000"));
        assert_eq!(tracker.total(), TimeDelta::seconds(2));
    }

    #[test]
    fn tracker_leaves_open_interval_uncounted() {
        let mut tracker = UptimeTracker::new();
        tracker.observe(on("Jul 11 10:00:00:000"));
        assert_eq!(tracker.total(), TimeDelta::zero());
        assert!(matches!(tracker.state(), DeviceState::On(_)));
    }
}
