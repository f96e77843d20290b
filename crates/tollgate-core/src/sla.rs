//! SLA clock: deadline tiers for the current step.
//!
//! All arithmetic is done in whole milliseconds. Remaining and overdue
//! amounts are decomposed by truncation, never rounding, so a step that
//! still has time left never shows as "0h 0m" on track by accident.
//!
//! [`SlaWatch`] re-evaluates the status on a fixed period for consumers that
//! keep an SLA on screen. It only reads its inputs and owns its timer: the
//! task stops when the watch is dropped.

use std::{fmt, time::Duration};

use jiff::{SignedDuration, Timestamp};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};

use crate::models::{SlaDuration, StepTiming};

/// Urgency tier of a step's SLA.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlaTier {
    /// No deadline is tracked
    Undetermined,
    OnTrack,
    /// Less than 20% of the window remains
    Critical,
    Overdue,
}

impl SlaTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlaTier::Undetermined => "undetermined",
            SlaTier::OnTrack => "on_track",
            SlaTier::Critical => "critical",
            SlaTier::Overdue => "overdue",
        }
    }
}

/// Result of evaluating an SLA at a given instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlaStatus {
    pub tier: SlaTier,
    /// Time left before the deadline, or time past it when overdue.
    /// Absent when the tier is undetermined.
    pub remaining: Option<SignedDuration>,
}

impl SlaStatus {
    /// Status for steps without a deadline.
    pub fn undetermined() -> Self {
        Self {
            tier: SlaTier::Undetermined,
            remaining: None,
        }
    }

    /// Remaining or overdue amount split into display units.
    pub fn breakdown(&self) -> Option<Breakdown> {
        self.remaining.map(Breakdown::from)
    }
}

/// Whole hours, minutes and seconds of a duration, truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakdown {
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl From<SignedDuration> for Breakdown {
    fn from(duration: SignedDuration) -> Self {
        let total = duration.as_secs().abs();
        Self {
            hours: total / 3600,
            minutes: (total % 3600) / 60,
            seconds: total % 60,
        }
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m", self.hours, self.minutes)
    }
}

/// Evaluate the SLA of a step started at `started_at` with budget `sla`.
///
/// A missing start time, an undetermined budget or a zero-hour budget all
/// yield [`SlaTier::Undetermined`].
pub fn status(started_at: Option<Timestamp>, sla: SlaDuration, now: Timestamp) -> SlaStatus {
    let (Some(started_at), Some(window)) = (started_at, sla.as_millis()) else {
        return SlaStatus::undetermined();
    };

    let deadline = started_at.as_millisecond().saturating_add(window);
    let now = now.as_millisecond();

    if now > deadline {
        return SlaStatus {
            tier: SlaTier::Overdue,
            remaining: Some(SignedDuration::from_millis(now - deadline)),
        };
    }

    // window is a whole number of hours, so a fifth of it is exact.
    let critical_from = deadline - window / 5;
    let tier = if now > critical_from {
        SlaTier::Critical
    } else {
        SlaTier::OnTrack
    };

    SlaStatus {
        tier,
        remaining: Some(SignedDuration::from_millis(deadline - now)),
    }
}

/// Evaluate the SLA of a recorded step timing.
pub fn status_for(timing: Option<&StepTiming>, now: Timestamp) -> SlaStatus {
    match timing {
        Some(timing) => status(Some(timing.started_at), timing.sla, now),
        None => SlaStatus::undetermined(),
    }
}

/// Periodic SLA evaluation published on a watch channel.
///
/// The polling task is aborted when the watch is stopped or dropped, so a
/// consumer that stops displaying the SLA cannot leak timers.
pub struct SlaWatch {
    receiver: watch::Receiver<SlaStatus>,
    handle: JoinHandle<()>,
}

impl SlaWatch {
    /// Start polling every `period`. Must be called within a Tokio runtime.
    pub fn spawn(timing: Option<StepTiming>, period: Duration) -> Self {
        let initial = status_for(timing.as_ref(), Timestamp::now());
        let (sender, receiver) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            // Nothing will ever change for an untimed step.
            if initial.tier == SlaTier::Undetermined {
                return;
            }

            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let current = status_for(timing.as_ref(), Timestamp::now());
                if sender.send(current).is_err() {
                    debug!("SLA watch receiver dropped, stopping");
                    break;
                }
            }
        });

        Self { receiver, handle }
    }

    /// Latest evaluated status.
    pub fn current(&self) -> SlaStatus {
        *self.receiver.borrow()
    }

    /// Wait for the next tick and return its status. Returns `None` once the
    /// polling task has finished.
    pub async fn changed(&mut self) -> Option<SlaStatus> {
        self.receiver.changed().await.ok()?;
        Some(*self.receiver.borrow_and_update())
    }

    /// Stop polling.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for SlaWatch {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 3600;

    fn at(seconds: i64) -> Timestamp {
        Timestamp::from_second(1_700_000_000 + seconds).unwrap()
    }

    #[test]
    fn test_tiers_for_two_day_window() {
        let start = Some(at(0));
        let sla = SlaDuration::Hours(48);

        let fresh = status(start, sla, at(0));
        assert_eq!(fresh.tier, SlaTier::OnTrack);
        assert_eq!(fresh.remaining, Some(SignedDuration::from_hours(48)));

        let late_in_window = status(start, sla, at(47 * HOUR));
        assert_eq!(late_in_window.tier, SlaTier::Critical);
        assert_eq!(late_in_window.remaining, Some(SignedDuration::from_hours(1)));

        let overdue = status(start, sla, at(49 * HOUR));
        assert_eq!(overdue.tier, SlaTier::Overdue);
        assert_eq!(overdue.remaining, Some(SignedDuration::from_hours(1)));
    }

    #[test]
    fn test_critical_boundary() {
        let start = Some(at(0));
        let sla = SlaDuration::Hours(10);

        // Exactly 20% left is still on track; one second later is critical.
        assert_eq!(status(start, sla, at(8 * HOUR)).tier, SlaTier::OnTrack);
        assert_eq!(status(start, sla, at(8 * HOUR + 1)).tier, SlaTier::Critical);
        // The deadline itself is not overdue yet.
        assert_eq!(status(start, sla, at(10 * HOUR)).tier, SlaTier::Critical);
        assert_eq!(status(start, sla, at(10 * HOUR + 1)).tier, SlaTier::Overdue);
    }

    #[test]
    fn test_undetermined_cases() {
        assert_eq!(
            status(Some(at(0)), SlaDuration::Undetermined, at(HOUR)),
            SlaStatus::undetermined()
        );
        assert_eq!(
            status(None, SlaDuration::Hours(24), at(HOUR)),
            SlaStatus::undetermined()
        );
        assert_eq!(
            status(Some(at(0)), SlaDuration::Hours(0), at(HOUR)),
            SlaStatus::undetermined()
        );
        assert_eq!(status_for(None, at(0)).breakdown(), None);
    }

    #[test]
    fn test_breakdown_truncates() {
        let status = status(Some(at(0)), SlaDuration::Hours(24), at(59));
        let breakdown = status.breakdown().unwrap();
        assert_eq!(
            breakdown,
            Breakdown {
                hours: 23,
                minutes: 59,
                seconds: 1
            }
        );
        assert_eq!(breakdown.to_string(), "23h 59m");
    }

    #[test]
    fn test_breakdown_of_overdue_amount() {
        let status = status(Some(at(0)), SlaDuration::Hours(1), at(HOUR + 90));
        assert_eq!(status.tier, SlaTier::Overdue);
        assert_eq!(
            status.breakdown(),
            Some(Breakdown {
                hours: 0,
                minutes: 1,
                seconds: 30
            })
        );
    }

    #[tokio::test]
    async fn test_watch_publishes_ticks() {
        let timing = StepTiming {
            started_at: Timestamp::now(),
            sla: SlaDuration::Hours(48),
        };
        let mut watch = SlaWatch::spawn(Some(timing), Duration::from_millis(10));
        assert_eq!(watch.current().tier, SlaTier::OnTrack);

        let next = watch.changed().await;
        assert_eq!(next.map(|s| s.tier), Some(SlaTier::OnTrack));
        watch.stop();
    }

    #[tokio::test]
    async fn test_watch_for_untimed_step_ends() {
        let timing = StepTiming {
            started_at: Timestamp::now(),
            sla: SlaDuration::Undetermined,
        };
        let mut watch = SlaWatch::spawn(Some(timing), Duration::from_millis(10));
        assert_eq!(watch.current(), SlaStatus::undetermined());
        assert_eq!(watch.changed().await, None);
    }
}
