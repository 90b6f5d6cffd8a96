//! Outbound collaborators: wake-trigger scheduling and feedback cues.
//!
//! The lifecycle and the controller receive these as trait objects so hosts
//! can plug in OS notifications and haptics, and tests can plug in
//! recorders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SchedulerError;

/// Arms and cancels the external wake trigger.
///
/// Only one trigger may be armed at a time; `arm` replaces whatever was
/// armed before.
pub trait NotificationScheduler: Send + Sync {
    fn arm(&self, alarm_id: Uuid, at: DateTime<Utc>) -> Result<(), SchedulerError>;
    fn cancel_all(&self);
}

/// Cosmetic cues keyed to lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackCue {
    Set,
    Ring,
    Snooze,
    Charge,
    Dismiss,
    Delete,
    Toggle,
    Settle,
    Error,
}

/// Fire-and-forget feedback (haptics, sounds, terminal bell).
pub trait FeedbackSink: Send + Sync {
    fn cue(&self, cue: FeedbackCue);
}

/// Scheduler for hosts without push delivery; the alarm is polled with
/// `tick()` instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingScheduler;

impl NotificationScheduler for LoggingScheduler {
    fn arm(&self, alarm_id: Uuid, at: DateTime<Utc>) -> Result<(), SchedulerError> {
        tracing::debug!(%alarm_id, %at, "wake trigger armed");
        Ok(())
    }

    fn cancel_all(&self) {
        tracing::debug!("wake triggers cancelled");
    }
}

/// In-process stand-ins for the outbound traits.
#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// One call observed by [`RecordingScheduler`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum SchedulerCall {
        Arm { alarm_id: Uuid, at: DateTime<Utc> },
        CancelAll,
    }

    /// Scheduler that remembers every call. Clones share the same log.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct RecordingScheduler {
        calls: Arc<Mutex<Vec<SchedulerCall>>>,
        fail_with: Option<SchedulerError>,
    }

    impl RecordingScheduler {
        pub fn new() -> Self {
            Self::default()
        }

        /// Records calls but rejects every `arm`.
        pub fn failing(err: SchedulerError) -> Self {
            Self {
                calls: Arc::default(),
                fail_with: Some(err),
            }
        }

        pub fn calls(&self) -> Vec<SchedulerCall> {
            self.calls.lock().map(|c| c.clone()).unwrap_or_default()
        }

        /// The instant of the most recent arm, unless a cancel came after it.
        pub fn armed(&self) -> Option<DateTime<Utc>> {
            match self.calls().last() {
                Some(SchedulerCall::Arm { at, .. }) => Some(*at),
                _ => None,
            }
        }

        fn push(&self, call: SchedulerCall) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(call);
            }
        }
    }

    impl NotificationScheduler for RecordingScheduler {
        fn arm(&self, alarm_id: Uuid, at: DateTime<Utc>) -> Result<(), SchedulerError> {
            self.push(SchedulerCall::Arm { alarm_id, at });
            match &self.fail_with {
                Some(err) => Err(err.clone()),
                None => Ok(()),
            }
        }

        fn cancel_all(&self) {
            self.push(SchedulerCall::CancelAll);
        }
    }

    /// Feedback sink that remembers every cue. Clones share the same log.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct RecordingFeedback {
        cues: Arc<Mutex<Vec<FeedbackCue>>>,
    }

    impl RecordingFeedback {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn cues(&self) -> Vec<FeedbackCue> {
            self.cues.lock().map(|c| c.clone()).unwrap_or_default()
        }
    }

    impl FeedbackSink for RecordingFeedback {
        fn cue(&self, cue: FeedbackCue) {
            if let Ok(mut cues) = self.cues.lock() {
                cues.push(cue);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{RecordingScheduler, SchedulerCall};
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn recording_scheduler_shares_log_between_clones() {
        let scheduler = RecordingScheduler::new();
        let handle = scheduler.clone();
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap();
        let id = Uuid::new_v4();

        scheduler.arm(id, at).unwrap();
        assert_eq!(handle.armed(), Some(at));

        scheduler.cancel_all();
        assert_eq!(handle.armed(), None);
        assert_eq!(
            handle.calls(),
            vec![SchedulerCall::Arm { alarm_id: id, at }, SchedulerCall::CancelAll]
        );
    }

    #[test]
    fn failing_scheduler_still_records() {
        let scheduler = RecordingScheduler::failing(SchedulerError::AuthorizationDenied);
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap();
        assert_eq!(
            scheduler.arm(Uuid::new_v4(), at),
            Err(SchedulerError::AuthorizationDenied)
        );
        assert_eq!(scheduler.calls().len(), 1);
    }

    #[test]
    fn feedback_cues_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&FeedbackCue::Snooze).unwrap(), "\"snooze\"");
    }
}
