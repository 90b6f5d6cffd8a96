use snoozetax_core::notify::{FeedbackCue, FeedbackSink};
use snoozetax_core::storage::FeedbackConfig;

/// Terminal feedback: rings the bell on stderr when the alarm goes off.
#[derive(Debug, Clone, Copy)]
pub struct TerminalFeedback {
    enabled: bool,
    bell: bool,
}

impl TerminalFeedback {
    pub fn new(config: &FeedbackConfig) -> Self {
        Self {
            enabled: config.enabled,
            bell: config.bell,
        }
    }

    fn rings_bell(&self, cue: FeedbackCue) -> bool {
        self.enabled && self.bell && cue == FeedbackCue::Ring
    }
}

impl FeedbackSink for TerminalFeedback {
    fn cue(&self, cue: FeedbackCue) {
        if !self.enabled {
            return;
        }
        tracing::debug!(?cue, "feedback");
        if self.rings_bell(cue) {
            eprint!("\x07");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bell_only_on_ring() {
        let feedback = TerminalFeedback::new(&FeedbackConfig::default());
        assert!(feedback.rings_bell(FeedbackCue::Ring));
        assert!(!feedback.rings_bell(FeedbackCue::Snooze));
        assert!(!feedback.rings_bell(FeedbackCue::Charge));
    }

    #[test]
    fn disabled_feedback_is_silent() {
        let feedback = TerminalFeedback::new(&FeedbackConfig {
            enabled: false,
            bell: true,
        });
        assert!(!feedback.rings_bell(FeedbackCue::Ring));
    }
}
