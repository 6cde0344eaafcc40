// Engagement scorer - fuses student and teacher signals into one score
//
// Starts from a neutral base and applies fixed adjustments per signal, then
// clamps into 0-100. Teacher pace/tone are whatever the last speech cycle
// left behind; `unknown` values contribute nothing, so the score degrades
// gracefully when speech was never analyzed.

use crate::analysis::pace::PaceStatus;
use crate::analysis::tone::ToneStatus;
use crate::sources::{AudioState, Emotion};

/// Warning shown below the low-engagement threshold
pub const LOW_ENGAGEMENT_NUDGE: &str =
    "Low engagement! Try asking a question or showing an example.";

/// Caution shown below the dropping threshold
pub const DROPPING_NUDGE: &str = "Engagement dropping. Consider a quick activity or recap.";

/// Affirmation shown otherwise
pub const ALL_GOOD_NUDGE: &str = "All good! Keep going.";

/// Scorer applying the fixed fusion rules
pub struct EngagementScorer;

impl EngagementScorer {
    /// Neutral starting score
    pub const BASE_SCORE: i32 = 50;

    /// Fuse the four signals into a clamped 0-100 score
    pub fn score(
        &self,
        emotion: Emotion,
        audio_state: AudioState,
        pace: PaceStatus,
        tone: ToneStatus,
    ) -> u8 {
        let mut score = Self::BASE_SCORE;

        score += match emotion {
            Emotion::Happy | Emotion::Neutral | Emotion::Surprise => 20,
            Emotion::Sad | Emotion::Angry | Emotion::Fear => -20,
            Emotion::Disgust | Emotion::Unknown => 0,
        };

        score += match audio_state {
            AudioState::Silent => -20,
            AudioState::Active => 10,
            AudioState::Quiet => 0,
        };

        score += match pace {
            PaceStatus::TooFast => -15,
            PaceStatus::TooSlow => -10,
            PaceStatus::Good => 5,
            _ => 0,
        };

        score += match tone {
            ToneStatus::Monotone => -15,
            ToneStatus::Engaging => 10,
            ToneStatus::Unknown => 0,
        };

        score.clamp(0, 100) as u8
    }

    /// Select the one student-facing nudge for a score
    pub fn main_nudge(score: u8) -> &'static str {
        if score < 40 {
            LOW_ENGAGEMENT_NUDGE
        } else if score < 60 {
            DROPPING_NUDGE
        } else {
            ALL_GOOD_NUDGE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_EMOTIONS: [Emotion; 8] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fear,
        Emotion::Surprise,
        Emotion::Neutral,
        Emotion::Disgust,
        Emotion::Unknown,
    ];

    const ALL_AUDIO: [AudioState; 3] = [AudioState::Silent, AudioState::Quiet, AudioState::Active];

    const ALL_PACE: [PaceStatus; 8] = [
        PaceStatus::TooFast,
        PaceStatus::Fast,
        PaceStatus::Good,
        PaceStatus::Slow,
        PaceStatus::TooSlow,
        PaceStatus::Unclear,
        PaceStatus::Error,
        PaceStatus::Unknown,
    ];

    const ALL_TONE: [ToneStatus; 3] = [
        ToneStatus::Monotone,
        ToneStatus::Engaging,
        ToneStatus::Unknown,
    ];

    #[test]
    fn best_case_scores_95() {
        let score = EngagementScorer.score(
            Emotion::Happy,
            AudioState::Active,
            PaceStatus::Good,
            ToneStatus::Engaging,
        );
        assert_eq!(score, 95);
        assert_eq!(EngagementScorer::main_nudge(score), ALL_GOOD_NUDGE);
    }

    #[test]
    fn worst_case_clamps_to_zero() {
        // 50 - 20 - 20 - 15 - 15 = -20, clamped to 0
        let score = EngagementScorer.score(
            Emotion::Angry,
            AudioState::Silent,
            PaceStatus::TooFast,
            ToneStatus::Monotone,
        );
        assert_eq!(score, 0);
        assert_eq!(EngagementScorer::main_nudge(score), LOW_ENGAGEMENT_NUDGE);
    }

    #[test]
    fn unknown_teacher_metrics_contribute_nothing() {
        let score = EngagementScorer.score(
            Emotion::Neutral,
            AudioState::Quiet,
            PaceStatus::Unknown,
            ToneStatus::Unknown,
        );
        assert_eq!(score, 70);
    }

    #[test]
    fn score_is_always_clamped() {
        for emotion in ALL_EMOTIONS {
            for audio in ALL_AUDIO {
                for pace in ALL_PACE {
                    for tone in ALL_TONE {
                        let score = EngagementScorer.score(emotion, audio, pace, tone);
                        assert!(score <= 100);
                    }
                }
            }
        }
    }

    #[test]
    fn nudge_thresholds() {
        assert_eq!(EngagementScorer::main_nudge(0), LOW_ENGAGEMENT_NUDGE);
        assert_eq!(EngagementScorer::main_nudge(39), LOW_ENGAGEMENT_NUDGE);
        assert_eq!(EngagementScorer::main_nudge(40), DROPPING_NUDGE);
        assert_eq!(EngagementScorer::main_nudge(59), DROPPING_NUDGE);
        assert_eq!(EngagementScorer::main_nudge(60), ALL_GOOD_NUDGE);
        assert_eq!(EngagementScorer::main_nudge(100), ALL_GOOD_NUDGE);
    }
}
