// Speech nudge generator - coaching text from pace and tone reports
//
// Pure function of the two classifier outputs. Messages are appended in a
// fixed priority order (pace, then monotone, then energy extremes) and
// joined with a fixed separator, so identical reports always produce the
// identical nudge string.

use crate::analysis::pace::{PaceReport, PaceStatus};
use crate::analysis::tone::{EnergyStatus, ToneReport};

/// Separator between concatenated advisory messages
pub const NUDGE_SEPARATOR: &str = " | ";

/// Returned when no advisory applies
pub const ALL_GOOD_SPEECH_NUDGE: &str = "Great speech pace and tone! Keep it up!";

/// Build the teacher-facing coaching nudge for one speech analysis
pub fn speech_nudge(pace: &PaceReport, tone: &ToneReport) -> String {
    let mut nudges: Vec<String> = Vec::new();

    match pace.status {
        PaceStatus::TooFast => nudges.push(format!(
            "You're speaking too fast ({} WPM). Slow down to help students absorb the material.",
            pace.wpm
        )),
        PaceStatus::Fast => nudges.push(format!(
            "Speaking a bit quickly ({} WPM). Consider slowing down slightly.",
            pace.wpm
        )),
        PaceStatus::TooSlow => nudges.push(format!(
            "Speaking quite slowly ({} WPM). You can speed up a bit to maintain engagement.",
            pace.wpm
        )),
        PaceStatus::Slow => nudges.push(format!(
            "Pace is a bit slow ({} WPM). Try adding more energy.",
            pace.wpm
        )),
        PaceStatus::Unclear => nudges.push(
            "Could not analyze speech - please speak more clearly or check your microphone."
                .to_string(),
        ),
        PaceStatus::Good | PaceStatus::Error | PaceStatus::Unknown => {}
    }

    if tone.monotone {
        nudges.push(
            "Your tone sounds monotonous. Try varying your pitch and enthusiasm!".to_string(),
        );
    }

    match tone.energy_status {
        EnergyStatus::TooQuiet => nudges.push(
            "You're speaking too quietly. Increase your volume or check your microphone."
                .to_string(),
        ),
        EnergyStatus::TooLoud => {
            nudges.push("Volume is quite high. Lower it slightly for comfort.".to_string())
        }
        EnergyStatus::Quiet | EnergyStatus::Good | EnergyStatus::Unknown => {}
    }

    if nudges.is_empty() {
        ALL_GOOD_SPEECH_NUDGE.to_string()
    } else {
        nudges.join(NUDGE_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pace::PaceClassifier;
    use crate::analysis::tone::ToneClassifier;

    #[test]
    fn too_fast_nudge_embeds_wpm() {
        // 300 words over 1.5 minutes = 200 wpm
        let pace = PaceClassifier::default().classify(300, 1.5);
        let tone = ToneClassifier::default().classify(&[0.1], &[150.0, 250.0]);
        let nudge = speech_nudge(&pace, &tone);
        assert!(nudge.contains("too fast"));
        assert!(nudge.contains("200"));
    }

    #[test]
    fn monotone_quiet_yields_only_monotone_message() {
        // variation 0.05 -> monotone; energy 0.03 -> quiet (not too quiet)
        let pace = PaceClassifier::default().classify(140, 1.0);
        let tone = ToneClassifier::default().classify(&[0.03], &[190.0, 210.0]);
        let nudge = speech_nudge(&pace, &tone);
        assert!(nudge.contains("monotonous"));
        assert!(!nudge.contains("quietly"));
        assert!(!nudge.contains(NUDGE_SEPARATOR));
    }

    #[test]
    fn all_good_fallback() {
        let pace = PaceClassifier::default().classify(140, 1.0);
        let tone = ToneClassifier::default().classify(&[0.1], &[150.0, 250.0]);
        assert_eq!(speech_nudge(&pace, &tone), ALL_GOOD_SPEECH_NUDGE);
    }

    #[test]
    fn messages_join_in_priority_order() {
        // too fast + monotone + too quiet, all at once
        let pace = PaceClassifier::default().classify(200, 1.0);
        let tone = ToneClassifier::default().classify(&[0.01], &[200.0; 4]);
        let nudge = speech_nudge(&pace, &tone);

        let parts: Vec<&str> = nudge.split(NUDGE_SEPARATOR).collect();
        assert_eq!(parts.len(), 3);
        assert!(parts[0].contains("too fast"));
        assert!(parts[1].contains("monotonous"));
        assert!(parts[2].contains("too quietly"));
    }

    #[test]
    fn unclear_yields_microphone_check() {
        let pace = crate::analysis::pace::PaceReport::unclear();
        let tone = crate::analysis::tone::ToneReport::unknown();
        let nudge = speech_nudge(&pace, &tone);
        assert!(nudge.contains("microphone"));
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        let pace = PaceClassifier::default().classify(90, 1.0);
        let tone = ToneClassifier::default().classify(&[0.2], &[200.0; 4]);
        assert_eq!(speech_nudge(&pace, &tone), speech_nudge(&pace, &tone));
    }
}
