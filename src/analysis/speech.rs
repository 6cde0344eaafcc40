// Speech pipeline - record, transcribe, extract, classify
//
// Runs one teacher-speech analysis end to end: capture a clip, transcribe
// it for the pace classifier, extract energy/pitch profiles for the tone
// classifier, and build the coaching nudge.
//
// Failure policy: a capture failure aborts the run and surfaces as an
// error (the cycle commits degraded fields for it); everything after
// capture folds into the report instead - transcription failures become
// unclear/error pace states and extraction failures become an unknown tone
// state. The pipeline itself never panics past this boundary.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::analysis::features::FeatureExtractor;
use crate::analysis::nudge::speech_nudge;
use crate::analysis::pace::{PaceClassifier, PaceReport};
use crate::analysis::tone::{ToneClassifier, ToneReport};
use crate::config::AnalysisConfig;
use crate::error::{log_speech_error, SpeechError};
use crate::sources::{AudioClip, SpeechRecorder, Transcriber};

/// Combined result of one speech analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechReport {
    pub pace: PaceReport,
    pub tone: ToneReport,
    pub nudge: String,
}

/// One-shot speech analysis pipeline
pub struct SpeechPipeline {
    recorder: Arc<dyn SpeechRecorder>,
    transcriber: Arc<dyn Transcriber>,
    pace: PaceClassifier,
    tone: ToneClassifier,
}

impl SpeechPipeline {
    pub fn new(
        recorder: Arc<dyn SpeechRecorder>,
        transcriber: Arc<dyn Transcriber>,
        config: AnalysisConfig,
    ) -> Self {
        Self {
            recorder,
            transcriber,
            pace: PaceClassifier::new(config.pace),
            tone: ToneClassifier::new(config.tone),
        }
    }

    /// Record for `duration` and analyze the captured clip
    ///
    /// Blocks for the recording length plus transcription latency; callers
    /// run it off the async runtime.
    pub fn analyze(&self, duration: Duration) -> Result<SpeechReport, SpeechError> {
        let clip = self.recorder.record(duration)?;
        info!(
            "[SpeechPipeline] Captured {:.2} min of audio at {} Hz",
            clip.duration_minutes(),
            clip.sample_rate
        );

        let pace = self.analyze_pace(&clip);
        let tone = self.analyze_tone(&clip);
        let nudge = speech_nudge(&pace, &tone);

        info!(
            "[SpeechPipeline] Pace {:?} ({} WPM), tone {:?}, energy {:.4}",
            pace.status, pace.wpm, tone.status, tone.energy
        );

        Ok(SpeechReport { pace, tone, nudge })
    }

    /// Transcribe and classify speaking rate
    ///
    /// Transcription failures map to the categorical unclear/error states
    /// rather than propagating.
    fn analyze_pace(&self, clip: &AudioClip) -> PaceReport {
        match self.transcriber.transcribe(clip) {
            Ok(transcript) => {
                info!(
                    "[SpeechPipeline] Transcribed {} words",
                    transcript.split_whitespace().count()
                );
                self.pace
                    .classify_transcript(&transcript, clip.duration_minutes())
            }
            Err(SpeechError::Unintelligible) => {
                warn!("[SpeechPipeline] Speech unintelligible, pace unclear");
                PaceReport::unclear()
            }
            Err(err) => {
                log_speech_error(&err, "analyze_pace");
                PaceReport::service_error()
            }
        }
    }

    /// Extract features and classify tone
    ///
    /// Any extraction failure degrades to the unknown tone report.
    fn analyze_tone(&self, clip: &AudioClip) -> ToneReport {
        match self.extract_profiles(clip) {
            Ok((energies, pitches)) => self.tone.classify(&energies, &pitches),
            Err(err) => {
                log_speech_error(&err, "analyze_tone");
                ToneReport::unknown()
            }
        }
    }

    fn extract_profiles(&self, clip: &AudioClip) -> Result<(Vec<f32>, Vec<f32>), SpeechError> {
        if clip.samples.is_empty() || clip.sample_rate == 0 {
            return Err(SpeechError::FeatureExtraction {
                reason: "empty clip".to_string(),
            });
        }
        let extractor = FeatureExtractor::new(clip.sample_rate);
        Ok((
            extractor.energy_profile(&clip.samples),
            extractor.pitch_profile(&clip.samples),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pace::PaceStatus;
    use crate::analysis::tone::ToneStatus;
    use crate::config::AnalysisConfig;
    use crate::testing::{
        sine_clip, words, ScriptedRecorder, ScriptedTranscriber,
    };

    fn make_pipeline(
        recorder: ScriptedRecorder,
        transcriber: ScriptedTranscriber,
    ) -> SpeechPipeline {
        SpeechPipeline::new(
            Arc::new(recorder),
            Arc::new(transcriber),
            AnalysisConfig::default(),
        )
    }

    #[test]
    fn fast_speech_over_a_pure_tone() {
        // 1.5 minutes of pure tone, 300 transcribed words -> 200 wpm
        let clip = sine_clip(220.0, 90.0, 8_000, 0.1);
        let pipeline = make_pipeline(
            ScriptedRecorder::immediate(clip),
            ScriptedTranscriber::fixed(&words(300)),
        );
        let report = pipeline.analyze(Duration::from_secs(10)).unwrap();

        assert_eq!(report.pace.status, PaceStatus::TooFast);
        assert_eq!(report.pace.wpm, 200);
        assert!(report.nudge.contains("too fast"));
        assert!(report.nudge.contains("200"));
        // A pure tone never varies pitch, so the tone reads monotone
        assert_eq!(report.tone.status, ToneStatus::Monotone);
    }

    #[test]
    fn unintelligible_speech_reports_unclear_pace() {
        let clip = sine_clip(220.0, 10.0, 8_000, 0.1);
        let pipeline = make_pipeline(
            ScriptedRecorder::immediate(clip),
            ScriptedTranscriber::failing(SpeechError::Unintelligible),
        );
        let report = pipeline.analyze(Duration::from_secs(10)).unwrap();

        assert_eq!(report.pace.status, PaceStatus::Unclear);
        assert_eq!(report.pace.wpm, 0);
        assert!(report.nudge.contains("microphone"));
    }

    #[test]
    fn service_failure_reports_error_pace() {
        let clip = sine_clip(220.0, 10.0, 8_000, 0.1);
        let pipeline = make_pipeline(
            ScriptedRecorder::immediate(clip),
            ScriptedTranscriber::failing(SpeechError::ServiceUnavailable {
                reason: "timeout".to_string(),
            }),
        );
        let report = pipeline.analyze(Duration::from_secs(10)).unwrap();
        assert_eq!(report.pace.status, PaceStatus::Error);
        assert_eq!(report.pace.wpm, 0);
    }

    #[test]
    fn empty_clip_degrades_tone_to_unknown() {
        let pipeline = make_pipeline(
            ScriptedRecorder::immediate(AudioClip::new(Vec::new(), 16_000)),
            ScriptedTranscriber::fixed(&words(140)),
        );
        let report = pipeline.analyze(Duration::from_secs(10)).unwrap();
        assert_eq!(report.tone, ToneReport::unknown());
        // Zero-length clip also means zero duration, so wpm is zero
        assert_eq!(report.pace.wpm, 0);
    }

    #[test]
    fn capture_failure_propagates() {
        let pipeline = make_pipeline(
            ScriptedRecorder::failing(SpeechError::CaptureFailed {
                reason: "no input device".to_string(),
            }),
            ScriptedTranscriber::fixed("hello"),
        );
        let result = pipeline.analyze(Duration::from_secs(10));
        assert!(matches!(result, Err(SpeechError::CaptureFailed { .. })));
    }
}
