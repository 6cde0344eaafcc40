// Snapshot module - the shared dashboard record and its lock-guarded owner
//
// One mutable snapshot holds everything the dashboard shows. Both analysis
// cycles and every status query go through DashboardState, which wraps the
// snapshot in a single mutex: writes commit under one lock acquisition and
// reads take a point-in-time copy under the same lock.
//
// The `analyzing_speech` flag doubles as the mutual-exclusion token between
// the cycles. `try_begin_speech_analysis` is the only place it flips to
// true (an atomic test-and-set under the lock); the speech commit and
// failure paths are the only places it clears.

use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::analysis::{PaceStatus, SpeechReport, ToneStatus};
use crate::error::{ErrorCode, SpeechError, StateError};
use crate::sources::{AudioState, Emotion};

// Activity strings shown in the snapshot `status` field
pub const STATUS_READY: &str = "Ready";
pub const STATUS_ACTIVE: &str = "Active";
pub const STATUS_ANALYZING_STUDENTS: &str = "Analyzing students...";
pub const STATUS_GET_READY: &str = "Get ready to speak...";
pub const STATUS_RECORDING: &str = "Recording your speech...";
pub const STATUS_SPEECH_COMPLETE: &str = "Analysis complete!";
pub const STATUS_ERROR: &str = "Error occurred";

/// Nudge shown before the first student cycle completes
pub const INITIAL_NUDGE: &str = "Click \"Analyze My Teaching\" to get started!";

/// Speech nudge shown between trigger acceptance and recording start
pub const PREPARING_NUDGE: &str = "Preparing to record...";

/// The dashboard wire record
///
/// Field names and the categorical value spellings are the compatibility
/// surface polled by the front end; they must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub engagement_score: u8,
    pub emotion: Emotion,
    pub audio_state: AudioState,
    pub teacher_pace: PaceStatus,
    pub teacher_wpm: u32,
    pub teacher_tone: ToneStatus,
    pub nudge: String,
    pub speech_nudge: String,
    pub status: String,
    /// Milliseconds since the Unix epoch of the last committed write
    pub timestamp: u64,
    pub analyzing_speech: bool,
}

impl Snapshot {
    /// Placeholder values shown until the first cycle commits
    pub fn initial() -> Self {
        Self {
            engagement_score: 50,
            emotion: Emotion::Neutral,
            audio_state: AudioState::Quiet,
            teacher_pace: PaceStatus::Unknown,
            teacher_wpm: 0,
            teacher_tone: ToneStatus::Unknown,
            nudge: INITIAL_NUDGE.to_string(),
            speech_nudge: String::new(),
            status: STATUS_READY.to_string(),
            timestamp: now_timestamp_ms(),
            analyzing_speech: false,
        }
    }
}

pub fn now_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Lock-guarded owner of the one mutable snapshot
///
/// Constructed once at startup and threaded by reference into both cycles
/// and the query handlers; there is no process-wide singleton. The mutex is
/// held only for the brief read/write sections, never across the slow
/// external observation calls.
pub struct DashboardState {
    inner: Mutex<Snapshot>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Snapshot::initial()),
        }
    }

    /// Safely acquire the snapshot lock
    ///
    /// Returns MutexGuard or StateError::LockPoisoned on lock failure
    fn lock(&self) -> Result<MutexGuard<'_, Snapshot>, StateError> {
        self.inner.lock().map_err(|_| StateError::LockPoisoned {
            component: "snapshot".to_string(),
        })
    }

    /// Point-in-time copy for status queries
    pub fn snapshot(&self) -> Result<Snapshot, StateError> {
        Ok(self.lock()?.clone())
    }

    /// Non-blocking peek at the busy flag
    pub fn is_analyzing(&self) -> Result<bool, StateError> {
        Ok(self.lock()?.analyzing_speech)
    }

    /// Update only the activity string
    pub fn set_status(&self, status: &str) -> Result<(), StateError> {
        let mut snap = self.lock()?;
        snap.status = status.to_string();
        Ok(())
    }

    /// Atomically claim speech-cycle exclusivity
    ///
    /// Returns Ok(true) when the flag was clear and is now set (the caller
    /// owns the cycle), Ok(false) when another cycle already owns it. On a
    /// claim the progress fields flip to the get-ready state in the same
    /// lock acquisition.
    pub fn try_begin_speech_analysis(&self) -> Result<bool, StateError> {
        let mut snap = self.lock()?;
        if snap.analyzing_speech {
            return Ok(false);
        }
        snap.analyzing_speech = true;
        snap.status = STATUS_GET_READY.to_string();
        snap.speech_nudge = PREPARING_NUDGE.to_string();
        Ok(true)
    }

    /// Mark the recording phase of an owned speech cycle
    pub fn begin_recording(&self, record_secs: u64) -> Result<(), StateError> {
        let mut snap = self.lock()?;
        snap.status = STATUS_RECORDING.to_string();
        snap.speech_nudge = format!(
            "Recording for {} seconds... Speak naturally!",
            record_secs
        );
        Ok(())
    }

    /// Last-known teacher metrics, read (never recomputed) by the student
    /// cycle
    pub fn teacher_metrics(&self) -> Result<(PaceStatus, ToneStatus), StateError> {
        let snap = self.lock()?;
        Ok((snap.teacher_pace, snap.teacher_tone))
    }

    /// Commit one student iteration
    ///
    /// Touches only the student-side fields; the teacher metrics persist
    /// untouched until a speech cycle replaces them.
    pub fn commit_student(
        &self,
        score: u8,
        emotion: Emotion,
        audio_state: AudioState,
        nudge: &str,
    ) -> Result<(), StateError> {
        let mut snap = self.lock()?;
        snap.engagement_score = score;
        snap.emotion = emotion;
        snap.audio_state = audio_state;
        snap.nudge = nudge.to_string();
        snap.status = STATUS_ACTIVE.to_string();
        snap.timestamp = now_timestamp_ms();
        Ok(())
    }

    /// Terminal commit of a successful speech cycle
    ///
    /// Writes the teacher metrics and clears the busy flag in one lock
    /// acquisition.
    pub fn commit_speech(&self, report: &SpeechReport) -> Result<(), StateError> {
        let mut snap = self.lock()?;
        snap.teacher_pace = report.pace.status;
        snap.teacher_wpm = report.pace.wpm;
        snap.teacher_tone = report.tone.status;
        snap.speech_nudge = report.nudge.clone();
        snap.status = STATUS_SPEECH_COMPLETE.to_string();
        snap.analyzing_speech = false;
        snap.timestamp = now_timestamp_ms();
        Ok(())
    }

    /// Terminal commit of a failed speech cycle
    ///
    /// Degrades the teacher metrics to unknown instead of leaving stale
    /// values next to an error message, and clears the busy flag so the
    /// next trigger can proceed.
    pub fn fail_speech(&self, err: &SpeechError) -> Result<(), StateError> {
        let mut snap = self.lock()?;
        snap.teacher_pace = PaceStatus::Unknown;
        snap.teacher_wpm = 0;
        snap.teacher_tone = ToneStatus::Unknown;
        snap.speech_nudge = format!("Error analyzing speech: {}", err.message());
        snap.status = STATUS_ERROR.to_string();
        snap.analyzing_speech = false;
        snap.timestamp = now_timestamp_ms();
        Ok(())
    }
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{PaceReport, ToneReport};

    fn speech_report() -> SpeechReport {
        SpeechReport {
            pace: PaceReport {
                status: PaceStatus::Good,
                wpm: 140,
                word_count: 140,
            },
            tone: ToneReport {
                status: ToneStatus::Engaging,
                energy: 0.08,
                energy_status: crate::analysis::EnergyStatus::Good,
                pitch_variation: 0.2,
                monotone: false,
            },
            nudge: "Great speech pace and tone! Keep it up!".to_string(),
        }
    }

    #[test]
    fn initial_snapshot_defaults() {
        let snap = Snapshot::initial();
        assert_eq!(snap.engagement_score, 50);
        assert_eq!(snap.teacher_pace, PaceStatus::Unknown);
        assert_eq!(snap.status, STATUS_READY);
        assert!(!snap.analyzing_speech);
    }

    #[test]
    fn test_and_set_claims_once() {
        let state = DashboardState::new();
        assert!(state.try_begin_speech_analysis().unwrap());
        // Second claim while owned is refused
        assert!(!state.try_begin_speech_analysis().unwrap());

        let snap = state.snapshot().unwrap();
        assert!(snap.analyzing_speech);
        assert_eq!(snap.status, STATUS_GET_READY);
        assert_eq!(snap.speech_nudge, PREPARING_NUDGE);
    }

    #[test]
    fn speech_commit_clears_flag_and_writes_metrics() {
        let state = DashboardState::new();
        assert!(state.try_begin_speech_analysis().unwrap());
        state.commit_speech(&speech_report()).unwrap();

        let snap = state.snapshot().unwrap();
        assert!(!snap.analyzing_speech);
        assert_eq!(snap.teacher_pace, PaceStatus::Good);
        assert_eq!(snap.teacher_wpm, 140);
        assert_eq!(snap.teacher_tone, ToneStatus::Engaging);
        assert_eq!(snap.status, STATUS_SPEECH_COMPLETE);

        // The flag is free again for the next trigger
        assert!(state.try_begin_speech_analysis().unwrap());
    }

    #[test]
    fn speech_failure_clears_flag_and_degrades_metrics() {
        let state = DashboardState::new();
        state.commit_speech(&speech_report()).unwrap();
        assert!(state.try_begin_speech_analysis().unwrap());

        let err = SpeechError::CaptureFailed {
            reason: "no device".to_string(),
        };
        state.fail_speech(&err).unwrap();

        let snap = state.snapshot().unwrap();
        assert!(!snap.analyzing_speech);
        assert_eq!(snap.teacher_pace, PaceStatus::Unknown);
        assert_eq!(snap.teacher_wpm, 0);
        assert_eq!(snap.teacher_tone, ToneStatus::Unknown);
        assert_eq!(snap.status, STATUS_ERROR);
        assert!(snap.speech_nudge.contains("no device"));
    }

    #[test]
    fn student_commit_leaves_teacher_fields_untouched() {
        let state = DashboardState::new();
        state.commit_speech(&speech_report()).unwrap();

        state
            .commit_student(75, Emotion::Happy, AudioState::Active, "All good!")
            .unwrap();

        let snap = state.snapshot().unwrap();
        assert_eq!(snap.engagement_score, 75);
        assert_eq!(snap.emotion, Emotion::Happy);
        assert_eq!(snap.teacher_pace, PaceStatus::Good);
        assert_eq!(snap.teacher_wpm, 140);
        assert_eq!(snap.teacher_tone, ToneStatus::Engaging);
    }

    #[test]
    fn wire_field_names() {
        let json = serde_json::to_value(Snapshot::initial()).unwrap();
        for field in [
            "engagement_score",
            "emotion",
            "audio_state",
            "teacher_pace",
            "teacher_wpm",
            "teacher_tone",
            "nudge",
            "speech_nudge",
            "status",
            "timestamp",
            "analyzing_speech",
        ] {
            assert!(json.get(field).is_some(), "missing wire field {}", field);
        }
        assert_eq!(json["emotion"], "neutral");
        assert_eq!(json["teacher_pace"], "unknown");
        assert_eq!(json["audio_state"], "quiet");
    }
}
