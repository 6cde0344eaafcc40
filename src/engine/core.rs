//! PulseEngine: scheduler for the two analysis cycles.
//!
//! Two logical cycles share one snapshot. The student cycle runs forever
//! at a fixed cadence and skips any iteration that finds the busy flag
//! set; the speech cycle is triggered per request, wins exclusivity
//! through an atomic test-and-set, and always reaches a terminal commit
//! that clears the flag. The flag test-and-set is the sole arbitration
//! point; neither cycle ever holds the lock across a slow external call.

use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::analysis::{EngagementScorer, SpeechPipeline};
use crate::config::AppConfig;
use crate::error::{log_speech_error, log_state_error, ErrorCode, SpeechError, StateError};
use crate::snapshot::{DashboardState, Snapshot, STATUS_ANALYZING_STUDENTS};
use crate::sources::{
    AmbientAudioSource, AudioState, Emotion, EmotionSource, SpeechRecorder, Transcriber,
};

/// PulseEngine orchestrates the analysis cycles over the shared snapshot
pub struct PulseEngine {
    config: AppConfig,
    state: Arc<DashboardState>,
    emotion: Arc<dyn EmotionSource>,
    ambient: Arc<dyn AmbientAudioSource>,
    speech: Arc<SpeechPipeline>,
    scorer: EngagementScorer,
    started_at: Instant,
}

impl PulseEngine {
    pub fn new(
        config: AppConfig,
        emotion: Arc<dyn EmotionSource>,
        ambient: Arc<dyn AmbientAudioSource>,
        recorder: Arc<dyn SpeechRecorder>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        let speech = Arc::new(SpeechPipeline::new(
            recorder,
            transcriber,
            config.analysis.clone(),
        ));
        Self {
            config,
            state: Arc::new(DashboardState::new()),
            emotion,
            ambient,
            speech,
            scorer: EngagementScorer,
            started_at: Instant::now(),
        }
    }

    /// Shared handle to the dashboard state
    pub fn state(&self) -> Arc<DashboardState> {
        Arc::clone(&self.state)
    }

    /// Point-in-time snapshot copy for the query surface
    pub fn snapshot(&self) -> Result<Snapshot, StateError> {
        self.state.snapshot()
    }

    pub fn uptime_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }

    // ========================================================================
    // STUDENT CYCLE
    // ========================================================================

    /// Spawn the continuous student cycle
    ///
    /// The task sleeps through the configured startup delay, then loops
    /// forever: one iteration, one idle interval.
    pub fn spawn_student_cycle(self: &Arc<Self>) -> JoinHandle<()> {
        let engine = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(engine.config.student.startup_delay()).await;
            let mut cycle: u64 = 0;
            loop {
                cycle += 1;
                if let Err(err) = engine.run_student_iteration(cycle).await {
                    log_state_error(&err, "student_cycle");
                }
                tokio::time::sleep(engine.config.student.idle_interval()).await;
            }
        })
    }

    /// Run one student iteration
    ///
    /// Returns Ok(false) when the iteration was skipped because a speech
    /// cycle owns the snapshot. The skip is a non-blocking peek; the next
    /// tick retries.
    pub async fn run_student_iteration(&self, cycle: u64) -> Result<bool, StateError> {
        if self.state.is_analyzing()? {
            info!(
                "[StudentCycle] Cycle {} skipped: speech analysis in progress",
                cycle
            );
            return Ok(false);
        }

        info!("[StudentCycle] Cycle {} started", cycle);
        self.state.set_status(STATUS_ANALYZING_STUDENTS)?;

        // Both observations block for seconds; run them off the runtime
        // and outside the lock.
        let emotion_source = Arc::clone(&self.emotion);
        let emotion = tokio::task::spawn_blocking(move || emotion_source.sample_emotion())
            .await
            .unwrap_or_else(|err| {
                warn!("[StudentCycle] Emotion sampling panicked: {}", err);
                Emotion::Neutral
            });

        let ambient_source = Arc::clone(&self.ambient);
        let window = self.config.student.audio_sample();
        let (audio_state, audio_message) =
            tokio::task::spawn_blocking(move || ambient_source.sample_audio(window))
                .await
                .unwrap_or_else(|err| {
                    warn!("[StudentCycle] Ambient sampling panicked: {}", err);
                    (AudioState::Quiet, String::new())
                });

        // Teacher metrics are read, never recomputed, by this cycle.
        let (pace, tone) = self.state.teacher_metrics()?;

        let score = self.scorer.score(emotion, audio_state, pace, tone);
        let nudge = EngagementScorer::main_nudge(score);
        self.state
            .commit_student(score, emotion, audio_state, nudge)?;

        info!(
            "[StudentCycle] Cycle {} committed: score={}, emotion={:?}, audio={:?} ({})",
            cycle, score, emotion, audio_state, audio_message
        );
        Ok(true)
    }

    // ========================================================================
    // SPEECH CYCLE
    // ========================================================================

    /// Test-and-set trigger for the on-demand speech cycle
    ///
    /// Returns immediately: Ok means the request was accepted and the
    /// cycle continues asynchronously; `AlreadyAnalyzing` means another
    /// cycle owns the flag and nothing was started.
    pub fn trigger_speech_analysis(self: &Arc<Self>) -> Result<(), SpeechError> {
        match self.state.try_begin_speech_analysis() {
            Ok(true) => {}
            Ok(false) => {
                let err = SpeechError::AlreadyAnalyzing;
                log_speech_error(&err, "trigger_speech_analysis");
                return Err(err);
            }
            Err(state_err) => {
                log_state_error(&state_err, "trigger_speech_analysis");
                return Err(SpeechError::Unknown {
                    detail: state_err.message(),
                });
            }
        }

        let engine = Arc::clone(self);
        tokio::spawn(async move {
            engine.run_speech_cycle().await;
        });
        Ok(())
    }

    /// Run an accepted speech cycle to completion
    ///
    /// Every path through here ends in a terminal commit that clears the
    /// busy flag; a panic inside the blocking pipeline surfaces as a join
    /// error and takes the failure path.
    async fn run_speech_cycle(&self) {
        info!("[SpeechCycle] Teacher speech analysis started");

        let record_secs = self.config.speech.record_secs;
        if let Err(err) = self.state.begin_recording(record_secs) {
            log_state_error(&err, "run_speech_cycle");
        }

        tokio::time::sleep(self.config.speech.countdown()).await;

        let pipeline = Arc::clone(&self.speech);
        let duration = self.config.speech.record_duration();
        let outcome = tokio::task::spawn_blocking(move || pipeline.analyze(duration)).await;

        let committed = match outcome {
            Ok(Ok(report)) => {
                info!(
                    "[SpeechCycle] Analysis complete: pace {:?} ({} WPM), tone {:?}",
                    report.pace.status, report.pace.wpm, report.tone.status
                );
                self.state.commit_speech(&report)
            }
            Ok(Err(err)) => {
                log_speech_error(&err, "run_speech_cycle");
                self.state.fail_speech(&err)
            }
            Err(join_err) => {
                let err = SpeechError::Unknown {
                    detail: join_err.to_string(),
                };
                log_speech_error(&err, "run_speech_cycle");
                self.state.fail_speech(&err)
            }
        };

        if let Err(err) = committed {
            log_state_error(&err, "run_speech_cycle");
        }
    }
}
