// Analysis module - classification core for the engagement dashboard
//
// This module turns raw measurements into the categorical states and
// coaching text the dashboard shows.
//
// Pipeline: features (energy/pitch) -> pace + tone classifiers -> speech
// nudge, with the engagement scorer fusing the student channels against
// the last-known teacher metrics.

pub mod features;
pub mod nudge;
pub mod pace;
pub mod scoring;
pub mod speech;
pub mod tone;

pub use nudge::{speech_nudge, ALL_GOOD_SPEECH_NUDGE, NUDGE_SEPARATOR};
pub use pace::{PaceClassifier, PaceReport, PaceStatus};
pub use scoring::EngagementScorer;
pub use speech::{SpeechPipeline, SpeechReport};
pub use tone::{EnergyStatus, ToneClassifier, ToneReport, ToneStatus};
