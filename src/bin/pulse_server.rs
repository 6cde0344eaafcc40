use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use classroom_pulse::config::AppConfig;
use classroom_pulse::engine::PulseEngine;
use classroom_pulse::http::{run_http_server, AppState};
use classroom_pulse::sources::microphone::{MicrophoneAmbientSource, MicrophoneRecorder};
use classroom_pulse::sources::remote::{HttpEmotionSource, HttpTranscriber};
use classroom_pulse::sources::simulated::{
    SimulatedAmbientSource, SimulatedEmotionSource, SimulatedRecorder, SimulatedTranscriber,
};
use classroom_pulse::sources::{AmbientAudioSource, EmotionSource, SpeechRecorder, Transcriber};

#[derive(Parser, Debug)]
#[command(
    name = "pulse_server",
    about = "Classroom engagement dashboard server"
)]
struct Cli {
    /// Address to serve the dashboard API on
    #[arg(long, default_value = "127.0.0.1:5000")]
    addr: SocketAddr,
    /// Override path to the JSON config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Use simulated sources instead of camera/microphone hardware
    #[arg(long)]
    simulate: bool,
    /// Transcription service endpoint
    #[arg(long)]
    transcriber_url: Option<String>,
    /// Emotion sidecar endpoint
    #[arg(long)]
    emotion_url: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };

    // The HTTP collaborator clients are blocking; build them before the
    // runtime starts.
    let (emotion, ambient, recorder, transcriber) = build_sources(&cli, &config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async move {
        let engine = Arc::new(PulseEngine::new(
            config,
            emotion,
            ambient,
            recorder,
            transcriber,
        ));
        let _student_cycle = engine.spawn_student_cycle();

        tracing::info!("[Server] Dashboard listening on {}", cli.addr);
        run_http_server(AppState::new(engine), cli.addr).await
    })
}

type Sources = (
    Arc<dyn EmotionSource>,
    Arc<dyn AmbientAudioSource>,
    Arc<dyn SpeechRecorder>,
    Arc<dyn Transcriber>,
);

fn build_sources(cli: &Cli, config: &AppConfig) -> Result<Sources> {
    let emotion_window = Duration::from_secs(config.student.emotion_window_secs);

    if cli.simulate {
        tracing::info!("[Server] Running with simulated sources");
        return Ok((
            Arc::new(SimulatedEmotionSource::new(emotion_window)),
            Arc::new(SimulatedAmbientSource),
            Arc::new(SimulatedRecorder::new(config.speech.sample_rate)),
            Arc::new(SimulatedTranscriber::new()),
        ));
    }

    let emotion: Arc<dyn EmotionSource> = match &cli.emotion_url {
        Some(url) => Arc::new(HttpEmotionSource::new(url.clone()).context("building emotion client")?),
        None => {
            tracing::warn!("[Server] No emotion endpoint configured, simulating emotions");
            Arc::new(SimulatedEmotionSource::new(emotion_window))
        }
    };

    let transcriber: Arc<dyn Transcriber> = match &cli.transcriber_url {
        Some(url) => {
            Arc::new(HttpTranscriber::new(url.clone()).context("building transcription client")?)
        }
        None => {
            tracing::warn!(
                "[Server] No transcription endpoint configured, simulating transcripts"
            );
            Arc::new(SimulatedTranscriber::new())
        }
    };

    Ok((
        emotion,
        Arc::new(MicrophoneAmbientSource::new()),
        Arc::new(MicrophoneRecorder::new()),
        transcriber,
    ))
}
