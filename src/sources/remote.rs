// HTTP collaborators: cloud transcription and the emotion sidecar
//
// The transcriber uploads the clip as an in-memory WAV (16-bit mono) via
// multipart form, matching the common speech-to-text upload contract. The
// emotion client polls a sidecar serving the vision model. Both run inside
// the cycles' blocking sections, so the blocking reqwest client fits.

use std::io::Cursor;
use std::time::Duration;

use hound::{SampleFormat, WavSpec, WavWriter};
use reqwest::blocking::{multipart, Client};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::SpeechError;
use crate::sources::{AudioClip, Emotion, EmotionSource, Transcriber};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

fn http_client() -> Result<Client, SpeechError> {
    Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| SpeechError::ServiceUnavailable {
            reason: format!("Failed to build HTTP client: {}", e),
        })
}

/// Encode a clip as 16-bit mono WAV bytes
fn clip_to_wav(clip: &AudioClip) -> Result<Vec<u8>, SpeechError> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut buffer, spec).map_err(|e| SpeechError::FeatureExtraction {
                reason: format!("Failed to create WAV writer: {}", e),
            })?;

        for &sample in &clip.samples {
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| SpeechError::FeatureExtraction {
                    reason: format!("Failed to write sample: {}", e),
                })?;
        }

        writer
            .finalize()
            .map_err(|e| SpeechError::FeatureExtraction {
                reason: format!("Failed to finalize WAV: {}", e),
            })?;
    }

    Ok(buffer.into_inner())
}

/// Speech-to-text over an HTTP transcription endpoint
pub struct HttpTranscriber {
    endpoint: String,
    client: Client,
}

impl HttpTranscriber {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SpeechError> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: http_client()?,
        })
    }
}

impl Transcriber for HttpTranscriber {
    fn transcribe(&self, clip: &AudioClip) -> Result<String, SpeechError> {
        if clip.samples.is_empty() {
            return Err(SpeechError::Unintelligible);
        }

        let wav_data = clip_to_wav(clip)?;
        debug!(
            "[Transcriber] Uploading {} bytes of WAV to {}",
            wav_data.len(),
            self.endpoint
        );

        let audio_part = multipart::Part::bytes(wav_data)
            .file_name("speech.wav")
            .mime_str("audio/wav")
            .map_err(|e| SpeechError::ServiceUnavailable {
                reason: format!("Failed to build audio part: {}", e),
            })?;
        let form = multipart::Form::new()
            .part("file", audio_part)
            .text("response_format", "text");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| SpeechError::ServiceUnavailable {
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SpeechError::ServiceUnavailable {
                reason: format!("status {}: {}", status, body),
            });
        }

        let transcript = response
            .text()
            .map_err(|e| SpeechError::ServiceUnavailable {
                reason: format!("Failed to read transcription response: {}", e),
            })?;

        let transcript = transcript.trim().to_string();
        if transcript.is_empty() {
            // The service answered but heard nothing it could spell out
            return Err(SpeechError::Unintelligible);
        }
        Ok(transcript)
    }
}

/// Emotion payload served by the vision sidecar
#[derive(Debug, Deserialize)]
struct EmotionPayload {
    emotion: Emotion,
}

/// Emotion source polling the vision sidecar
///
/// The sidecar owns the camera and the observation window; one GET returns
/// the dominant emotion of the last window. Any failure degrades to
/// `Neutral` per the channel contract.
pub struct HttpEmotionSource {
    endpoint: String,
    client: Client,
}

impl HttpEmotionSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SpeechError> {
        Ok(Self {
            endpoint: endpoint.into(),
            client: http_client()?,
        })
    }
}

impl EmotionSource for HttpEmotionSource {
    fn sample_emotion(&self) -> Emotion {
        let result = self
            .client
            .get(&self.endpoint)
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.json::<EmotionPayload>());

        match result {
            Ok(payload) => payload.emotion,
            Err(err) => {
                warn!("[EmotionSource] Falling back to neutral: {}", err);
                Emotion::Neutral
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_encoding_produces_riff_header() {
        let clip = AudioClip::new(vec![0.0, 0.5, -0.5, 0.25], 16_000);
        let wav = clip_to_wav(&clip).unwrap();
        assert_eq!(&wav[..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
        // 44-byte header plus 2 bytes per sample
        assert_eq!(wav.len(), 44 + 2 * clip.samples.len());
    }

    #[test]
    fn emotion_payload_parses_known_and_unknown_labels() {
        let payload: EmotionPayload = serde_json::from_str("{\"emotion\":\"happy\"}").unwrap();
        assert_eq!(payload.emotion, Emotion::Happy);
        let payload: EmotionPayload = serde_json::from_str("{\"emotion\":\"bored\"}").unwrap();
        assert_eq!(payload.emotion, Emotion::Unknown);
    }
}
