//! Engine adapter tests.
//!
//! The hermetic tests pin down unavailability behavior without touching
//! a real backend. The ignored tests run the real synthesizer binary,
//! the real cloud service, or the audio device when present.

use std::sync::Arc;

use voxpipe::engine::{availability_report, engine_for};
use voxpipe::{
    AppConfig, AudioFormat, CloudConfig, CloudEngine, EngineKind, OfflineConfig, OfflineEngine,
    SpeechEngine,
};

fn unreachable_offline() -> OfflineConfig {
    OfflineConfig {
        binary: "definitely-not-a-synthesizer".into(),
        ..OfflineConfig::default()
    }
}

/// A missing synthesizer binary surfaces as an unavailable engine, which
/// callers may retry or fall back from.
#[tokio::test]
async fn test_missing_offline_binary_is_unavailable() {
    let engine = OfflineEngine::new(unreachable_offline());

    let err = engine.synthesize("hello", "en").await.unwrap_err();
    assert!(err.is_engine_unavailable());
    assert!(err.is_retryable());
    assert!(!engine.is_available().await);
}

/// A cloud engine without an API key reports unavailable before any
/// request leaves the process.
#[tokio::test]
async fn test_cloud_without_key_is_unavailable() {
    let engine = CloudEngine::new(CloudConfig::default()).unwrap();

    let err = engine.synthesize("hello", "en").await.unwrap_err();
    assert!(err.is_engine_unavailable());
    assert!(!engine.is_available().await);
}

/// engine_for hands back the adapter matching the requested kind.
#[test]
fn test_engine_for_matches_kind() {
    let config = AppConfig::default();

    let offline = engine_for(EngineKind::Offline, &config).unwrap();
    let cloud = engine_for(EngineKind::Cloud, &config).unwrap();

    assert_eq!(offline.kind(), EngineKind::Offline);
    assert_eq!(offline.audio_format(), AudioFormat::Wav);
    assert_eq!(cloud.kind(), EngineKind::Cloud);
    assert_eq!(cloud.audio_format(), AudioFormat::Mp3);
}

/// The availability report covers both engines in declaration order.
#[tokio::test]
async fn test_availability_report_covers_both_engines() {
    let mut config = AppConfig::default();
    config.offline = unreachable_offline();
    // default cloud config has no API key

    let report = availability_report(&config).await;
    assert_eq!(
        report,
        vec![(EngineKind::Offline, false), (EngineKind::Cloud, false)]
    );
}

/// Real offline synthesis: produces a parseable RIFF/WAV payload.
#[tokio::test]
#[ignore = "requires espeak-ng installed"]
async fn test_offline_synthesis_produces_wav() {
    let engine = OfflineEngine::new(OfflineConfig::default());
    if !engine.is_available().await {
        eprintln!("Skipping: offline synthesizer binary not found");
        return;
    }

    let audio = engine
        .synthesize("Hello from the integration suite.", "en")
        .await
        .expect("offline synthesis failed");

    assert_eq!(audio.format(), AudioFormat::Wav);
    assert!(!audio.is_empty());
    assert_eq!(AudioFormat::sniff(audio.as_bytes()), Some(AudioFormat::Wav));
    let duration = audio.wav_duration_secs().expect("WAV header unreadable");
    assert!(duration > 0.0, "empty duration: {}", duration);
}

/// Concurrent offline calls both finish; the process-wide lock serializes
/// them underneath.
#[tokio::test]
#[ignore = "requires espeak-ng installed"]
async fn test_offline_calls_serialize() {
    let engine = Arc::new(OfflineEngine::new(OfflineConfig::default()));
    if !engine.is_available().await {
        eprintln!("Skipping: offline synthesizer binary not found");
        return;
    }

    let first = tokio::spawn({
        let engine = engine.clone();
        async move { engine.synthesize("one of two", "en").await }
    });
    let second = tokio::spawn({
        let engine = engine.clone();
        async move { engine.synthesize("two of two", "en").await }
    });

    let a = first.await.unwrap().expect("first call failed");
    let b = second.await.unwrap().expect("second call failed");
    assert!(!a.is_empty());
    assert!(!b.is_empty());
}

/// Real cloud synthesis: produces MP3 bytes.
#[tokio::test]
#[ignore = "requires network and TTS_CLOUD_API_KEY"]
async fn test_cloud_synthesis_produces_mp3() {
    let config = AppConfig::from_env();
    if config.cloud.api_key.is_none() {
        eprintln!("Skipping: TTS_CLOUD_API_KEY not set");
        return;
    }

    let engine = CloudEngine::new(config.cloud).expect("cloud engine setup failed");
    let audio = engine
        .synthesize("Hello from the integration suite.", "en")
        .await
        .expect("cloud synthesis failed");

    assert_eq!(audio.format(), AudioFormat::Mp3);
    assert!(!audio.is_empty());
}

/// Playback of an in-memory beep through the default output device.
#[test]
#[ignore = "requires an audio output device"]
fn test_playback_of_generated_wav() {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..4410 {
            let t = i as f32 / 22050.0;
            let sample = (t * 440.0 * 2.0 * std::f32::consts::PI).sin();
            writer.write_sample((sample * 8000.0) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    voxpipe::audio::playback::play_bytes(cursor.into_inner()).expect("playback failed");
}
