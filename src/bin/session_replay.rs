//! Replays a recorded practice session through the scoring engine.
//!
//! Usage: session_replay <session.json> [config.toml]
//!
//! The reference and live streams are replayed by two independent tasks at
//! their recorded timestamps, so the engine sees the same unsynchronized
//! arrival pattern it would see from a video decoder and a camera.

use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use motion_score::pose::Landmarks;
use motion_score::session::{LiveOutcome, ScoreBand};
use motion_score::{AngleFrame, Config, SessionEngine, SessionScores, SessionToken};

const CONFIG_PATH: &str = "config.toml";

// --- Recording format ---

#[derive(Debug, Deserialize)]
struct Recording {
    reference: Vec<ReferenceEntry>,
    live: Vec<LiveEntry>,
}

#[derive(Debug, Deserialize)]
struct ReferenceEntry {
    t_ms: u64,
    angles: AngleFrame,
}

/// ライブ側は角度か生ランドマーク `[x, y, visibility]` のどちらか
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LiveEntry {
    Angles { t_ms: u64, angles: AngleFrame },
    Landmarks { t_ms: u64, landmarks: Vec<[f32; 3]> },
}

impl LiveEntry {
    fn t_ms(&self) -> u64 {
        match self {
            Self::Angles { t_ms, .. } | Self::Landmarks { t_ms, .. } => *t_ms,
        }
    }
}

enum Event {
    Reference(SessionToken, AngleFrame),
    Live(SessionToken, LiveEntry),
    ReferenceEnded(SessionToken),
}

fn load_recording(path: &str) -> Result<Recording> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path))?;
    let recording: Recording =
        serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path))?;
    Ok(recording)
}

async fn replay(config: &Config, recording: Recording) -> Result<SessionScores> {
    let mut engine = SessionEngine::new(config)?;
    let token = engine.start();
    let Recording { reference, live } = recording;
    info!(
        "replaying {} reference / {} live frames",
        reference.len(),
        live.len()
    );

    let (tx, mut rx) = mpsc::unbounded_channel();
    let start = Instant::now();

    let ref_tx = tx.clone();
    let reference_task = tokio::spawn(async move {
        for entry in reference {
            sleep_until(start + Duration::from_millis(entry.t_ms)).await;
            if ref_tx.send(Event::Reference(token, entry.angles)).is_err() {
                return;
            }
        }
        let _ = ref_tx.send(Event::ReferenceEnded(token));
    });

    let live_tx = tx;
    let live_task = tokio::spawn(async move {
        for entry in live {
            sleep_until(start + Duration::from_millis(entry.t_ms())).await;
            if live_tx.send(Event::Live(token, entry)).is_err() {
                return;
            }
        }
    });

    let mut compared = 0usize;
    let mut result = None;
    while let Some(event) = rx.recv().await {
        match event {
            Event::Reference(t, frame) => {
                engine.push_reference(t, frame);
            }
            Event::Live(t, LiveEntry::Angles { angles, .. }) => {
                if let LiveOutcome::Compared(sample) = engine.push_live(t, angles) {
                    compared += 1;
                    debug!("sample {}: {:?}", compared, sample);
                }
            }
            Event::Live(t, LiveEntry::Landmarks { landmarks, .. }) => {
                let landmarks = Landmarks::from_triples(&landmarks);
                if let LiveOutcome::Compared(sample) = engine.push_live_landmarks(t, &landmarks) {
                    compared += 1;
                    debug!("sample {}: {:?}", compared, sample);
                }
            }
            Event::ReferenceEnded(t) => {
                result = engine.finish(t);
                break;
            }
        }
    }

    live_task.abort();
    reference_task.abort();
    info!("{} live frames compared", compared);

    match result {
        Some(scores) => Ok(scores),
        None => bail!("reference stream ended without scoring the session"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    // Usage: session_replay <session.json> [config.toml]
    let Some(recording_path) = args.get(1) else {
        bail!("usage: session_replay <session.json> [config.toml]");
    };
    let config = match args.get(2) {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(CONFIG_PATH),
    };

    println!("=== Session Replay ({}) ===", env!("GIT_VERSION"));
    println!("  履歴: {} frames", config.history.capacity);
    println!("  照合間隔: every {} live frames", config.matcher.live_stride);
    println!(
        "  スコア曲線: tolerance={}°, exponent={}",
        config.scoring.tolerance, config.scoring.exponent
    );
    println!();

    let recording = load_recording(recording_path)?;
    let scores = replay(&config, recording).await?;

    println!("結果:");
    for (name, score) in [
        ("overall", scores.overall),
        ("arms", scores.arms),
        ("legs", scores.legs),
    ] {
        println!(
            "  {:<8} {:>5.1}%  [{}]",
            name,
            score,
            ScoreBand::from_score(score).label()
        );
    }
    println!(
        "  {}",
        if scores.is_success(config.scoring.success_threshold) {
            "success"
        } else {
            "keep practicing"
        }
    );

    Ok(())
}
