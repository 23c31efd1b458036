//! Session engine: owns every piece of mutable scoring state for one
//! practice session.
//!
//! Frame callbacks capture the [`SessionToken`] returned by [`SessionEngine::start`]
//! or [`SessionEngine::restart`] and pass it back with every frame. Frames
//! carrying an older token are discarded, so a callback that completes after a
//! restart cannot leak into the new session.

use log::{debug, info};

use crate::config::Config;
use crate::error::ConfigError;
use crate::frame::{AngleFrame, ComparisonSample};
use crate::pose::{AngleExtractor, Landmarks};

use super::accumulator::ScoreAccumulator;
use super::history::HistoryBuffer;
use super::matcher::FrameMatcher;
use super::scorer::{ScoreCurve, SessionScores};

/// Idle → Accumulating → Scored → (restart) → Accumulating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Accumulating,
    Scored,
}

/// Identifies one session; increases on every start, restart and stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionToken(u64);

impl SessionToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Result of handing a reference frame to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    Accepted,
    /// Token belongs to an earlier session.
    Stale,
    /// Engine is not accumulating.
    Inactive,
}

/// Result of handing a live frame to the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiveOutcome {
    /// Frame was matched and its differences accumulated.
    Compared(ComparisonSample),
    /// Frame fell between comparison strides.
    Throttled,
    Stale,
    Inactive,
}

impl LiveOutcome {
    pub fn sample(&self) -> Option<&ComparisonSample> {
        match self {
            Self::Compared(sample) => Some(sample),
            _ => None,
        }
    }
}

pub struct SessionEngine {
    extractor: AngleExtractor,
    matcher: FrameMatcher,
    curve: ScoreCurve,
    live_stride: u64,
    history: HistoryBuffer,
    /// Fallback candidate while the history is empty.
    last_reference: AngleFrame,
    accumulator: ScoreAccumulator,
    state: SessionState,
    token: SessionToken,
    live_frames: u64,
}

impl SessionEngine {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            extractor: AngleExtractor::from_config(&config.extraction),
            matcher: FrameMatcher::from_config(&config.matcher),
            curve: ScoreCurve::from_config(&config.scoring),
            live_stride: u64::from(config.matcher.live_stride),
            history: HistoryBuffer::from_config(&config.history),
            last_reference: AngleFrame::new(),
            accumulator: ScoreAccumulator::new(),
            state: SessionState::Idle,
            token: SessionToken(0),
            live_frames: 0,
        })
    }

    /// Playback started. Returns the token frame callbacks must carry.
    ///
    /// Already accumulating: the current token is returned unchanged.
    /// After a scored session this behaves like [`restart`](Self::restart).
    pub fn start(&mut self) -> SessionToken {
        match self.state {
            SessionState::Accumulating => self.token,
            SessionState::Idle | SessionState::Scored => self.begin(),
        }
    }

    /// Zero all accumulators, clear the history and begin a new session.
    pub fn restart(&mut self) -> SessionToken {
        self.begin()
    }

    /// Abandon the current session and return to idle.
    pub fn stop(&mut self) {
        self.clear();
        self.token = SessionToken(self.token.0 + 1);
        self.state = SessionState::Idle;
        info!("session stopped");
    }

    fn begin(&mut self) -> SessionToken {
        self.clear();
        self.token = SessionToken(self.token.0 + 1);
        self.state = SessionState::Accumulating;
        info!("session {} accumulating", self.token.0);
        self.token
    }

    fn clear(&mut self) {
        self.accumulator.reset();
        self.history.clear();
        self.last_reference = AngleFrame::new();
        self.live_frames = 0;
    }

    fn admit(&self, token: SessionToken) -> Result<(), Ingest> {
        if token != self.token {
            debug!(
                "dropping frame from session {} (current {})",
                token.0, self.token.0
            );
            return Err(Ingest::Stale);
        }
        if self.state != SessionState::Accumulating {
            return Err(Ingest::Inactive);
        }
        Ok(())
    }

    /// Reference stream frame
    pub fn push_reference(&mut self, token: SessionToken, frame: AngleFrame) -> Ingest {
        if let Err(rejected) = self.admit(token) {
            return rejected;
        }
        self.last_reference = frame;
        self.history.push(frame);
        Ingest::Accepted
    }

    /// Live stream frame. Only every `live_stride`-th frame is compared,
    /// starting with the first.
    pub fn push_live(&mut self, token: SessionToken, frame: AngleFrame) -> LiveOutcome {
        match self.admit(token) {
            Ok(()) => {}
            Err(Ingest::Stale) => return LiveOutcome::Stale,
            Err(_) => return LiveOutcome::Inactive,
        }

        let index = self.live_frames;
        self.live_frames += 1;
        if index % self.live_stride != 0 {
            return LiveOutcome::Throttled;
        }

        let sample = self.compare(&frame);
        self.accumulator.add(&sample);
        LiveOutcome::Compared(sample)
    }

    /// Live stream landmarks, extracted with the configured threshold.
    pub fn push_live_landmarks(&mut self, token: SessionToken, landmarks: &Landmarks) -> LiveOutcome {
        let frame = self.extractor.extract(landmarks);
        self.push_live(token, frame)
    }

    fn compare(&self, live: &AngleFrame) -> ComparisonSample {
        let found = if self.history.is_empty() {
            self.matcher
                .best_match(live, std::slice::from_ref(&self.last_reference))
        } else {
            self.matcher.best_match(live, self.history.snapshot())
        };

        match found {
            Some(m) => {
                debug!(
                    "matched history[{}] mse={:.1} joints={}",
                    m.index,
                    m.mean_squared_error,
                    m.sample.len()
                );
                m.sample
            }
            None => ComparisonSample::new(),
        }
    }

    /// Reference stream ended. Scores the session exactly once per token and
    /// zeroes the accumulators for the next one.
    pub fn finish(&mut self, token: SessionToken) -> Option<SessionScores> {
        if self.admit(token).is_err() {
            return None;
        }

        let scores = SessionScores::from_accumulator(&self.accumulator, &self.curve);
        info!(
            "session {} scored: overall={:.1} arms={:.1} legs={:.1} ({} joint samples)",
            self.token.0,
            scores.overall,
            scores.arms,
            scores.legs,
            self.accumulator.overall().count
        );
        self.accumulator.reset();
        self.state = SessionState::Scored;
        Some(scores)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn token(&self) -> SessionToken {
        self.token
    }

    pub fn accumulator(&self) -> &ScoreAccumulator {
        &self.accumulator
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn extractor(&self) -> &AngleExtractor {
        &self.extractor
    }
}
