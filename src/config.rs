use anyhow::{Context, Result};
use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// ランドマーク可視性の閾値
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// false なら閾値を使わず、存在するランドマークをすべて採用
    #[serde(default = "default_enforce_confidence")]
    pub enforce_confidence: bool,
    /// 正規化X座標に掛ける幅（角度をピクセル空間で測る）
    #[serde(default = "default_frame_size")]
    pub frame_width: f32,
    /// 正規化Y座標に掛ける高さ
    #[serde(default = "default_frame_size")]
    pub frame_height: f32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HistoryConfig {
    /// 保持する参照フレーム数 (約1秒分)
    #[serde(default = "default_history_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MatcherConfig {
    /// ライブ側に無い関節へ課す角度差（度）
    #[serde(default = "default_missing_penalty")]
    pub missing_penalty: f32,
    /// N フレームに1回だけ照合する
    #[serde(default = "default_live_stride")]
    pub live_stride: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScoringConfig {
    /// スコアが 0 になる RMS（度）
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// スコア曲線の指数
    #[serde(default = "default_exponent")]
    pub exponent: f64,
    /// 成功とみなすスコア
    #[serde(default = "default_success_threshold")]
    pub success_threshold: f64,
}

fn default_confidence_threshold() -> f32 { 0.15 }
fn default_enforce_confidence() -> bool { true }
fn default_frame_size() -> f32 { 1.0 }
fn default_history_capacity() -> usize { 10 }
fn default_missing_penalty() -> f32 { 90.0 }
fn default_live_stride() -> u32 { 10 }
fn default_tolerance() -> f64 { 45.0 }
fn default_exponent() -> f64 { 3.0 }
fn default_success_threshold() -> f64 { 70.0 }

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            enforce_confidence: default_enforce_confidence(),
            frame_width: default_frame_size(),
            frame_height: default_frame_size(),
        }
    }
}

impl ExtractionConfig {
    /// 有効な閾値。無効化されていれば None
    pub fn threshold(&self) -> Option<f32> {
        self.enforce_confidence.then_some(self.confidence_threshold)
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_history_capacity(),
        }
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            missing_penalty: default_missing_penalty(),
            live_stride: default_live_stride(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tolerance: default_tolerance(),
            exponent: default_exponent(),
            success_threshold: default_success_threshold(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// 読めなければデフォルト設定
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path.as_ref()) {
            Ok(config) => config,
            Err(e) => {
                warn!("{:#}; using default config", e);
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let ex = &self.extraction;
        if !(0.0..=1.0).contains(&ex.confidence_threshold) {
            return Err(ConfigError::InvalidThreshold(ex.confidence_threshold));
        }
        if !(ex.frame_width > 0.0 && ex.frame_height > 0.0)
            || !ex.frame_width.is_finite()
            || !ex.frame_height.is_finite()
        {
            return Err(ConfigError::InvalidFrameSize {
                width: ex.frame_width,
                height: ex.frame_height,
            });
        }
        if self.history.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.matcher.live_stride == 0 {
            return Err(ConfigError::ZeroStride);
        }
        let penalty = self.matcher.missing_penalty;
        if !(penalty.is_finite() && penalty >= 0.0) {
            return Err(ConfigError::InvalidPenalty(penalty));
        }
        for (name, value) in [
            ("tolerance", self.scoring.tolerance),
            ("exponent", self.scoring.exponent),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::InvalidCurve { name, value });
            }
        }
        Ok(())
    }
}
