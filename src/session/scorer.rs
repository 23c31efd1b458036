use serde::Serialize;

use crate::config::ScoringConfig;
use crate::joint::JointGroup;

use super::accumulator::{ErrorTotals, ScoreAccumulator};

/// RMS 誤差を 0〜100 のスコアに変換する曲線
///
/// `score = 100 * (1 - (rms / tolerance)^exponent)`、`rms >= tolerance` で 0。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreCurve {
    tolerance: f64,
    exponent: f64,
}

impl ScoreCurve {
    pub fn new(tolerance: f64, exponent: f64) -> Self {
        Self {
            tolerance,
            exponent,
        }
    }

    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.tolerance, config.exponent)
    }

    pub fn score(&self, rms: f64) -> f64 {
        if rms >= self.tolerance {
            return 0.0;
        }
        let ratio = (rms / self.tolerance).max(0.0);
        (100.0 * (1.0 - ratio.powf(self.exponent))).clamp(0.0, 100.0)
    }

    /// 件数 0 なら 0
    pub fn score_totals(&self, totals: &ErrorTotals) -> f64 {
        totals.rms().map_or(0.0, |rms| self.score(rms))
    }
}

impl Default for ScoreCurve {
    fn default() -> Self {
        Self::from_config(&ScoringConfig::default())
    }
}

/// 1セッションの最終スコア
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionScores {
    pub overall: f64,
    pub arms: f64,
    pub legs: f64,
}

impl SessionScores {
    pub fn from_accumulator(acc: &ScoreAccumulator, curve: &ScoreCurve) -> Self {
        Self {
            overall: curve.score_totals(acc.overall()),
            arms: curve.score_totals(acc.group(JointGroup::Arms)),
            legs: curve.score_totals(acc.group(JointGroup::Legs)),
        }
    }

    pub fn group(&self, group: JointGroup) -> f64 {
        match group {
            JointGroup::Arms => self.arms,
            JointGroup::Legs => self.legs,
        }
    }

    /// 全体スコアが閾値以上か
    pub fn is_success(&self, threshold: f64) -> bool {
        self.overall >= threshold
    }
}

/// フィードバック選択側に渡すスコア帯
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ScoreBand {
    #[serde(rename = "0-20")]
    VeryLow,
    #[serde(rename = "20-40")]
    Low,
    #[serde(rename = "40-60")]
    Medium,
    #[serde(rename = "60-80")]
    High,
    #[serde(rename = "80-100")]
    Excellent,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score < 20.0 {
            Self::VeryLow
        } else if score < 40.0 {
            Self::Low
        } else if score < 60.0 {
            Self::Medium
        } else if score < 80.0 {
            Self::High
        } else {
            Self::Excellent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::VeryLow => "0-20",
            Self::Low => "20-40",
            Self::Medium => "40-60",
            Self::High => "60-80",
            Self::Excellent => "80-100",
        }
    }
}
