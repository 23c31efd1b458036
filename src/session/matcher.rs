use log::trace;

use crate::config::MatcherConfig;
use crate::frame::{AngleFrame, ComparisonSample};

/// 照合結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    /// 候補列の中での位置（古い順）
    pub index: usize,
    /// 参照フレームの関節あたり平均二乗誤差
    pub mean_squared_error: f32,
    pub sample: ComparisonSample,
}

/// ライブフレームに最も近い参照フレームを直近履歴から探す
///
/// 2本のストリームが同期していない前提で、厳密な同時刻ではなく
/// 窓内の最小誤差フレームを採用する。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatcher {
    missing_penalty: f32,
}

impl FrameMatcher {
    pub fn new(missing_penalty: f32) -> Self {
        Self { missing_penalty }
    }

    pub fn from_config(config: &MatcherConfig) -> Self {
        Self::new(config.missing_penalty)
    }

    pub fn missing_penalty(&self) -> f32 {
        self.missing_penalty
    }

    /// 参照フレームにある関節ごとの角度差。ライブ側に無ければペナルティ値
    pub fn compare(&self, live: &AngleFrame, reference: &AngleFrame) -> ComparisonSample {
        reference
            .iter()
            .map(|(joint, ref_angle)| {
                let diff = match live.get(joint) {
                    Some(angle) => (angle - ref_angle).abs(),
                    None => self.missing_penalty,
                };
                (joint, diff)
            })
            .collect()
    }

    /// 参照関節あたりの平均二乗誤差。関節が無ければ None
    pub fn mean_squared_error(&self, live: &AngleFrame, reference: &AngleFrame) -> Option<f32> {
        let sample = self.compare(live, reference);
        if sample.is_empty() {
            return None;
        }
        let sum: f32 = sample.iter().map(|(_, d)| d * d).sum();
        Some(sum / sample.len() as f32)
    }

    /// 候補（古い順）から最小誤差のフレームを選ぶ。同値なら先に現れた方
    ///
    /// 関節を1つも持たない候補は、他に候補があればそちらを優先する。
    /// 候補が空なら None。
    pub fn best_match<'a, I>(&self, live: &AngleFrame, candidates: I) -> Option<Match>
    where
        I: IntoIterator<Item = &'a AngleFrame>,
    {
        let mut best: Option<Match> = None;

        for (index, reference) in candidates.into_iter().enumerate() {
            let mse = self
                .mean_squared_error(live, reference)
                .unwrap_or(f32::INFINITY);
            trace!("candidate {}: mse={:.2}", index, mse);

            let better = match &best {
                Some(b) => mse < b.mean_squared_error,
                None => true,
            };
            if better {
                best = Some(Match {
                    index,
                    mean_squared_error: mse,
                    sample: self.compare(live, reference),
                });
            }
        }

        best
    }
}

impl Default for FrameMatcher {
    fn default() -> Self {
        Self::from_config(&MatcherConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::JointId;
    use proptest::prelude::*;

    fn frame(entries: &[(JointId, f32)]) -> AngleFrame {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_compare_abs_diff() {
        let matcher = FrameMatcher::new(90.0);
        let live = frame(&[(JointId::ElbowLeft, 80.0), (JointId::KneeLeft, 170.0)]);
        let reference = frame(&[(JointId::ElbowLeft, 100.0), (JointId::KneeLeft, 160.0)]);
        let sample = matcher.compare(&live, &reference);
        assert_eq!(sample.get(JointId::ElbowLeft), Some(20.0));
        assert_eq!(sample.get(JointId::KneeLeft), Some(10.0));
        assert_eq!(sample.len(), 2);
    }

    #[test]
    fn test_compare_missing_live_joint_penalized() {
        let matcher = FrameMatcher::new(90.0);
        let live = frame(&[(JointId::ElbowLeft, 100.0)]);
        let reference = frame(&[(JointId::ElbowLeft, 100.0), (JointId::HipRight, 175.0)]);
        let sample = matcher.compare(&live, &reference);
        assert_eq!(sample.get(JointId::ElbowLeft), Some(0.0));
        assert_eq!(sample.get(JointId::HipRight), Some(90.0));
    }

    #[test]
    fn test_compare_ignores_live_only_joint() {
        let matcher = FrameMatcher::new(90.0);
        let live = frame(&[(JointId::ElbowLeft, 100.0), (JointId::KneeRight, 120.0)]);
        let reference = frame(&[(JointId::ElbowLeft, 100.0)]);
        let sample = matcher.compare(&live, &reference);
        assert_eq!(sample.get(JointId::KneeRight), None);
        assert_eq!(sample.len(), 1);
    }

    #[test]
    fn test_mse() {
        let matcher = FrameMatcher::new(90.0);
        let live = frame(&[(JointId::ElbowLeft, 10.0), (JointId::ElbowRight, 0.0)]);
        let reference = frame(&[(JointId::ElbowLeft, 0.0), (JointId::ElbowRight, 20.0)]);
        // (100 + 400) / 2
        assert_eq!(matcher.mean_squared_error(&live, &reference), Some(250.0));
        assert_eq!(matcher.mean_squared_error(&live, &AngleFrame::new()), None);
    }

    #[test]
    fn test_best_match_picks_closest() {
        let matcher = FrameMatcher::new(90.0);
        let live = frame(&[(JointId::KneeLeft, 100.0)]);
        let candidates = [
            frame(&[(JointId::KneeLeft, 60.0)]),
            frame(&[(JointId::KneeLeft, 95.0)]),
            frame(&[(JointId::KneeLeft, 130.0)]),
        ];
        let m = matcher.best_match(&live, &candidates).unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.sample.get(JointId::KneeLeft), Some(5.0));
        assert_eq!(m.mean_squared_error, 25.0);
    }

    #[test]
    fn test_best_match_tie_prefers_oldest() {
        let matcher = FrameMatcher::new(90.0);
        let live = frame(&[(JointId::KneeLeft, 100.0)]);
        let candidates = [
            frame(&[(JointId::KneeLeft, 90.0)]),
            frame(&[(JointId::KneeLeft, 110.0)]),
        ];
        let m = matcher.best_match(&live, &candidates).unwrap();
        assert_eq!(m.index, 0);
    }

    #[test]
    fn test_best_match_normalizes_by_joint_count() {
        let matcher = FrameMatcher::new(90.0);
        let live = frame(&[(JointId::KneeLeft, 100.0), (JointId::KneeRight, 100.0)]);
        let candidates = [
            // 1関節のみ、誤差 10 → mse 100
            frame(&[(JointId::KneeLeft, 110.0)]),
            // 2関節、誤差 0 と 12 → mse 72
            frame(&[(JointId::KneeLeft, 100.0), (JointId::KneeRight, 112.0)]),
        ];
        let m = matcher.best_match(&live, &candidates).unwrap();
        assert_eq!(m.index, 1);
    }

    #[test]
    fn test_best_match_skips_empty_candidate() {
        let matcher = FrameMatcher::new(90.0);
        let live = frame(&[(JointId::KneeLeft, 100.0)]);
        let candidates = [AngleFrame::new(), frame(&[(JointId::KneeLeft, 150.0)])];
        let m = matcher.best_match(&live, &candidates).unwrap();
        assert_eq!(m.index, 1);
        assert_eq!(m.sample.get(JointId::KneeLeft), Some(50.0));
    }

    #[test]
    fn test_best_match_all_empty() {
        let matcher = FrameMatcher::new(90.0);
        let live = frame(&[(JointId::KneeLeft, 100.0)]);
        let candidates = [AngleFrame::new()];
        let m = matcher.best_match(&live, &candidates).unwrap();
        assert_eq!(m.index, 0);
        assert!(m.sample.is_empty());

        let none: [AngleFrame; 0] = [];
        assert!(matcher.best_match(&live, &none).is_none());
    }

    fn arb_frame() -> impl Strategy<Value = AngleFrame> {
        proptest::collection::vec(proptest::option::of(0.0f32..=180.0), JointId::COUNT).prop_map(
            |angles| {
                JointId::ALL
                    .iter()
                    .zip(angles)
                    .filter_map(|(&j, a)| a.map(|a| (j, a)))
                    .collect::<AngleFrame>()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_best_match_deterministic(
            live in arb_frame(),
            candidates in proptest::collection::vec(arb_frame(), 1..12),
        ) {
            let matcher = FrameMatcher::new(90.0);
            let first = matcher.best_match(&live, &candidates);
            let second = matcher.best_match(&live, &candidates);
            prop_assert_eq!(first, second);

            let m = first.unwrap();
            for (i, c) in candidates.iter().enumerate() {
                if let Some(mse) = matcher.mean_squared_error(&live, c) {
                    prop_assert!(m.mean_squared_error <= mse);
                    if i < m.index {
                        prop_assert!(mse > m.mean_squared_error);
                    }
                }
            }
        }
    }
}
