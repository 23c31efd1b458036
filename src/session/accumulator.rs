use crate::frame::ComparisonSample;
use crate::joint::JointGroup;

/// 角度差の累積 (sum, sum of squares, count)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ErrorTotals {
    pub sum: f64,
    pub sum_sq: f64,
    pub count: u64,
}

impl ErrorTotals {
    pub fn add(&mut self, diff: f32) {
        let d = f64::from(diff);
        self.sum += d;
        self.sum_sq += d * d;
        self.count += 1;
    }

    /// 平均絶対誤差。件数 0 なら None
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    /// 二乗平均平方根。件数 0 なら None
    pub fn rms(&self) -> Option<f64> {
        (self.count > 0).then(|| (self.sum_sq / self.count as f64).sqrt())
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// 全体・腕・脚ごとの誤差累積
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreAccumulator {
    overall: ErrorTotals,
    arms: ErrorTotals,
    legs: ErrorTotals,
}

impl ScoreAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 1サンプル分の関節差を加算する
    pub fn add(&mut self, sample: &ComparisonSample) {
        for (joint, diff) in sample.iter() {
            self.overall.add(diff);
            match joint.group() {
                Some(JointGroup::Arms) => self.arms.add(diff),
                Some(JointGroup::Legs) => self.legs.add(diff),
                None => {}
            }
        }
    }

    pub fn overall(&self) -> &ErrorTotals {
        &self.overall
    }

    pub fn group(&self, group: JointGroup) -> &ErrorTotals {
        match group {
            JointGroup::Arms => &self.arms,
            JointGroup::Legs => &self.legs,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
