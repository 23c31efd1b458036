use crate::config::ExtractionConfig;
use crate::frame::AngleFrame;
use crate::joint::JointId;

use super::keypoint::Landmarks;

/// 頂点 B における角度 ABC（度, 0〜180）
///
/// 三点が互いに異なることは呼び出し側が保証する。
pub fn joint_angle(a: [f32; 2], b: [f32; 2], c: [f32; 2]) -> f32 {
    let ba = [a[0] - b[0], a[1] - b[1]];
    let bc = [c[0] - b[0], c[1] - b[1]];

    let dot = ba[0] * bc[0] + ba[1] * bc[1];
    let len_ba = (ba[0] * ba[0] + ba[1] * ba[1]).sqrt();
    let len_bc = (bc[0] * bc[0] + bc[1] * bc[1]).sqrt();

    // 丸め誤差で |cos| が 1 をわずかに超えると acos が NaN になる
    let cos = (dot / (len_ba * len_bc)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// ランドマーク列から関節角度フレームを作る
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleExtractor {
    /// 可視性閾値。None なら閾値なし
    threshold: Option<f32>,
    /// 正規化座標に掛けるフレーム幅
    width: f32,
    /// 正規化座標に掛けるフレーム高さ
    height: f32,
}

impl AngleExtractor {
    pub fn new(threshold: Option<f32>) -> Self {
        Self {
            threshold,
            width: 1.0,
            height: 1.0,
        }
    }

    /// 設定から作成
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.threshold()).with_frame_size(config.frame_width, config.frame_height)
    }

    /// 角度をピクセル空間で測るためのフレームサイズ
    pub fn with_frame_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn threshold(&self) -> Option<f32> {
        self.threshold
    }

    /// 三点すべてが存在し閾値を満たす関節だけを含むフレームを返す
    pub fn extract(&self, landmarks: &Landmarks) -> AngleFrame {
        let mut frame = AngleFrame::new();

        for joint in JointId::ALL {
            let [pa, pb, pc] = joint.triplet();
            let (Some(a), Some(b), Some(c)) =
                (landmarks.get(pa), landmarks.get(pb), landmarks.get(pc))
            else {
                continue;
            };

            if !(a.is_confident(self.threshold)
                && b.is_confident(self.threshold)
                && c.is_confident(self.threshold))
            {
                continue;
            }

            let angle = joint_angle(
                a.scaled(self.width, self.height),
                b.scaled(self.width, self.height),
                c.scaled(self.width, self.height),
            );
            // 重なった点からは角度が定まらない
            if angle.is_finite() {
                frame.insert(joint, angle);
            }
        }

        frame
    }
}

impl Default for AngleExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}
