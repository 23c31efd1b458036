/// 姿勢推定モデルが返す 33 ランドマークのインデックス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const COUNT: usize = 33;

    const ALL: [Self; Self::COUNT] = [
        Self::Nose,
        Self::LeftEyeInner,
        Self::LeftEye,
        Self::LeftEyeOuter,
        Self::RightEyeInner,
        Self::RightEye,
        Self::RightEyeOuter,
        Self::LeftEar,
        Self::RightEar,
        Self::MouthLeft,
        Self::MouthRight,
        Self::LeftShoulder,
        Self::RightShoulder,
        Self::LeftElbow,
        Self::RightElbow,
        Self::LeftWrist,
        Self::RightWrist,
        Self::LeftPinky,
        Self::RightPinky,
        Self::LeftIndex,
        Self::RightIndex,
        Self::LeftThumb,
        Self::RightThumb,
        Self::LeftHip,
        Self::RightHip,
        Self::LeftKnee,
        Self::RightKnee,
        Self::LeftAnkle,
        Self::RightAnkle,
        Self::LeftHeel,
        Self::RightHeel,
        Self::LeftFootIndex,
        Self::RightFootIndex,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// 単一ランドマーク
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 可視性スコア (0.0〜1.0)。モデルが出さない場合は None
    pub visibility: Option<f32>,
}

impl Landmark {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self {
            x,
            y,
            visibility: Some(visibility),
        }
    }

    /// 可視性を持たないランドマーク
    pub fn without_visibility(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    /// 閾値を満たすか。閾値なし (None) なら常に true。
    /// 可視性が無いランドマークは閾値ありの場合 0.0 とみなす。
    pub fn is_confident(&self, threshold: Option<f32>) -> bool {
        match threshold {
            Some(t) => self.visibility.unwrap_or(0.0) >= t,
            None => true,
        }
    }

    /// フレームサイズでスケールした座標
    pub fn scaled(&self, width: f32, height: f32) -> [f32; 2] {
        [self.x * width, self.y * height]
    }
}

/// 1枚の画像から得たランドマーク列
///
/// モデルによっては 33 点未満しか返さないため、長さは可変。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Landmarks {
    points: Vec<Landmark>,
}

impl Landmarks {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    /// `[x, y, visibility]` 形式の配列から作成
    pub fn from_triples(triples: &[[f32; 3]]) -> Self {
        Self::new(
            triples
                .iter()
                .map(|t| Landmark::new(t[0], t[1], t[2]))
                .collect(),
        )
    }

    /// インデックスでランドマークを取得。存在しなければ None
    pub fn get(&self, index: LandmarkIndex) -> Option<&Landmark> {
        self.points.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl From<Vec<Landmark>> for Landmarks {
    fn from(points: Vec<Landmark>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_index_count() {
        assert_eq!(LandmarkIndex::COUNT, 33);
    }

    #[test]
    fn test_landmark_index_from_index() {
        assert_eq!(LandmarkIndex::from_index(0), Some(LandmarkIndex::Nose));
        assert_eq!(LandmarkIndex::from_index(11), Some(LandmarkIndex::LeftShoulder));
        assert_eq!(LandmarkIndex::from_index(32), Some(LandmarkIndex::RightFootIndex));
        assert_eq!(LandmarkIndex::from_index(33), None);
    }

    #[test]
    fn test_from_index_matches_discriminant() {
        for i in 0..LandmarkIndex::COUNT {
            assert_eq!(LandmarkIndex::from_index(i).unwrap() as usize, i);
        }
    }

    #[test]
    fn test_is_confident() {
        let lm = Landmark::new(0.5, 0.5, 0.2);
        assert!(lm.is_confident(Some(0.15)));
        assert!(lm.is_confident(Some(0.2)));
        assert!(!lm.is_confident(Some(0.5)));
        assert!(lm.is_confident(None));
    }

    #[test]
    fn test_missing_visibility() {
        let lm = Landmark::without_visibility(0.5, 0.5);
        assert!(lm.is_confident(None));
        assert!(!lm.is_confident(Some(0.15)));
        assert!(lm.is_confident(Some(0.0)));
    }

    #[test]
    fn test_scaled() {
        let lm = Landmark::new(0.5, 0.25, 1.0);
        assert_eq!(lm.scaled(640.0, 480.0), [320.0, 120.0]);
    }

    #[test]
    fn test_landmarks_get_out_of_range() {
        let landmarks = Landmarks::from_triples(&[[0.1, 0.2, 0.9]; 12]);
        assert_eq!(landmarks.len(), 12);
        assert!(landmarks.get(LandmarkIndex::RightShoulder).is_none());
        let nose = landmarks.get(LandmarkIndex::Nose).unwrap();
        assert_eq!(nose.x, 0.1);
        assert_eq!(nose.visibility, Some(0.9));
    }
}
