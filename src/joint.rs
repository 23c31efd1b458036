use serde::{Deserialize, Serialize};

use crate::pose::LandmarkIndex;

/// 計測対象の関節角度
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(usize)]
pub enum JointId {
    ElbowLeft = 0,
    ElbowRight = 1,
    ShoulderLeft = 2,
    ShoulderRight = 3,
    KneeLeft = 4,
    KneeRight = 5,
    HipLeft = 6,
    HipRight = 7,
}

/// 独立にスコア付けされる関節グループ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JointGroup {
    Arms,
    Legs,
}

/// 関節ごとの計測三点 (proximal, vertex, distal) とグループ所属
pub struct JointSpec {
    pub id: JointId,
    pub triplet: [LandmarkIndex; 3],
    pub group: Option<JointGroup>,
}

/// `JointId` の並び順と一致する静的テーブル
static JOINT_TABLE: [JointSpec; JointId::COUNT] = {
    use LandmarkIndex::*;
    [
        JointSpec {
            id: JointId::ElbowLeft,
            triplet: [LeftShoulder, LeftElbow, LeftWrist],
            group: Some(JointGroup::Arms),
        },
        JointSpec {
            id: JointId::ElbowRight,
            triplet: [RightShoulder, RightElbow, RightWrist],
            group: Some(JointGroup::Arms),
        },
        JointSpec {
            id: JointId::ShoulderLeft,
            triplet: [LeftElbow, LeftShoulder, LeftHip],
            group: Some(JointGroup::Arms),
        },
        JointSpec {
            id: JointId::ShoulderRight,
            triplet: [RightElbow, RightShoulder, RightHip],
            group: Some(JointGroup::Arms),
        },
        JointSpec {
            id: JointId::KneeLeft,
            triplet: [LeftHip, LeftKnee, LeftAnkle],
            group: Some(JointGroup::Legs),
        },
        JointSpec {
            id: JointId::KneeRight,
            triplet: [RightHip, RightKnee, RightAnkle],
            group: Some(JointGroup::Legs),
        },
        JointSpec {
            id: JointId::HipLeft,
            triplet: [LeftShoulder, LeftHip, LeftKnee],
            group: Some(JointGroup::Legs),
        },
        JointSpec {
            id: JointId::HipRight,
            triplet: [RightShoulder, RightHip, RightKnee],
            group: Some(JointGroup::Legs),
        },
    ]
};

impl JointId {
    pub const COUNT: usize = 8;

    pub const ALL: [Self; Self::COUNT] = [
        Self::ElbowLeft,
        Self::ElbowRight,
        Self::ShoulderLeft,
        Self::ShoulderRight,
        Self::KneeLeft,
        Self::KneeRight,
        Self::HipLeft,
        Self::HipRight,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn spec(self) -> &'static JointSpec {
        &JOINT_TABLE[self as usize]
    }

    /// 角度を測る三点。頂点は中央
    pub fn triplet(self) -> [LandmarkIndex; 3] {
        self.spec().triplet
    }

    /// 所属グループ。None の関節は全体スコアにのみ寄与する
    pub fn group(self) -> Option<JointGroup> {
        self.spec().group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_ids() {
        for (i, id) in JointId::ALL.iter().enumerate() {
            assert_eq!(*id as usize, i);
            assert_eq!(id.spec().id, *id);
        }
    }

    #[test]
    fn test_vertex_is_named_joint() {
        assert_eq!(JointId::ElbowLeft.triplet()[1], LandmarkIndex::LeftElbow);
        assert_eq!(JointId::KneeRight.triplet()[1], LandmarkIndex::RightKnee);
        assert_eq!(JointId::ShoulderRight.triplet()[1], LandmarkIndex::RightShoulder);
        assert_eq!(JointId::HipLeft.triplet()[1], LandmarkIndex::LeftHip);
    }

    #[test]
    fn test_groups() {
        let arms: Vec<JointId> = JointId::ALL
            .iter()
            .copied()
            .filter(|j| j.group() == Some(JointGroup::Arms))
            .collect();
        assert_eq!(
            arms,
            vec![
                JointId::ElbowLeft,
                JointId::ElbowRight,
                JointId::ShoulderLeft,
                JointId::ShoulderRight
            ]
        );
        let legs = JointId::ALL
            .iter()
            .filter(|j| j.group() == Some(JointGroup::Legs))
            .count();
        assert_eq!(legs, 4);
    }

    #[test]
    fn test_serde_name() {
        let json = serde_json::to_string(&JointId::ElbowLeft).unwrap();
        assert_eq!(json, "\"elbow_left\"");
        let id: JointId = serde_json::from_str("\"hip_right\"").unwrap();
        assert_eq!(id, JointId::HipRight);
    }
}
