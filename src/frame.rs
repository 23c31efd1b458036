//! Per-joint value maps exchanged between the stages of the engine.
//!
//! Both maps are fixed-size arrays indexed by [`JointId`]. An absent entry
//! means "unknown", never zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::joint::JointId;

/// One instant of one stream: joint angle in degrees, `[0, 180]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<JointId, f32>", into = "BTreeMap<JointId, f32>")]
pub struct AngleFrame {
    angles: [Option<f32>; JointId::COUNT],
}

impl AngleFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, joint: JointId) -> Option<f32> {
        self.angles[joint as usize]
    }

    pub fn insert(&mut self, joint: JointId, degrees: f32) {
        self.angles[joint as usize] = Some(degrees);
    }

    pub fn with(mut self, joint: JointId, degrees: f32) -> Self {
        self.insert(joint, degrees);
        self
    }

    pub fn remove(&mut self, joint: JointId) {
        self.angles[joint as usize] = None;
    }

    pub fn contains(&self, joint: JointId) -> bool {
        self.get(joint).is_some()
    }

    /// Present joints in `JointId` order.
    pub fn iter(&self) -> impl Iterator<Item = (JointId, f32)> + '_ {
        JointId::ALL
            .iter()
            .filter_map(move |&j| self.get(j).map(|a| (j, a)))
    }

    pub fn len(&self) -> usize {
        self.angles.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.angles.iter().all(|a| a.is_none())
    }
}

impl FromIterator<(JointId, f32)> for AngleFrame {
    fn from_iter<I: IntoIterator<Item = (JointId, f32)>>(iter: I) -> Self {
        let mut frame = Self::new();
        for (joint, degrees) in iter {
            frame.insert(joint, degrees);
        }
        frame
    }
}

impl From<BTreeMap<JointId, f32>> for AngleFrame {
    fn from(map: BTreeMap<JointId, f32>) -> Self {
        map.into_iter().collect()
    }
}

impl From<AngleFrame> for BTreeMap<JointId, f32> {
    fn from(frame: AngleFrame) -> Self {
        frame.iter().collect()
    }
}

/// Per-joint absolute angular difference of the best-matched frame pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(into = "BTreeMap<JointId, f32>")]
pub struct ComparisonSample {
    diffs: [Option<f32>; JointId::COUNT],
}

impl ComparisonSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, joint: JointId) -> Option<f32> {
        self.diffs[joint as usize]
    }

    pub(crate) fn insert(&mut self, joint: JointId, diff: f32) {
        self.diffs[joint as usize] = Some(diff);
    }

    pub fn iter(&self) -> impl Iterator<Item = (JointId, f32)> + '_ {
        JointId::ALL
            .iter()
            .filter_map(move |&j| self.get(j).map(|d| (j, d)))
    }

    pub fn len(&self) -> usize {
        self.diffs.iter().filter(|d| d.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.diffs.iter().all(|d| d.is_none())
    }
}

impl FromIterator<(JointId, f32)> for ComparisonSample {
    fn from_iter<I: IntoIterator<Item = (JointId, f32)>>(iter: I) -> Self {
        let mut sample = Self::new();
        for (joint, diff) in iter {
            sample.insert(joint, diff);
        }
        sample
    }
}

impl From<ComparisonSample> for BTreeMap<JointId, f32> {
    fn from(sample: ComparisonSample) -> Self {
        sample.iter().collect()
    }
}
