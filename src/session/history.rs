use std::collections::vec_deque;
use std::collections::VecDeque;

use crate::config::HistoryConfig;
use crate::frame::AngleFrame;

/// 直近 K 個の参照フレームを保持する FIFO
///
/// 2本のストリームのレート揺らぎを吸収するための探索窓。
pub struct HistoryBuffer {
    frames: VecDeque<AngleFrame>,
    capacity: usize,
}

impl HistoryBuffer {
    /// capacity は 1 以上
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.capacity)
    }

    /// 末尾に追加。容量を超えたら先頭を捨てる
    pub fn push(&mut self, frame: AngleFrame) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// 古い順の読み取り専用ビュー
    pub fn snapshot(&self) -> vec_deque::Iter<'_, AngleFrame> {
        self.frames.iter()
    }

    /// 最新の参照フレーム
    pub fn latest(&self) -> Option<&AngleFrame> {
        self.frames.back()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}
