use crate::domain::value_objects::{OptionKind, PostId, UserId, VoteValue};
use serde::{Deserialize, Serialize};

/// (投稿, 投票者) ごとの投票値
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteEntry {
    pub post_id: PostId,
    pub voter_id: UserId,
    pub value: VoteValue,
}

impl VoteEntry {
    pub fn new(post_id: PostId, voter_id: UserId, value: VoteValue) -> Self {
        Self {
            post_id,
            voter_id,
            value,
        }
    }
}

/// 非表示・保存・通報の各フラグ。互いに独立して切り替えられる。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOptions {
    pub is_hidden: bool,
    pub is_saved: bool,
    pub is_reported: bool,
}

impl PostOptions {
    pub fn get(&self, kind: OptionKind) -> bool {
        match kind {
            OptionKind::Hidden => self.is_hidden,
            OptionKind::Saved => self.is_saved,
            OptionKind::Reported => self.is_reported,
        }
    }

    pub fn set(&mut self, kind: OptionKind, value: bool) {
        match kind {
            OptionKind::Hidden => self.is_hidden = value,
            OptionKind::Saved => self.is_saved = value,
            OptionKind::Reported => self.is_reported = value,
        }
    }
}

/// 閲覧者から見た投稿のオーバーレイ状態
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlaySnapshot {
    pub vote_value: VoteValue,
    pub options: PostOptions,
}
