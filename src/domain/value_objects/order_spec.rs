use crate::domain::entities::Post;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Pinned,
    VoteScore,
    CreatedAt,
}

/// 投稿クエリの並び順。各キーは降順で評価される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSpec {
    keys: Vec<SortKey>,
}

impl OrderSpec {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// pinned desc, vote_score desc, created_at desc
    pub fn feed_default() -> Self {
        Self::new(vec![SortKey::Pinned, SortKey::VoteScore, SortKey::CreatedAt])
    }

    pub fn compare(&self, a: &Post, b: &Post) -> Ordering {
        for key in &self.keys {
            let ordering = match key {
                SortKey::Pinned => b.pinned.cmp(&a.pinned),
                SortKey::VoteScore => b.vote_score.cmp(&a.vote_score),
                SortKey::CreatedAt => b.created_at.cmp(&a.created_at),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl Default for OrderSpec {
    fn default() -> Self {
        Self::feed_default()
    }
}
