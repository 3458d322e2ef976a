use crate::domain::value_objects::{PostId, ScopeId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub scope_id: ScopeId,
    pub creator_id: UserId,
    pub creator_display_name: Option<String>,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    pub pinned: bool,
    pub vote_score: i64,
    pub comment_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn new(scope_id: ScopeId, creator_id: UserId, title: String, body: String) -> Self {
        Self::new_with_id(
            PostId::generate(),
            scope_id,
            creator_id,
            title,
            body,
            Utc::now(),
        )
    }

    pub fn new_with_id(
        id: PostId,
        scope_id: ScopeId,
        creator_id: UserId,
        title: String,
        body: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            scope_id,
            creator_id,
            creator_display_name: None,
            title,
            body,
            image_url: None,
            pinned: false,
            vote_score: 0,
            comment_count: 0,
            created_at,
        }
    }

    pub fn apply_vote_delta(&mut self, delta: i64) {
        self.vote_score = self.vote_score.saturating_add(delta);
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }
}
