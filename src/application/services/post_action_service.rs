use crate::application::ports::cache::FeedCache;
use crate::application::ports::document_gateway::DocumentGateway;
use crate::application::services::optimistic_update::{self, OptionUpdate, VoteUpdate};
use crate::domain::value_objects::{OptionKind, PostId, UserId, VoteValue};
use crate::infrastructure::cache::PostOverlayStore;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::info;

/// 投票・非表示・保存・通報といった閲覧者の操作を扱うサービス
pub struct PostActionService {
    gateway: Arc<dyn DocumentGateway>,
    cache: Arc<dyn FeedCache>,
    overlay: PostOverlayStore,
}

impl PostActionService {
    pub fn new(
        gateway: Arc<dyn DocumentGateway>,
        cache: Arc<dyn FeedCache>,
        overlay: PostOverlayStore,
    ) -> Self {
        Self {
            gateway,
            cache,
            overlay,
        }
    }

    async fn require_voter(&self) -> Result<UserId, AppError> {
        self.overlay
            .active_voter()
            .await
            .ok_or_else(|| AppError::Unauthorized("sign in to act on posts".to_string()))
    }

    /// 投票する。既に同じ値で投票済みなら投票を取り消す。
    /// 反映後の投票値を返す。
    pub async fn trigger_vote(&self, post_id: &PostId, value: VoteValue) -> Result<VoteValue, AppError> {
        let voter = self.require_voter().await?;
        let current = self.overlay.vote_of(post_id, &voter).await;
        let next = if current == value && !value.is_neutral() {
            VoteValue::Neutral
        } else {
            value
        };

        let mut update = VoteUpdate::new(
            post_id.clone(),
            voter,
            next,
            self.overlay.clone(),
            self.cache.clone(),
        );
        optimistic_update::execute(&mut update, self.gateway.as_ref()).await?;

        info!(post_id = %post_id, vote = %next, "vote recorded");
        Ok(next)
    }

    /// オプションを反転し、反映後の値を返す
    pub async fn toggle_option(&self, post_id: &PostId, kind: OptionKind) -> Result<bool, AppError> {
        self.require_voter().await?;
        let next = !self.overlay.option_of(post_id, kind).await;

        let mut update = OptionUpdate::new(post_id.clone(), kind, next, self.overlay.clone());
        optimistic_update::execute(&mut update, self.gateway.as_ref()).await?;

        info!(post_id = %post_id, option = %kind, value = next, "post option updated");
        Ok(next)
    }
}
