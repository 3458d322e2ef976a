use crate::application::ports::cache::FeedCache;
use crate::application::ports::document_gateway::{DocumentGateway, GatewayError};
use crate::domain::entities::Post;
use crate::domain::value_objects::{OptionKind, PostId, UserId, VoteValue};
use crate::infrastructure::cache::PostOverlayStore;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    Pending,
    Applied,
    Committed,
    RolledBack,
}

/// 楽観的更新のコマンド。
///
/// `apply` でローカル状態を先に書き換え、`persist` でリモートへ書き込む。
/// 成功したら `commit`、失敗したら `rollback` で適用前の値へ戻す。
#[async_trait]
pub trait OptimisticUpdate: Send + Sync {
    fn state(&self) -> UpdateState;

    async fn apply(&mut self);

    async fn persist(&self, gateway: &dyn DocumentGateway) -> Result<(), GatewayError>;

    fn commit(&mut self);

    async fn rollback(&mut self);
}

/// apply → persist → commit / rollback を一通り実行する
pub async fn execute<U>(update: &mut U, gateway: &dyn DocumentGateway) -> Result<(), AppError>
where
    U: OptimisticUpdate + ?Sized,
{
    update.apply().await;
    match update.persist(gateway).await {
        Ok(()) => {
            update.commit();
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "remote write failed; rolling back optimistic update");
            update.rollback().await;
            Err(AppError::WriteFailure(err.to_string()))
        }
    }
}

pub struct VoteUpdate {
    post_id: PostId,
    voter_id: UserId,
    updated: VoteValue,
    original: VoteValue,
    overlay: PostOverlayStore,
    cache: Arc<dyn FeedCache>,
    state: UpdateState,
}

impl VoteUpdate {
    pub fn new(
        post_id: PostId,
        voter_id: UserId,
        updated: VoteValue,
        overlay: PostOverlayStore,
        cache: Arc<dyn FeedCache>,
    ) -> Self {
        Self {
            post_id,
            voter_id,
            updated,
            original: VoteValue::Neutral,
            overlay,
            cache,
            state: UpdateState::Pending,
        }
    }

    pub fn original(&self) -> VoteValue {
        self.original
    }

    async fn adjust_score(&self, delta: i64) {
        if delta == 0 {
            return;
        }
        self.cache
            .update_post(&self.post_id, &move |post: &mut Post| {
                post.apply_vote_delta(delta)
            })
            .await;
    }
}

#[async_trait]
impl OptimisticUpdate for VoteUpdate {
    fn state(&self) -> UpdateState {
        self.state
    }

    async fn apply(&mut self) {
        if self.state != UpdateState::Pending {
            return;
        }
        self.original = self
            .overlay
            .set_vote(&self.post_id, &self.voter_id, self.updated)
            .await;
        self.adjust_score(self.original.score_delta(self.updated))
            .await;
        self.state = UpdateState::Applied;
        debug!(post_id = %self.post_id, vote = %self.updated, "vote applied optimistically");
    }

    async fn persist(&self, gateway: &dyn DocumentGateway) -> Result<(), GatewayError> {
        gateway
            .write_vote(&self.post_id, &self.voter_id, self.updated)
            .await
    }

    fn commit(&mut self) {
        if self.state == UpdateState::Applied {
            self.state = UpdateState::Committed;
        }
    }

    async fn rollback(&mut self) {
        if self.state != UpdateState::Applied {
            return;
        }
        self.overlay
            .set_vote(&self.post_id, &self.voter_id, self.original)
            .await;
        self.adjust_score(self.updated.score_delta(self.original))
            .await;
        self.state = UpdateState::RolledBack;
        debug!(post_id = %self.post_id, vote = %self.original, "vote rolled back");
    }
}

pub struct OptionUpdate {
    post_id: PostId,
    kind: OptionKind,
    updated: bool,
    original: bool,
    overlay: PostOverlayStore,
    state: UpdateState,
}

impl OptionUpdate {
    pub fn new(post_id: PostId, kind: OptionKind, updated: bool, overlay: PostOverlayStore) -> Self {
        Self {
            post_id,
            kind,
            updated,
            original: false,
            overlay,
            state: UpdateState::Pending,
        }
    }
}

#[async_trait]
impl OptimisticUpdate for OptionUpdate {
    fn state(&self) -> UpdateState {
        self.state
    }

    async fn apply(&mut self) {
        if self.state != UpdateState::Pending {
            return;
        }
        self.original = self
            .overlay
            .set_option(&self.post_id, self.kind, self.updated)
            .await;
        self.state = UpdateState::Applied;
    }

    async fn persist(&self, gateway: &dyn DocumentGateway) -> Result<(), GatewayError> {
        gateway
            .write_option(&self.post_id, self.kind, self.updated)
            .await
    }

    fn commit(&mut self) {
        if self.state == UpdateState::Applied {
            self.state = UpdateState::Committed;
        }
    }

    async fn rollback(&mut self) {
        if self.state != UpdateState::Applied {
            return;
        }
        self.overlay
            .set_option(&self.post_id, self.kind, self.original)
            .await;
        self.state = UpdateState::RolledBack;
        debug!(post_id = %self.post_id, option = %self.kind, "option rolled back");
    }
}
