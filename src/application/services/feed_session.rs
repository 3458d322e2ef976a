use crate::application::ports::cache::{CacheLookup, FeedCache};
use crate::application::ports::document_gateway::DocumentGateway;
use crate::application::services::feed_composer::{FeedComposer, RenderablePost};
use crate::application::services::live_updates::LiveScoreUpdater;
use crate::application::services::pagination::{CursorState, PageOutcome, PaginationController};
use crate::application::services::post_action_service::PostActionService;
use crate::domain::entities::Post;
use crate::domain::value_objects::{OptionKind, PostId, ScopeId, UserId, VoteValue};
use crate::infrastructure::cache::{FeedCacheService, PostOverlayStore};
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, info};

/// 閲覧セッション。
///
/// フィードキャッシュとオーバーレイを所有し、ページング・合成・閲覧者操作を
/// 束ねて描画層へ公開する。画面遷移では `reset`、ログアウトでは `sign_out` を使う。
pub struct FeedSession {
    cache: Arc<dyn FeedCache>,
    overlay: PostOverlayStore,
    pagination: PaginationController,
    composer: FeedComposer,
    actions: PostActionService,
    live: LiveScoreUpdater,
}

impl FeedSession {
    pub fn new(gateway: Arc<dyn DocumentGateway>, config: AppConfig) -> Result<Self, AppError> {
        Self::with_cache(gateway, Arc::new(FeedCacheService::new()), config)
    }

    pub fn with_cache(
        gateway: Arc<dyn DocumentGateway>,
        cache: Arc<dyn FeedCache>,
        config: AppConfig,
    ) -> Result<Self, AppError> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let overlay = PostOverlayStore::new();
        let pagination = PaginationController::new(
            gateway.clone(),
            cache.clone(),
            overlay.clone(),
            &config.feed,
            &config.overlay,
        );
        let composer = FeedComposer::new(cache.clone(), overlay.clone());
        let actions = PostActionService::new(gateway.clone(), cache.clone(), overlay.clone());
        let live = LiveScoreUpdater::new(gateway, cache.clone(), config.overlay.live_updates);

        Ok(Self {
            cache,
            overlay,
            pagination,
            composer,
            actions,
            live,
        })
    }

    pub fn overlay(&self) -> &PostOverlayStore {
        &self.overlay
    }

    pub fn pagination(&self) -> &PaginationController {
        &self.pagination
    }

    pub async fn sign_in(&self, voter_id: UserId) {
        info!(voter = %voter_id, "viewer signed in");
        self.overlay.set_active_voter(Some(voter_id)).await;
    }

    pub async fn sign_out(&self) {
        self.reset().await;
        self.overlay.set_active_voter(None).await;
        info!("viewer signed out");
    }

    /// キャッシュ・オーバーレイ・カーソル・購読を破棄する。サインイン状態は残す
    pub async fn reset(&self) {
        self.live.unwatch_all().await;
        self.pagination.reset().await;
        self.cache.clear().await;
        self.overlay.clear().await;
        info!("feed session reset");
    }

    pub async fn get_renderable_feed(&self, scope: &ScopeId) -> Vec<RenderablePost> {
        self.composer.compose(scope).await
    }

    /// キャッシュの生データ（非表示の投稿も含む）
    pub async fn cached_feed(&self, scope: &ScopeId) -> CacheLookup {
        self.cache.get(scope).await
    }

    pub async fn cursor(&self, scope: &ScopeId) -> CursorState {
        self.pagination.cursor(scope).await
    }

    pub async fn select_scope(&self, scope: &ScopeId) -> Result<PageOutcome, AppError> {
        self.pagination.select_scope(scope).await
    }

    pub async fn open_scope(&self, scope: &ScopeId) -> Result<PageOutcome, AppError> {
        self.pagination.open_scope(scope).await
    }

    pub async fn request_next_page(&self, scope: &ScopeId) -> Result<PageOutcome, AppError> {
        self.pagination.request_next_page(scope).await
    }

    pub async fn on_scroll(&self, scope: &ScopeId, ratio: f64) -> Result<PageOutcome, AppError> {
        self.pagination.on_scroll(scope, ratio).await
    }

    pub async fn trigger_vote(&self, post_id: &PostId, value: VoteValue) -> Result<VoteValue, AppError> {
        self.actions.trigger_vote(post_id, value).await
    }

    pub async fn toggle_option(&self, post_id: &PostId, kind: OptionKind) -> Result<bool, AppError> {
        self.actions.toggle_option(post_id, kind).await
    }

    /// 新規投稿はフィードの構成を変えるので、そのスコープを無効化する
    pub async fn post_created(&self, post: &Post) {
        debug!(post_id = %post.id, scope = %post.scope_id, "post created");
        self.cache.invalidate(&post.scope_id).await;
    }

    pub async fn post_deleted(&self, post_id: &PostId) -> Vec<ScopeId> {
        self.live.unwatch(post_id).await;
        let touched = self.cache.remove_post(post_id).await;
        debug!(post_id = %post_id, scopes = touched.len(), "post deleted");
        touched
    }

    pub async fn pin_changed(&self, post_id: &PostId, pinned: bool) -> Vec<ScopeId> {
        let touched = self
            .cache
            .update_post(post_id, &move |post: &mut Post| post.set_pinned(pinned))
            .await;
        for scope in &touched {
            self.cache.invalidate(scope).await;
        }
        debug!(post_id = %post_id, pinned, scopes = touched.len(), "post pin changed");
        touched
    }

    pub async fn watch_post(&self, post_id: &PostId) -> Result<bool, AppError> {
        self.live.watch(post_id).await
    }

    pub async fn unwatch_post(&self, post_id: &PostId) -> bool {
        self.live.unwatch(post_id).await
    }

    pub async fn sync_live_updates(&self) -> usize {
        self.live.sync().await
    }
}
