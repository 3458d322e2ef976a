use crate::application::ports::cache::FeedCache;
use crate::application::ports::document_gateway::DocumentGateway;
use crate::domain::entities::Post;
use crate::domain::value_objects::{OrderSpec, PostId, ScopeId};
use crate::infrastructure::cache::PostOverlayStore;
use crate::shared::config::{FeedConfig, OverlayConfig};
use crate::shared::error::AppError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// スコープごとのページングカーソル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorState {
    /// 読み込み済みのページ数。次に要求するのは `page + 1`
    pub page: usize,
    pub has_more: bool,
    pub in_flight: bool,
}

impl Default for CursorState {
    fn default() -> Self {
        Self {
            page: 0,
            has_more: true,
            in_flight: false,
        }
    }
}

impl CursorState {
    pub fn next_page(&self) -> usize {
        self.page + 1
    }

    fn from_cached_len(len: usize, page_size: usize) -> Self {
        let page = len.div_ceil(page_size);
        Self {
            page,
            has_more: len > 0 && len % page_size == 0,
            in_flight: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLoad {
    pub page: usize,
    pub posts: Vec<Post>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InFlight,
    Exhausted,
    BelowThreshold,
    /// フェッチ中に `reset` され、結果を捨てた
    Superseded,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Loaded(PageLoad),
    /// stale でないキャッシュをそのまま使った
    FromCache,
    Skipped(SkipReason),
}

impl PageOutcome {
    pub fn loaded(&self) -> Option<&PageLoad> {
        match self {
            PageOutcome::Loaded(load) => Some(load),
            _ => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, PageOutcome::Skipped(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    Fetch,
    Noop,
}

/// スクロール比率とカーソル状態から次ページを読むか判断する
pub fn scroll_decision(ratio: f64, threshold: f64, cursor: &CursorState) -> ScrollDecision {
    if ratio >= threshold && cursor.has_more && !cursor.in_flight {
        ScrollDecision::Fetch
    } else {
        ScrollDecision::Noop
    }
}

/// カーソル表。`reset` のたびに `epoch` が進み、それ以前に始まった
/// フェッチの結果は捨てられる。
#[derive(Debug, Default)]
struct CursorBook {
    epoch: u64,
    cursors: HashMap<ScopeId, CursorState>,
}

/// フェッチ中フラグを下ろすガード。フェッチの future が途中で drop されても
/// スコープが `in_flight` のまま残らないようにする。
struct InFlightGuard<'a> {
    book: &'a StdMutex<CursorBook>,
    scope: ScopeId,
    epoch: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut book = self.book.lock().unwrap_or_else(PoisonError::into_inner);
        if book.epoch != self.epoch {
            return;
        }
        if let Some(cursor) = book.cursors.get_mut(&self.scope) {
            cursor.in_flight = false;
        }
    }
}

struct FetchedPage {
    /// 先頭からの取得結果全体
    posts: Vec<Post>,
    load: PageLoad,
}

/// フィードのページ読み込みを制御する。
///
/// 同じスコープで同時に走るフェッチは常に 1 本まで。フェッチ中の
/// トリガーは何もせず `SkipReason::InFlight` を返す。カーソルとキャッシュは
/// フェッチ成功時にだけ更新される。
pub struct PaginationController {
    gateway: Arc<dyn DocumentGateway>,
    cache: Arc<dyn FeedCache>,
    overlay: PostOverlayStore,
    // await を跨いで保持しないので std の Mutex で足りる
    book: StdMutex<CursorBook>,
    active_scope: RwLock<Option<ScopeId>>,
    order: OrderSpec,
    page_size: usize,
    scroll_threshold: f64,
    fetch_votes: bool,
}

impl PaginationController {
    pub fn new(
        gateway: Arc<dyn DocumentGateway>,
        cache: Arc<dyn FeedCache>,
        overlay: PostOverlayStore,
        feed: &FeedConfig,
        overlay_config: &OverlayConfig,
    ) -> Self {
        Self {
            gateway,
            cache,
            overlay,
            book: StdMutex::new(CursorBook::default()),
            active_scope: RwLock::new(None),
            order: OrderSpec::feed_default(),
            page_size: feed.page_size.max(1),
            scroll_threshold: feed.scroll_threshold,
            fetch_votes: overlay_config.fetch_votes,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn book(&self) -> MutexGuard<'_, CursorBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub async fn cursor(&self, scope: &ScopeId) -> CursorState {
        self.book()
            .cursors
            .get(scope)
            .copied()
            .unwrap_or_default()
    }

    pub async fn active_scope(&self) -> Option<ScopeId> {
        self.active_scope.read().await.clone()
    }

    /// `page_number` ページ目（1 始まり）を取得してキャッシュへ反映する。
    ///
    /// ゲートウェイは件数制限しか受け付けないため、先頭から
    /// `page_number * page_size` 件を取得し、末尾のページ分を切り出す。
    /// カーソルは更新しない。
    pub async fn load_page(
        &self,
        scope: &ScopeId,
        page_number: usize,
    ) -> Result<PageLoad, AppError> {
        let since = self.cache.revision(scope).await;
        let fetched = self.fetch_page(scope, page_number).await?;
        Ok(self.store_page(scope, fetched, since).await)
    }

    /// スコープ切り替え。キャッシュを使わずに 1 ページ目を取得し、
    /// 成功したときだけカーソルを先頭からに置き換える
    pub async fn select_scope(&self, scope: &ScopeId) -> Result<PageOutcome, AppError> {
        self.set_active(scope).await;
        self.advance(scope, true).await
    }

    /// stale でないキャッシュがあればそれを使い、なければ `select_scope` と同じく取得する
    pub async fn open_scope(&self, scope: &ScopeId) -> Result<PageOutcome, AppError> {
        if let Some(posts) = self.cache.get(scope).await.fresh() {
            self.set_active(scope).await;
            self.book()
                .cursors
                .entry(scope.clone())
                .or_insert_with(|| CursorState::from_cached_len(posts.len(), self.page_size));
            debug!(scope = %scope, count = posts.len(), "feed served from cache");
            return Ok(PageOutcome::FromCache);
        }
        self.select_scope(scope).await
    }

    pub async fn request_next_page(&self, scope: &ScopeId) -> Result<PageOutcome, AppError> {
        self.advance(scope, false).await
    }

    /// スクロール比率（0.0〜1.0）を受け取り、閾値を超えていれば次ページを読む
    pub async fn on_scroll(&self, scope: &ScopeId, ratio: f64) -> Result<PageOutcome, AppError> {
        let cursor = self.cursor(scope).await;
        match scroll_decision(ratio, self.scroll_threshold, &cursor) {
            ScrollDecision::Fetch => self.request_next_page(scope).await,
            ScrollDecision::Noop => {
                let reason = if cursor.in_flight {
                    SkipReason::InFlight
                } else if !cursor.has_more {
                    SkipReason::Exhausted
                } else {
                    SkipReason::BelowThreshold
                };
                Ok(PageOutcome::Skipped(reason))
            }
        }
    }

    /// カーソルを全て破棄する。実行中のフェッチの結果は反映されなくなる
    pub async fn reset(&self) {
        {
            let mut book = self.book();
            book.epoch += 1;
            book.cursors.clear();
        }
        *self.active_scope.write().await = None;
    }

    async fn set_active(&self, scope: &ScopeId) {
        let mut active = self.active_scope.write().await;
        if active.as_ref() != Some(scope) {
            debug!(scope = %scope, "active feed scope changed");
            *active = Some(scope.clone());
        }
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.book().epoch == epoch
    }

    async fn advance(&self, scope: &ScopeId, restart: bool) -> Result<PageOutcome, AppError> {
        let (page_number, epoch) = {
            let mut book = self.book();
            let epoch = book.epoch;
            let cursor = book.cursors.entry(scope.clone()).or_default();
            if cursor.in_flight {
                debug!(scope = %scope, "fetch already in flight; trigger ignored");
                return Ok(PageOutcome::Skipped(SkipReason::InFlight));
            }
            if !restart && !cursor.has_more {
                debug!(scope = %scope, page = cursor.page, "feed exhausted; trigger ignored");
                return Ok(PageOutcome::Skipped(SkipReason::Exhausted));
            }
            cursor.in_flight = true;
            let page_number = if restart { 1 } else { cursor.next_page() };
            (page_number, epoch)
        };
        let _guard = InFlightGuard {
            book: &self.book,
            scope: scope.clone(),
            epoch,
        };

        let since = self.cache.revision(scope).await;
        let fetched = self.fetch_page(scope, page_number).await?;
        if !self.is_current(epoch) {
            debug!(scope = %scope, page = page_number, "feed reset during fetch; result dropped");
            return Ok(PageOutcome::Skipped(SkipReason::Superseded));
        }
        let load = self.store_page(scope, fetched, since).await;

        let mut book = self.book();
        if book.epoch != epoch {
            return Ok(PageOutcome::Skipped(SkipReason::Superseded));
        }
        let cursor = book.cursors.entry(scope.clone()).or_default();
        cursor.page = load.page;
        cursor.has_more = load.has_more;
        Ok(PageOutcome::Loaded(load))
    }

    async fn fetch_page(
        &self,
        scope: &ScopeId,
        page_number: usize,
    ) -> Result<FetchedPage, AppError> {
        if page_number == 0 {
            return Err(AppError::InvalidInput(
                "page number must start at 1".to_string(),
            ));
        }
        let limit = page_number.checked_mul(self.page_size).ok_or_else(|| {
            AppError::InvalidInput(format!("page number {page_number} is too large"))
        })?;

        debug!(scope = %scope, page = page_number, limit, "fetching feed page");
        let mut posts = self
            .gateway
            .query_posts(scope, &self.order, limit)
            .await
            .map_err(|err| {
                warn!(scope = %scope, page = page_number, error = %err, "feed fetch failed");
                AppError::FetchFailure(err.to_string())
            })?;
        posts.truncate(limit);

        let offset = (page_number - 1) * self.page_size;
        let page_posts: Vec<Post> = posts.iter().skip(offset).cloned().collect();
        let has_more = page_posts.len() == self.page_size;
        Ok(FetchedPage {
            posts,
            load: PageLoad {
                page: page_number,
                posts: page_posts,
                has_more,
            },
        })
    }

    async fn store_page(&self, scope: &ScopeId, fetched: FetchedPage, since: u64) -> PageLoad {
        let FetchedPage { posts, load } = fetched;
        self.cache.put_fetched(scope, posts, since).await;
        self.load_votes(&load.posts).await;

        info!(
            scope = %scope,
            page = load.page,
            count = load.posts.len(),
            has_more = load.has_more,
            "feed page loaded"
        );
        load
    }

    async fn load_votes(&self, posts: &[Post]) {
        if !self.fetch_votes || posts.is_empty() {
            return;
        }
        let Some(voter) = self.overlay.active_voter().await else {
            return;
        };
        let post_ids: Vec<PostId> = posts.iter().map(|post| post.id.clone()).collect();
        match self.gateway.query_votes(&voter, &post_ids).await {
            Ok(entries) => {
                self.overlay.reconcile_votes(entries).await;
            }
            Err(err) => {
                warn!(voter = %voter, error = %err, "failed to load votes for feed page");
            }
        }
    }
}
