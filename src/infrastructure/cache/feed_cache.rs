use crate::application::ports::cache::{CacheLookup, FeedCache};
use crate::domain::entities::Post;
use crate::domain::value_objects::{PostId, ScopeId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone)]
struct FeedCacheEntry {
    posts: Vec<Post>,
    stale: bool,
}

#[derive(Debug, Default)]
struct FeedCacheState {
    entries: HashMap<ScopeId, FeedCacheEntry>,
    /// スコープごとの最終無効化時刻（`clock` の値）
    revisions: HashMap<ScopeId, u64>,
    cleared_at: u64,
    clock: u64,
}

impl FeedCacheState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn mark_invalidated(&mut self, scope: &ScopeId) {
        let now = self.tick();
        self.revisions.insert(scope.clone(), now);
    }

    fn revision(&self, scope: &ScopeId) -> u64 {
        self.revisions
            .get(scope)
            .copied()
            .unwrap_or(0)
            .max(self.cleared_at)
    }
}

/// スコープごとのフィードキャッシュサービス
#[derive(Clone, Default)]
pub struct FeedCacheService {
    state: Arc<RwLock<FeedCacheState>>,
}

impl FeedCacheService {
    pub fn new() -> Self {
        Self::default()
    }

    /// キャッシュ済みのスコープ一覧
    pub async fn scopes(&self) -> Vec<ScopeId> {
        let state = self.state.read().await;
        let mut scopes: Vec<ScopeId> = state.entries.keys().cloned().collect();
        scopes.sort();
        scopes
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.read().await.entries.is_empty()
    }

    /// 投稿を保持しているスコープ
    pub async fn scopes_containing(&self, post_id: &PostId) -> Vec<ScopeId> {
        let state = self.state.read().await;
        let mut scopes: Vec<ScopeId> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.posts.iter().any(|post| &post.id == post_id))
            .map(|(scope, _)| scope.clone())
            .collect();
        scopes.sort();
        scopes
    }
}

#[async_trait]
impl FeedCache for FeedCacheService {
    async fn get(&self, scope: &ScopeId) -> CacheLookup {
        let state = self.state.read().await;
        match state.entries.get(scope) {
            Some(entry) => CacheLookup::Hit {
                posts: entry.posts.clone(),
                stale: entry.stale,
            },
            None => CacheLookup::Miss,
        }
    }

    async fn put(&self, scope: &ScopeId, posts: Vec<Post>) {
        let mut state = self.state.write().await;
        debug!(scope = %scope, count = posts.len(), "feed cache updated");
        state.entries.insert(
            scope.clone(),
            FeedCacheEntry {
                posts,
                stale: false,
            },
        );
    }

    async fn put_fetched(&self, scope: &ScopeId, posts: Vec<Post>, since: u64) -> bool {
        let mut state = self.state.write().await;
        if state.cleared_at > since {
            debug!(scope = %scope, "cache cleared during fetch; result dropped");
            return false;
        }
        let stale = state.revision(scope) > since;
        if stale {
            debug!(scope = %scope, "scope invalidated during fetch; kept stale");
        } else {
            debug!(scope = %scope, count = posts.len(), "feed cache updated");
        }
        state
            .entries
            .insert(scope.clone(), FeedCacheEntry { posts, stale });
        !stale
    }

    async fn revision(&self, scope: &ScopeId) -> u64 {
        self.state.read().await.revision(scope)
    }

    async fn invalidate(&self, scope: &ScopeId) {
        let mut state = self.state.write().await;
        state.mark_invalidated(scope);
        if let Some(entry) = state.entries.get_mut(scope) {
            entry.stale = true;
            debug!(scope = %scope, "feed cache invalidated");
        }
    }

    async fn remove_post(&self, post_id: &PostId) -> Vec<ScopeId> {
        let mut state = self.state.write().await;
        let mut touched = Vec::new();
        for (scope, entry) in state.entries.iter_mut() {
            let before = entry.posts.len();
            entry.posts.retain(|post| &post.id != post_id);
            if entry.posts.len() != before {
                entry.stale = true;
                touched.push(scope.clone());
            }
        }
        for scope in &touched {
            state.mark_invalidated(scope);
        }
        touched.sort();
        touched
    }

    async fn update_post(
        &self,
        post_id: &PostId,
        update: &(dyn for<'p> Fn(&'p mut Post) + Send + Sync),
    ) -> Vec<ScopeId> {
        let mut state = self.state.write().await;
        let mut touched = Vec::new();
        for (scope, entry) in state.entries.iter_mut() {
            if let Some(post) = entry.posts.iter_mut().find(|post| &post.id == post_id) {
                update(post);
                touched.push(scope.clone());
            }
        }
        touched.sort();
        touched
    }

    async fn clear(&self) {
        let mut state = self.state.write().await;
        state.entries.clear();
        state.revisions.clear();
        let now = state.tick();
        state.cleared_at = now;
    }
}
