use crate::application::ports::cache::{CacheLookup, FeedCache};
use crate::domain::entities::{OverlaySnapshot, Post};
use crate::domain::value_objects::{PostId, ScopeId, VoteValue};
use crate::infrastructure::cache::PostOverlayStore;
use serde::Serialize;
use std::sync::Arc;

/// 描画層へ渡す 1 件分の投稿
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderablePost {
    pub post: Post,
    pub vote_value: VoteValue,
    pub is_hidden: bool,
    pub is_saved: bool,
    pub is_reported: bool,
}

impl RenderablePost {
    fn new(post: Post, snapshot: OverlaySnapshot) -> Self {
        Self {
            post,
            vote_value: snapshot.vote_value,
            is_hidden: snapshot.options.is_hidden,
            is_saved: snapshot.options.is_saved,
            is_reported: snapshot.options.is_reported,
        }
    }
}

/// キャッシュ済みの投稿列にオーバーレイを重ねて描画用の列を作る。
/// 並び順はキャッシュのまま変えない。
pub struct FeedComposer {
    cache: Arc<dyn FeedCache>,
    overlay: PostOverlayStore,
}

impl FeedComposer {
    pub fn new(cache: Arc<dyn FeedCache>, overlay: PostOverlayStore) -> Self {
        Self { cache, overlay }
    }

    pub async fn compose(&self, scope: &ScopeId) -> Vec<RenderablePost> {
        // stale なエントリも楽観的に表示する
        let posts = match self.cache.get(scope).await {
            CacheLookup::Hit { posts, .. } => posts,
            CacheLookup::Miss => return Vec::new(),
        };

        let ids: Vec<PostId> = posts.iter().map(|post| post.id.clone()).collect();
        let snapshots = self.overlay.resolve_many(&ids).await;

        posts
            .into_iter()
            .zip(snapshots)
            .filter(|(_, snapshot)| !snapshot.options.is_hidden)
            .map(|(post, snapshot)| RenderablePost::new(post, snapshot))
            .collect()
    }
}
