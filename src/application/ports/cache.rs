use crate::domain::entities::Post;
use crate::domain::value_objects::{PostId, ScopeId};
use async_trait::async_trait;

/// スコープ単位のキャッシュ検索結果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit { posts: Vec<Post>, stale: bool },
    Miss,
}

impl CacheLookup {
    /// stale でないヒットのみを返す
    pub fn fresh(self) -> Option<Vec<Post>> {
        match self {
            CacheLookup::Hit { posts, stale: false } => Some(posts),
            _ => None,
        }
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, CacheLookup::Miss)
    }
}

/// フィード（スコープごとの投稿列）用のキャッシュポート
#[async_trait]
pub trait FeedCache: Send + Sync {
    async fn get(&self, scope: &ScopeId) -> CacheLookup;

    /// 投稿列を丸ごと差し替え、stale フラグを下ろす
    async fn put(&self, scope: &ScopeId, posts: Vec<Post>);

    /// フェッチ結果を書き込む。
    ///
    /// `since` は取得開始前に読んだ `revision`。その後に無効化されていれば
    /// stale のまま書き込み、`clear` を挟んでいれば書き込まない。
    /// fresh として書き込めたときだけ true を返す。
    async fn put_fetched(&self, scope: &ScopeId, posts: Vec<Post>, since: u64) -> bool;

    /// スコープの無効化世代。`invalidate`・`remove_post`・`clear` で進む
    async fn revision(&self, scope: &ScopeId) -> u64;

    /// stale フラグを立てる。データは保持する
    async fn invalidate(&self, scope: &ScopeId);

    /// 全スコープから投稿を取り除き、影響したスコープを無効化する
    async fn remove_post(&self, post_id: &PostId) -> Vec<ScopeId>;

    /// 投稿を保持している全スコープで投稿を書き換える。順序と stale フラグは変えない
    async fn update_post(
        &self,
        post_id: &PostId,
        update: &(dyn for<'p> Fn(&'p mut Post) + Send + Sync),
    ) -> Vec<ScopeId>;

    async fn clear(&self);
}
