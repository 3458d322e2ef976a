use crate::application::ports::cache::FeedCache;
use crate::application::ports::document_gateway::{
    ChangeCallback, DocumentChange, DocumentGateway, DocumentSubscription,
};
use crate::domain::constants::{POSTS_COLLECTION, post_document_path};
use crate::domain::entities::Post;
use crate::domain::value_objects::PostId;
use crate::shared::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, warn};

/// 投稿ドキュメントを購読し、スコアの変化をフィードキャッシュへ反映する。
///
/// 通知はキューに積むだけで、キャッシュへの反映は `sync` を呼んだ時点で行う。
pub struct LiveScoreUpdater {
    gateway: Arc<dyn DocumentGateway>,
    cache: Arc<dyn FeedCache>,
    enabled: bool,
    subscriptions: Mutex<HashMap<PostId, DocumentSubscription>>,
    sender: mpsc::UnboundedSender<DocumentChange>,
    receiver: Mutex<mpsc::UnboundedReceiver<DocumentChange>>,
}

impl LiveScoreUpdater {
    pub fn new(gateway: Arc<dyn DocumentGateway>, cache: Arc<dyn FeedCache>, enabled: bool) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            gateway,
            cache,
            enabled,
            subscriptions: Mutex::new(HashMap::new()),
            sender,
            receiver: Mutex::new(receiver),
        }
    }

    /// 購読を開始したら true。無効化されている場合や購読済みなら false
    pub async fn watch(&self, post_id: &PostId) -> Result<bool, AppError> {
        if !self.enabled {
            return Ok(false);
        }
        if self.subscriptions.lock().await.contains_key(post_id) {
            return Ok(false);
        }

        let sender = self.sender.clone();
        let on_change: ChangeCallback = Arc::new(move |change| {
            // 受信側が閉じていれば通知は捨てる
            let _ = sender.send(change);
        });
        let path = post_document_path(post_id.as_str());
        let subscription = self
            .gateway
            .subscribe_document(&path, on_change)
            .await?;

        let mut subscriptions = self.subscriptions.lock().await;
        if subscriptions.contains_key(post_id) {
            subscription.unsubscribe();
            return Ok(false);
        }
        subscriptions.insert(post_id.clone(), subscription);
        debug!(post_id = %post_id, "watching post document");
        Ok(true)
    }

    pub async fn unwatch(&self, post_id: &PostId) -> bool {
        match self.subscriptions.lock().await.remove(post_id) {
            Some(subscription) => {
                subscription.unsubscribe();
                true
            }
            None => false,
        }
    }

    pub async fn unwatch_all(&self) {
        let drained: Vec<DocumentSubscription> = {
            let mut subscriptions = self.subscriptions.lock().await;
            subscriptions.drain().map(|(_, subscription)| subscription).collect()
        };
        for subscription in drained {
            subscription.unsubscribe();
        }
    }

    /// キューに溜まった変更をキャッシュへ反映し、反映した件数を返す
    pub async fn sync(&self) -> usize {
        let changes: Vec<DocumentChange> = {
            let mut receiver = self.receiver.lock().await;
            let mut changes = Vec::new();
            while let Ok(change) = receiver.try_recv() {
                changes.push(change);
            }
            changes
        };

        let mut applied = 0;
        for change in changes {
            if self.apply(change).await {
                applied += 1;
            }
        }
        applied
    }

    async fn apply(&self, change: DocumentChange) -> bool {
        let Some(post_id) = parse_post_path(&change.path) else {
            warn!(path = %change.path, "ignoring change for non-post document");
            return false;
        };
        let vote_score = change.data.get("vote_score").and_then(|v| v.as_i64());
        let comment_count = change
            .data
            .get("comment_count")
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok());
        if vote_score.is_none() && comment_count.is_none() {
            return false;
        }

        let touched = self
            .cache
            .update_post(&post_id, &move |post: &mut Post| {
                if let Some(score) = vote_score {
                    post.vote_score = score;
                }
                if let Some(count) = comment_count {
                    post.comment_count = count;
                }
            })
            .await;
        debug!(post_id = %post_id, scopes = touched.len(), "live post update applied");
        !touched.is_empty()
    }
}

fn parse_post_path(path: &str) -> Option<PostId> {
    let id = path
        .strip_prefix(POSTS_COLLECTION)?
        .strip_prefix('/')?;
    if id.contains('/') {
        return None;
    }
    PostId::new(id.to_string()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_post_document_paths() {
        assert_eq!(parse_post_path("posts/p1").unwrap().as_str(), "p1");
        assert!(parse_post_path("posts/").is_none());
        assert!(parse_post_path("posts/p1/comments/c1").is_none());
        assert!(parse_post_path("communities/alpha").is_none());
    }
}
