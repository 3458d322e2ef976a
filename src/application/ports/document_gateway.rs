use crate::domain::entities::{Post, VoteEntry};
use crate::domain::value_objects::{OptionKind, OrderSpec, PostId, ScopeId, UserId, VoteValue};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Failed to decode document: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Decode(err.to_string())
    }
}

/// 読み取り経路の失敗として扱う。書き込みは楽観的更新側で `WriteFailure` に変換する
impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        AppError::FetchFailure(err.to_string())
    }
}

/// 購読しているドキュメントの変更通知
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub path: String,
    pub data: serde_json::Value,
}

pub type ChangeCallback = Arc<dyn Fn(DocumentChange) + Send + Sync>;

/// `subscribe_document` が返す購読ハンドル。drop 時にも購読を解除する。
pub struct DocumentSubscription {
    path: String,
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl DocumentSubscription {
    pub fn new<F>(path: impl Into<String>, cancel: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for DocumentSubscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for DocumentSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentSubscription")
            .field("path", &self.path)
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// リモートのドキュメントストアへのポート。
///
/// 並び替え・絞り込み・件数制限はストア側の保証に従う。タイムアウトは
/// 実装側の責務で、呼び出し側では通常の失敗として扱う。
#[async_trait]
pub trait DocumentGateway: Send + Sync {
    /// スコープ内の投稿を `order` の順で先頭から最大 `limit` 件取得する。
    async fn query_posts(
        &self,
        scope: &ScopeId,
        order: &OrderSpec,
        limit: usize,
    ) -> Result<Vec<Post>, GatewayError>;

    /// 指定投稿に対する投票者の投票を取得する。
    async fn query_votes(
        &self,
        voter_id: &UserId,
        post_ids: &[PostId],
    ) -> Result<Vec<VoteEntry>, GatewayError>;

    async fn write_vote(
        &self,
        post_id: &PostId,
        voter_id: &UserId,
        value: VoteValue,
    ) -> Result<(), GatewayError>;

    async fn write_option(
        &self,
        post_id: &PostId,
        kind: OptionKind,
        value: bool,
    ) -> Result<(), GatewayError>;

    async fn subscribe_document(
        &self,
        doc_path: &str,
        on_change: ChangeCallback,
    ) -> Result<DocumentSubscription, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn subscription_cancels_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let subscription = DocumentSubscription::new("posts/p1", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(subscription.path(), "posts/p1");
        subscription.unsubscribe();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_subscription_cancels() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        {
            let _subscription = DocumentSubscription::new("posts/p1", move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn gateway_error_converts_to_app_error() {
        let err: AppError = GatewayError::Timeout("query_posts".to_string()).into();
        assert!(err.is_fetch_failure());
        assert_eq!(err.to_string(), "Fetch failed: Request timed out: query_posts");
    }
}
