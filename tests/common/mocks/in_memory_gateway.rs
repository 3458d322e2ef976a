use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use community_feed::application::ports::document_gateway::{
    ChangeCallback, DocumentChange, DocumentGateway, DocumentSubscription, GatewayError,
};
use community_feed::domain::entities::{Post, VoteEntry};
use community_feed::domain::value_objects::{
    OptionKind, OrderSpec, PostId, ScopeId, UserId, VoteValue,
};

type Subscribers = Arc<Mutex<HashMap<String, Vec<(u64, ChangeCallback)>>>>;

/// 状態を持つゲートウェイのフェイク。呼び出し回数の記録と失敗の注入ができる
#[derive(Default)]
pub struct InMemoryGateway {
    posts: Mutex<Vec<Post>>,
    votes: Mutex<Vec<VoteEntry>>,
    options: Mutex<Vec<(PostId, OptionKind, bool)>>,
    subscribers: Subscribers,
    next_subscription: AtomicU64,
    query_posts_calls: AtomicUsize,
    query_votes_calls: AtomicUsize,
    write_vote_calls: AtomicUsize,
    write_option_calls: AtomicUsize,
    requested_limits: Mutex<Vec<usize>>,
    fail_queries: AtomicBool,
    fail_vote_queries: AtomicBool,
    fail_writes: AtomicBool,
    yield_on_query: AtomicBool,
    query_delay: Mutex<Option<Duration>>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        let gateway = Self::new();
        *gateway.posts.lock().unwrap() = posts;
        gateway
    }

    pub fn add_post(&self, post: Post) {
        self.posts.lock().unwrap().push(post);
    }

    pub fn add_votes(&self, entries: Vec<VoteEntry>) {
        self.votes.lock().unwrap().extend(entries);
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_vote_queries(&self, fail: bool) {
        self.fail_vote_queries.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// クエリの途中で一度制御を返し、同時トリガーを再現できるようにする
    pub fn yield_on_query(&self, enabled: bool) {
        self.yield_on_query.store(enabled, Ordering::SeqCst);
    }

    /// 投稿クエリの応答を遅らせる
    pub fn delay_queries(&self, delay: Option<Duration>) {
        *self.query_delay.lock().unwrap() = delay;
    }

    pub fn query_posts_calls(&self) -> usize {
        self.query_posts_calls.load(Ordering::SeqCst)
    }

    pub fn query_votes_calls(&self) -> usize {
        self.query_votes_calls.load(Ordering::SeqCst)
    }

    pub fn write_vote_calls(&self) -> usize {
        self.write_vote_calls.load(Ordering::SeqCst)
    }

    pub fn write_option_calls(&self) -> usize {
        self.write_option_calls.load(Ordering::SeqCst)
    }

    pub fn requested_limits(&self) -> Vec<usize> {
        self.requested_limits.lock().unwrap().clone()
    }

    pub fn stored_vote(&self, post_id: &PostId, voter_id: &UserId) -> Option<VoteValue> {
        self.votes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|entry| &entry.post_id == post_id && &entry.voter_id == voter_id)
            .map(|entry| entry.value)
    }

    pub fn subscriber_count(&self, path: &str) -> usize {
        self.subscribers
            .lock()
            .unwrap()
            .get(path)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// 購読者へ変更を通知する
    pub fn emit(&self, path: &str, data: serde_json::Value) {
        let callbacks: Vec<ChangeCallback> = self
            .subscribers
            .lock()
            .unwrap()
            .get(path)
            .map(|subs| subs.iter().map(|(_, cb)| cb.clone()).collect())
            .unwrap_or_default();
        for callback in callbacks {
            callback(DocumentChange {
                path: path.to_string(),
                data: data.clone(),
            });
        }
    }
}

#[async_trait]
impl DocumentGateway for InMemoryGateway {
    async fn query_posts(
        &self,
        scope: &ScopeId,
        order: &OrderSpec,
        limit: usize,
    ) -> Result<Vec<Post>, GatewayError> {
        self.query_posts_calls.fetch_add(1, Ordering::SeqCst);
        self.requested_limits.lock().unwrap().push(limit);
        if self.yield_on_query.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
        let delay = *self.query_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(GatewayError::Timeout("query_posts".to_string()));
        }

        let mut posts: Vec<Post> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|post| &post.scope_id == scope)
            .cloned()
            .collect();
        posts.sort_by(|a, b| order.compare(a, b));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn query_votes(
        &self,
        voter_id: &UserId,
        post_ids: &[PostId],
    ) -> Result<Vec<VoteEntry>, GatewayError> {
        self.query_votes_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_vote_queries.load(Ordering::SeqCst) {
            return Err(GatewayError::Unavailable("votes".to_string()));
        }
        Ok(self
            .votes
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| &entry.voter_id == voter_id && post_ids.contains(&entry.post_id))
            .cloned()
            .collect())
    }

    async fn write_vote(
        &self,
        post_id: &PostId,
        voter_id: &UserId,
        value: VoteValue,
    ) -> Result<(), GatewayError> {
        self.write_vote_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected("write_vote".to_string()));
        }
        self.votes.lock().unwrap().push(VoteEntry::new(
            post_id.clone(),
            voter_id.clone(),
            value,
        ));
        Ok(())
    }

    async fn write_option(
        &self,
        post_id: &PostId,
        kind: OptionKind,
        value: bool,
    ) -> Result<(), GatewayError> {
        self.write_option_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected("write_option".to_string()));
        }
        self.options
            .lock()
            .unwrap()
            .push((post_id.clone(), kind, value));
        Ok(())
    }

    async fn subscribe_document(
        &self,
        doc_path: &str,
        on_change: ChangeCallback,
    ) -> Result<DocumentSubscription, GatewayError> {
        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        self.subscribers
            .lock()
            .unwrap()
            .entry(doc_path.to_string())
            .or_default()
            .push((id, on_change));

        let subscribers = self.subscribers.clone();
        let path = doc_path.to_string();
        Ok(DocumentSubscription::new(doc_path, move || {
            if let Ok(mut subs) = subscribers.lock() {
                if let Some(list) = subs.get_mut(&path) {
                    list.retain(|(sub_id, _)| *sub_id != id);
                    if list.is_empty() {
                        subs.remove(&path);
                    }
                }
            }
        }))
    }
}
