use crate::domain::entities::{OverlaySnapshot, PostOptions, VoteEntry};
use crate::domain::value_objects::{OptionKind, PostId, UserId, VoteValue};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Default)]
struct OverlayState {
    active_voter: Option<UserId>,
    votes: HashMap<(PostId, UserId), VoteValue>,
    options: HashMap<PostId, PostOptions>,
}

impl OverlayState {
    fn vote_of(&self, post_id: &PostId, voter_id: &UserId) -> VoteValue {
        self.votes
            .get(&(post_id.clone(), voter_id.clone()))
            .copied()
            .unwrap_or_default()
    }

    fn set_vote(&mut self, post_id: &PostId, voter_id: &UserId, value: VoteValue) -> VoteValue {
        let key = (post_id.clone(), voter_id.clone());
        let previous = if value.is_neutral() {
            self.votes.remove(&key)
        } else {
            self.votes.insert(key, value)
        };
        previous.unwrap_or_default()
    }

    fn snapshot(&self, post_id: &PostId, voter_id: Option<&UserId>) -> OverlaySnapshot {
        OverlaySnapshot {
            vote_value: voter_id
                .map(|voter| self.vote_of(post_id, voter))
                .unwrap_or_default(),
            options: self.options.get(post_id).copied().unwrap_or_default(),
        }
    }
}

/// 投稿ごとの閲覧者状態（投票値・非表示・保存・通報）を保持するストア。
///
/// 投稿本体のデータとは独立しており、フィードキャッシュを再取得しても
/// ここに積んだ楽観的更新は失われない。
#[derive(Clone, Default)]
pub struct PostOverlayStore {
    state: Arc<RwLock<OverlayState>>,
}

impl PostOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_voter(voter_id: UserId) -> Self {
        Self {
            state: Arc::new(RwLock::new(OverlayState {
                active_voter: Some(voter_id),
                ..OverlayState::default()
            })),
        }
    }

    pub async fn set_active_voter(&self, voter_id: Option<UserId>) {
        let mut state = self.state.write().await;
        state.active_voter = voter_id;
    }

    pub async fn active_voter(&self) -> Option<UserId> {
        self.state.read().await.active_voter.clone()
    }

    /// 投票値を設定し、直前の値を返す
    pub async fn set_vote(&self, post_id: &PostId, voter_id: &UserId, value: VoteValue) -> VoteValue {
        let mut state = self.state.write().await;
        state.set_vote(post_id, voter_id, value)
    }

    pub async fn vote_of(&self, post_id: &PostId, voter_id: &UserId) -> VoteValue {
        self.state.read().await.vote_of(post_id, voter_id)
    }

    /// オプションを設定し、直前の値を返す
    pub async fn set_option(&self, post_id: &PostId, kind: OptionKind, value: bool) -> bool {
        let mut state = self.state.write().await;
        let options = state.options.entry(post_id.clone()).or_default();
        let previous = options.get(kind);
        options.set(kind, value);
        previous
    }

    pub async fn option_of(&self, post_id: &PostId, kind: OptionKind) -> bool {
        self.state
            .read()
            .await
            .options
            .get(post_id)
            .map(|options| options.get(kind))
            .unwrap_or(false)
    }

    /// アクティブな投票者から見たスナップショット
    pub async fn resolve(&self, post_id: &PostId) -> OverlaySnapshot {
        let state = self.state.read().await;
        state.snapshot(post_id, state.active_voter.as_ref())
    }

    pub async fn resolve_for(&self, post_id: &PostId, voter_id: &UserId) -> OverlaySnapshot {
        self.state.read().await.snapshot(post_id, Some(voter_id))
    }

    /// 複数投稿を一度のロックで解決する
    pub async fn resolve_many(&self, post_ids: &[PostId]) -> Vec<OverlaySnapshot> {
        let state = self.state.read().await;
        let voter = state.active_voter.as_ref();
        post_ids
            .iter()
            .map(|post_id| state.snapshot(post_id, voter))
            .collect()
    }

    /// 取得した投票を反映する。同じ (投稿, 投票者) が複数あれば後のものを採用する。
    pub async fn reconcile_votes(&self, entries: Vec<VoteEntry>) -> usize {
        let mut state = self.state.write().await;
        let count = entries.len();
        for entry in entries {
            state.set_vote(&entry.post_id, &entry.voter_id, entry.value);
        }
        debug!(count, "vote overlay reconciled");
        count
    }

    /// 投票とオプションを破棄する。アクティブな投票者は残す
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        state.votes.clear();
        state.options.clear();
    }
}
