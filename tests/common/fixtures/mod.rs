use chrono::{Duration, TimeZone, Utc};
use community_feed::domain::entities::{Post, VoteEntry};
use community_feed::domain::value_objects::{PostId, ScopeId, UserId, VoteValue};

pub fn scope(id: &str) -> ScopeId {
    ScopeId::new(id.to_string()).unwrap()
}

pub fn post_id(id: &str) -> PostId {
    PostId::new(id.to_string()).unwrap()
}

pub fn user(id: &str) -> UserId {
    UserId::new(id.to_string()).unwrap()
}

pub fn create_test_post(id: &str, scope_id: &str, vote_score: i64) -> Post {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let mut post = Post::new_with_id(
        post_id(id),
        scope(scope_id),
        user("author"),
        format!("Test post {id}"),
        format!("Test post content {id}"),
        base - Duration::minutes(vote_score.abs()),
    );
    post.vote_score = vote_score;
    post
}

/// `{prefix}-00`, `{prefix}-01`, ... をスコア降順で並ぶように作る
pub fn create_ranked_posts(prefix: &str, scope_id: &str, count: usize) -> Vec<Post> {
    (0..count)
        .map(|i| create_test_post(&format!("{prefix}-{i:02}"), scope_id, 1000 - i as i64))
        .collect()
}

pub fn vote(post: &str, voter: &str, value: VoteValue) -> VoteEntry {
    VoteEntry::new(post_id(post), user(voter), value)
}

pub fn ids(posts: &[Post]) -> Vec<String> {
    posts.iter().map(|post| post.id.to_string()).collect()
}
