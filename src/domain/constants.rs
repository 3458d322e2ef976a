/// 1ページあたりの投稿数
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// 次ページ読み込みを開始するスクロール比率
pub const DEFAULT_SCROLL_THRESHOLD: f64 = 0.8;

pub const POSTS_COLLECTION: &str = "posts";

pub fn post_document_path(post_id: &str) -> String {
    format!("{POSTS_COLLECTION}/{post_id}")
}
