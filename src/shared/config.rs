use serde::{Deserialize, Serialize};

use crate::domain::constants::{DEFAULT_PAGE_SIZE, DEFAULT_SCROLL_THRESHOLD};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub overlay: OverlayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    pub page_size: usize,
    /// スクロール位置 / スクロール可能な高さ がこの値以上で次ページを読む
    pub scroll_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverlayConfig {
    pub fetch_votes: bool,
    #[serde(default = "default_true")]
    pub live_updates: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed: FeedConfig::default(),
            overlay: OverlayConfig::default(),
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            scroll_threshold: DEFAULT_SCROLL_THRESHOLD,
        }
    }
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            fetch_votes: true,
            live_updates: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(value) = std::env::var("FEED_PAGE_SIZE")
            .ok()
            .and_then(|v| parse_usize(&v))
        {
            cfg.feed.page_size = value;
        }
        if let Some(value) = std::env::var("FEED_SCROLL_THRESHOLD")
            .ok()
            .and_then(|v| parse_f64(&v))
        {
            cfg.feed.scroll_threshold = value;
        }
        if let Ok(v) = std::env::var("FEED_FETCH_VOTES") {
            cfg.overlay.fetch_votes = parse_bool(&v, cfg.overlay.fetch_votes);
        }
        if let Ok(v) = std::env::var("FEED_LIVE_UPDATES") {
            cfg.overlay.live_updates = parse_bool(&v, cfg.overlay.live_updates);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.feed.page_size == 0 {
            return Err("Feed page_size must be greater than 0".to_string());
        }
        if !(self.feed.scroll_threshold > 0.0 && self.feed.scroll_threshold <= 1.0) {
            return Err(format!(
                "Feed scroll_threshold must be within (0, 1], got {}",
                self.feed.scroll_threshold
            ));
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}

fn parse_f64(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}
