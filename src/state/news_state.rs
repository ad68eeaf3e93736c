//! News feed state.

use crate::api::{NewsPage, PageToken};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Banner shown when a fetch fails; details go to the log.
pub const NEWS_ERROR_MESSAGE: &str = "Failed to fetch news. Please try again later.";

/// A normalized news entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Source id, or `"{title}-{published_at}"` when the source has none.
    pub id: String,
    pub title: String,
    /// Article URL; may be empty.
    pub link: String,
    pub description: String,
    /// ISO-8601 publication time.
    pub published_at: String,
    pub image_url: Option<String>,
    /// Source title then sentiment, when present.
    pub categories: Vec<String>,
}

impl NewsItem {
    /// Parsed publication time, if the source sent a valid timestamp.
    pub fn published(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.published_at)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// How a loaded page combines with the current items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// First page after a refresh or retry.
    Replace,
    /// Next page from "load more".
    Append,
}

/// State for the news feed session.
#[derive(Debug, Default)]
pub struct NewsState {
    /// Loaded items, in arrival order. Append-only between resets.
    pub items: Vec<NewsItem>,
    /// Cursor for the next page.
    pub next: Option<PageToken>,
    /// A fetch is in flight.
    pub loading: bool,
    /// User-facing error banner.
    pub error: Option<String>,
    /// Currently selected item index.
    pub selected_index: Option<usize>,
    /// Last successful load.
    pub last_updated: Option<DateTime<Utc>>,
}

impl NewsState {
    /// Start a full reload: clears items, cursor and error.
    ///
    /// Returns `false` without touching state if a fetch is already in flight.
    pub fn begin_refresh(&mut self) -> bool {
        if self.loading {
            return false;
        }
        self.items.clear();
        self.next = None;
        self.error = None;
        self.selected_index = None;
        self.loading = true;
        true
    }

    /// Take the cursor for "load more".
    ///
    /// `None` means there is nothing to do (no further pages, or a fetch is
    /// already running) and the state is unchanged.
    pub fn begin_load_more(&mut self) -> Option<PageToken> {
        if self.loading {
            return None;
        }
        let token = self.next.clone()?;
        self.loading = true;
        Some(token)
    }

    /// Apply a fetched page.
    pub fn page_loaded(&mut self, page: NewsPage, mode: LoadMode) {
        match mode {
            LoadMode::Replace => {
                self.items = page.items;
                self.selected_index = if self.items.is_empty() { None } else { Some(0) };
            }
            LoadMode::Append => {
                self.items.extend(page.items);
                if self.selected_index.is_none() && !self.items.is_empty() {
                    self.selected_index = Some(0);
                }
            }
        }
        self.next = page.next;
        self.loading = false;
        self.error = None;
        self.last_updated = Some(Utc::now());
    }

    /// Record a failed fetch. Items and cursor are left as they were.
    pub fn load_failed(&mut self) {
        self.loading = false;
        self.error = Some(NEWS_ERROR_MESSAGE.to_string());
    }

    /// Whether "load more" is currently possible.
    pub fn can_load_more(&self) -> bool {
        !self.loading && self.next.is_some()
    }

    /// Get the currently selected item.
    pub fn selected_item(&self) -> Option<&NewsItem> {
        self.selected_index.and_then(|i| self.items.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(id: &str) -> NewsItem {
        NewsItem {
            id: id.to_string(),
            title: format!("title {id}"),
            link: String::new(),
            description: String::new(),
            published_at: "2024-01-01T00:00:00.000Z".to_string(),
            image_url: None,
            categories: vec![],
        }
    }

    fn page(ids: &[&str], next: Option<&str>) -> NewsPage {
        NewsPage {
            items: ids.iter().map(|id| item(id)).collect(),
            next: next.map(PageToken::new),
        }
    }

    fn ids(state: &NewsState) -> Vec<&str> {
        state.items.iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_load_more_without_cursor_is_noop() {
        let mut state = NewsState::default();
        assert!(state.begin_refresh());
        state.page_loaded(page(&["a", "b"], None), LoadMode::Replace);

        assert_eq!(state.begin_load_more(), None);
        assert_eq!(ids(&state), vec!["a", "b"]);
        assert_eq!(state.next, None);
        assert!(!state.loading);
    }

    #[test]
    fn test_load_more_appends_in_order() {
        let mut state = NewsState::default();
        state.begin_refresh();
        state.page_loaded(page(&["a", "b"], Some("2")), LoadMode::Replace);

        let token = state.begin_load_more().unwrap();
        assert_eq!(token.page(), "2");
        assert!(state.loading);

        state.page_loaded(page(&["c", "d"], Some("3")), LoadMode::Append);
        assert_eq!(ids(&state), vec!["a", "b", "c", "d"]);
        assert_eq!(state.next, Some(PageToken::new("3")));
    }

    #[test]
    fn test_load_more_refused_while_loading() {
        let mut state = NewsState::default();
        state.next = Some(PageToken::new("2"));
        state.loading = true;
        assert_eq!(state.begin_load_more(), None);
        assert_eq!(state.next, Some(PageToken::new("2")));
    }

    #[test]
    fn test_refresh_is_full_reset() {
        let mut state = NewsState::default();
        state.begin_refresh();
        state.page_loaded(page(&["a", "b"], Some("2")), LoadMode::Replace);
        state.begin_load_more();
        state.load_failed();
        assert_eq!(state.error.as_deref(), Some(NEWS_ERROR_MESSAGE));

        assert!(state.begin_refresh());
        assert!(state.items.is_empty());
        assert_eq!(state.next, None);
        assert_eq!(state.error, None);

        state.page_loaded(page(&["x", "y", "z"], Some("2")), LoadMode::Replace);
        assert_eq!(ids(&state), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_failed_load_more_keeps_items_and_cursor() {
        let mut state = NewsState::default();
        state.begin_refresh();
        state.page_loaded(page(&["a"], Some("2")), LoadMode::Replace);

        state.begin_load_more();
        state.load_failed();

        assert_eq!(ids(&state), vec!["a"]);
        assert_eq!(state.next, Some(PageToken::new("2")));
        assert!(state.can_load_more());
    }

    #[test]
    fn test_refresh_refused_while_loading() {
        let mut state = NewsState::default();
        assert!(state.begin_refresh());
        assert!(!state.begin_refresh());
    }

    #[test]
    fn test_published_parses_rfc3339() {
        let mut news = item("a");
        assert!(news.published().is_some());
        news.published_at = "yesterday".to_string();
        assert!(news.published().is_none());
    }
}
