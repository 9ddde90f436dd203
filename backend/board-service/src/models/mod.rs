/// Data models for board-service
///
/// - `Post`: a message written on the board, with ownership metadata
/// - `PostView`: a post prepared for display
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// Format used for post timestamps on the list page (server local time)
pub const DISPLAY_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub posted_by: String,
    pub tracking_cookie: String,
    pub created_at: DateTime<Utc>,
}

/// Post after the display-time transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostView {
    pub id: i64,
    pub content: String,
    pub posted_by: String,
    pub created_at: String,
    pub deletable: bool,
}

impl PostView {
    pub fn new(post: &Post, deletable: bool) -> Self {
        Self {
            id: post.id,
            content: display_content(&post.content),
            posted_by: post.posted_by.clone(),
            created_at: format_timestamp(post.created_at),
            deletable,
        }
    }
}

/// Form submissions encode spaces as `+`; they are restored here, not in storage.
pub fn display_content(content: &str) -> String {
    content.replace('+', " ")
}

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format(DISPLAY_TIME_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(content: &str) -> Post {
        Post {
            id: 7,
            content: content.to_string(),
            posted_by: "alice".to_string(),
            tracking_cookie: "1_abc".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap(),
        }
    }

    #[test]
    fn test_display_content_restores_spaces() {
        assert_eq!(display_content("hello+world"), "hello world");
        assert_eq!(display_content("a++b"), "a  b");
        assert_eq!(display_content(""), "");
    }

    #[test]
    fn test_format_timestamp_uses_local_time() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 45).unwrap();
        let expected = ts.with_timezone(&Local).format("%Y/%m/%d %H:%M:%S").to_string();
        assert_eq!(format_timestamp(ts), expected);
        assert_eq!(expected.len(), "2024/03/01 12:30:45".len());
    }

    #[test]
    fn test_post_view_does_not_touch_stored_post() {
        let stored = post("hello+world");
        let view = PostView::new(&stored, true);

        assert_eq!(view.content, "hello world");
        assert_eq!(view.id, 7);
        assert!(view.deletable);
        assert_eq!(stored.content, "hello+world");
    }
}
