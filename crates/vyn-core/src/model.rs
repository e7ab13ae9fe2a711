//! UI-agnostic feed data types
//!
//! These are shared by every front end and carry no presentation logic; see
//! [`crate::classify`] for how posts are banded for display.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single location fix. Produced once per acquisition, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
}

/// Which source the feed is pulled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedMode {
    #[default]
    Demo,
    Live,
}

impl FeedMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedMode::Demo => "demo",
            FeedMode::Live => "live",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "demo" => Some(FeedMode::Demo),
            "live" => Some(FeedMode::Live),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            FeedMode::Demo => FeedMode::Live,
            FeedMode::Live => FeedMode::Demo,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FeedMode::Demo => "Demo feed",
            FeedMode::Live => "Live news",
        }
    }
}

/// Post ids arrive either as strings (analyzed demo data) or integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PostId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostId::Number(n) => write!(f, "{}", n),
            PostId::Text(s) => f.write_str(s),
        }
    }
}

/// A read-only snapshot of a post as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub username: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub caption: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub likes: Option<u64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub flag: String,
    #[serde(default)]
    pub risk_score: Option<f64>,
    #[serde(default)]
    pub ai_image_probability: Option<f64>,
}

/// Explicit `null` reads the same as a missing key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl Post {
    /// Empty image urls are treated the same as a missing one.
    pub fn image(&self) -> Option<&str> {
        self.image_url.as_deref().filter(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_accepts_string_and_numeric_ids() {
        let posts: Vec<Post> = serde_json::from_str(
            r#"[{"id": 1, "username": "a"}, {"id": "demo_scam_1", "username": "b"}]"#,
        )
        .unwrap();

        assert_eq!(posts[0].id, PostId::Number(1));
        assert_eq!(posts[1].id.to_string(), "demo_scam_1");
    }

    #[test]
    fn test_post_optional_fields_default() {
        let post: Post = serde_json::from_str(r#"{"id": 7, "username": "x"}"#).unwrap();

        assert_eq!(post.caption, "");
        assert_eq!(post.flag, "");
        assert!(post.likes.is_none());
        assert!(post.risk_score.is_none());
        assert!(post.ai_image_probability.is_none());
        assert!(post.image().is_none());
    }

    #[test]
    fn test_post_null_fields_are_absent() {
        let post: Post = serde_json::from_str(
            r#"{"id": 7, "username": "x", "image_url": null, "risk_score": null, "likes": null}"#,
        )
        .unwrap();

        assert!(post.image().is_none());
        assert!(post.risk_score.is_none());
        assert!(post.likes.is_none());
    }

    #[test]
    fn test_null_text_fields_keep_the_rest_of_the_feed() {
        let posts: Vec<Post> = serde_json::from_str(
            r#"[
                {"id": 1, "username": "a", "flag": "Safe", "risk_score": 10},
                {"id": 2, "username": null, "flag": null, "caption": null, "risk_score": -1}
            ]"#,
        )
        .unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].flag, "Safe");
        assert_eq!(posts[1].username, "");
        assert_eq!(posts[1].flag, "");
        assert_eq!(posts[1].caption, "");
    }

    #[test]
    fn test_blank_image_url_means_no_image() {
        let post: Post =
            serde_json::from_str(r#"{"id": 1, "username": "x", "image_url": "  "}"#).unwrap();
        assert!(post.image().is_none());
    }

    #[test]
    fn test_feed_mode_round_trip_names() {
        assert_eq!(FeedMode::from_str("LIVE"), Some(FeedMode::Live));
        assert_eq!(FeedMode::from_str(FeedMode::Demo.as_str()), Some(FeedMode::Demo));
        assert_eq!(FeedMode::from_str("cached"), None);
        assert_eq!(FeedMode::Demo.toggled(), FeedMode::Live);
        assert_eq!(FeedMode::Live.toggled(), FeedMode::Demo);
    }
}
