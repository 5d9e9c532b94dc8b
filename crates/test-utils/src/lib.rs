//! Newsdesk test utilities.
//!
//! Fixture builders for content payloads, shared by the kernel's
//! integration tests.

use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Body text long enough to pass validation.
pub const VALID_CONTENT: &str = "This body is comfortably longer than fifteen characters.";

/// Create a test post with a valid body.
pub fn test_post(title: &str) -> TestPost {
    TestPost {
        title: title.to_string(),
        content: VALID_CONTENT.to_string(),
        extra: serde_json::Map::new(),
    }
}

/// A unique token, e.g. `abc-0190a6f4c2d1`, for titles that must not collide
/// with rows written by other tests.
pub fn unique_marker(prefix: &str) -> String {
    let id = Uuid::now_v7().simple().to_string();
    // The tail of a v7 id carries the random bits.
    format!("{prefix}-{}", &id[id.len() - 12..])
}

/// A content payload builder for creating test fixtures.
#[derive(Debug, Clone)]
pub struct TestPost {
    pub title: String,
    pub content: String,
    extra: serde_json::Map<String, JsonValue>,
}

impl TestPost {
    /// Set the body text.
    pub fn with_content(mut self, content: &str) -> Self {
        self.content = content.to_string();
        self
    }

    /// Add an arbitrary field, e.g. a client-supplied `id` the server must
    /// ignore.
    pub fn with_field(mut self, name: &str, value: JsonValue) -> Self {
        self.extra.insert(name.to_string(), value);
        self
    }

    /// Render as a JSON request body.
    pub fn to_json(&self) -> JsonValue {
        let mut body = self.extra.clone();
        body.insert("title".to_string(), JsonValue::String(self.title.clone()));
        body.insert(
            "content".to_string(),
            JsonValue::String(self.content.clone()),
        );
        JsonValue::Object(body)
    }

    /// Render as a serialized JSON request body.
    pub fn to_body(&self) -> String {
        self.to_json().to_string()
    }
}
