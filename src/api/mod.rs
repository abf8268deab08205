pub mod http;

pub use http::HttpBackend;

use crate::error::ApiResult;
use crate::parser::{de_id, de_null_default};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Urgent,
    #[default]
    Unknown,
}

impl Sentiment {
    /// Categories drawn in the sentiment distribution, in display order.
    pub const CHARTED: [Sentiment; 4] = [
        Sentiment::Positive,
        Sentiment::Neutral,
        Sentiment::Negative,
        Sentiment::Urgent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Urgent => "urgent",
            Sentiment::Unknown => "unknown",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
            Sentiment::Urgent => "Urgent",
            Sentiment::Unknown => "Unknown",
        }
    }
}

impl From<&str> for Sentiment {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "neutral" => Sentiment::Neutral,
            "negative" => Sentiment::Negative,
            "urgent" => Sentiment::Urgent,
            _ => Sentiment::Unknown,
        }
    }
}

impl From<Option<String>> for Sentiment {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(Sentiment::from).unwrap_or_default()
    }
}

impl From<Sentiment> for String {
    fn from(sentiment: Sentiment) -> Self {
        sentiment.as_str().to_string()
    }
}

/// One entry of a post's reply thread.
///
/// Older backends store bare strings; current ones store the full reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThreadEntry {
    Text(String),
    Reply {
        #[serde(default)]
        username: String,
        text: String,
        #[serde(default)]
        timestamp: String,
        #[serde(default)]
        auto_generated: bool,
    },
}

impl ThreadEntry {
    pub fn text(&self) -> &str {
        match self {
            ThreadEntry::Text(text) => text,
            ThreadEntry::Reply { text, .. } => text,
        }
    }
}

/// A post ingested from the backend feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default, deserialize_with = "de_null_default")]
    pub thread: Vec<ThreadEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Positive,
    Negative,
}

impl Feedback {
    pub fn label(&self) -> &'static str {
        match self {
            Feedback::Positive => "Good",
            Feedback::Negative => "Needs improvement",
        }
    }
}

/// Log entry for a reply sent by this client, manual or automatic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyRecord {
    #[serde(deserialize_with = "de_id")]
    pub tweet_id: String,
    #[serde(default, alias = "reply")]
    pub text: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub auto_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

pub const TONES: [&str; 6] = [
    "Friendly",
    "Professional",
    "Witty",
    "Empathetic",
    "Formal",
    "Casual",
];

pub const INDUSTRIES: [&str; 8] = [
    "Technology",
    "Retail",
    "Healthcare",
    "Finance",
    "Education",
    "Entertainment",
    "Food & Beverage",
    "Other",
];

/// The tenant configuration. Always saved and replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandSettings {
    pub brand_name: String,
    pub industry: String,
    pub default_tone: String,
    pub reply_speed: String,
    pub max_daily_replies: u32,
    #[serde(deserialize_with = "de_null_default")]
    pub keywords: Vec<String>,
    pub auto_reply_enabled: bool,
}

impl Default for BrandSettings {
    fn default() -> Self {
        Self {
            brand_name: String::new(),
            industry: INDUSTRIES[0].to_string(),
            default_tone: TONES[0].to_string(),
            reply_speed: "Fast".to_string(),
            max_daily_replies: 50,
            keywords: Vec::new(),
            auto_reply_enabled: false,
        }
    }
}

impl BrandSettings {
    /// Handle the backend posts replies under, e.g. `@acme_support`.
    pub fn sender_handle(&self) -> String {
        let name = self.brand_name.trim();
        let name = if name.is_empty() { "brand" } else { name };
        format!("@{}_support", name)
    }

    /// Add a keyword; blank or already present keywords are ignored.
    pub fn add_keyword(&mut self, keyword: &str) -> bool {
        let keyword = keyword.trim();
        if keyword.is_empty() || self.keywords.iter().any(|k| k == keyword) {
            return false;
        }
        self.keywords.push(keyword.to_string());
        true
    }

    pub fn remove_keyword(&mut self, keyword: &str) -> bool {
        let before = self.keywords.len();
        self.keywords.retain(|k| k != keyword);
        self.keywords.len() != before
    }

    pub fn tone_or_default(&self) -> &str {
        if self.default_tone.trim().is_empty() {
            TONES[0]
        } else {
            &self.default_tone
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateReplyRequest {
    pub tweet_id: String,
    pub tweet_text: String,
    pub tone: String,
    pub brand_name: String,
    pub industry: String,
}

impl GenerateReplyRequest {
    pub fn for_post(post: &Post, tone: &str, settings: Option<&BrandSettings>) -> Self {
        Self {
            tweet_id: post.id.clone(),
            tweet_text: post.text.clone(),
            tone: tone.to_string(),
            brand_name: settings.map(|s| s.brand_name.clone()).unwrap_or_default(),
            industry: settings.map(|s| s.industry.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadReplyRequest {
    pub username: String,
    pub text: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_generated: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRequest {
    pub tweet_id: String,
    pub reply: String,
    pub feedback: Feedback,
    pub tone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tweet_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Health {
    pub status: String,
    pub api_version: String,
    pub openai_configured: bool,
    pub timestamp: String,
}

impl Health {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// The REST surface of the reply backend.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn fetch_posts(&self) -> ApiResult<Vec<Post>>;

    /// `None` when the backend has no settings stored yet.
    async fn fetch_brand_settings(&self) -> ApiResult<Option<BrandSettings>>;

    async fn save_brand_settings(&self, settings: &BrandSettings) -> ApiResult<BrandSettings>;

    async fn fetch_replies(&self) -> ApiResult<Vec<ReplyRecord>>;

    /// Generated reply text; empty when the backend produced nothing.
    async fn generate_reply(&self, request: &GenerateReplyRequest) -> ApiResult<String>;

    /// Append a reply to a post's thread and return the updated post.
    async fn send_reply(&self, post_id: &str, request: &ThreadReplyRequest) -> ApiResult<Post>;

    async fn send_feedback(&self, request: &FeedbackRequest) -> ApiResult<()>;

    async fn simulate_post(&self, request: &SimulateRequest) -> ApiResult<Post>;

    async fn health(&self) -> ApiResult<Health>;
}
