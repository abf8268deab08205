#![allow(dead_code)]

use async_trait::async_trait;
use replydesk::api::{
    Backend, BrandSettings, FeedbackRequest, GenerateReplyRequest, Health, Post, ReplyRecord,
    Sentiment, SimulateRequest, ThreadEntry, ThreadReplyRequest,
};
use replydesk::error::{ApiError, ApiResult};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory stand-in for the reply backend that records every call.
pub struct FakeBackend {
    pub posts: Mutex<Vec<Post>>,
    pub settings: Mutex<Option<BrandSettings>>,
    pub replies: Mutex<Vec<ReplyRecord>>,
    pub reply_text: Mutex<String>,
    pub fail_fetch: AtomicBool,
    pub fail_generate: AtomicBool,
    pub fail_send: AtomicBool,
    pub fetch_calls: AtomicUsize,
    /// Time a fetch spends in flight before answering.
    pub fetch_delay: Mutex<Option<Duration>>,
    /// Time generation spends in flight before answering.
    pub generate_delay: Mutex<Option<Duration>>,
    pub generated: Mutex<Vec<GenerateReplyRequest>>,
    pub sent: Mutex<Vec<(String, ThreadReplyRequest)>>,
    pub feedback: Mutex<Vec<FeedbackRequest>>,
    pub saved: Mutex<Vec<BrandSettings>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            posts: Mutex::new(Vec::new()),
            settings: Mutex::new(None),
            replies: Mutex::new(Vec::new()),
            reply_text: Mutex::new("Thanks for reaching out!".to_string()),
            fail_fetch: AtomicBool::new(false),
            fail_generate: AtomicBool::new(false),
            fail_send: AtomicBool::new(false),
            fetch_calls: AtomicUsize::new(0),
            fetch_delay: Mutex::new(None),
            generate_delay: Mutex::new(None),
            generated: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            feedback: Mutex::new(Vec::new()),
            saved: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn with_posts(posts: Vec<Post>, settings: Option<BrandSettings>) -> Self {
        let backend = Self::default();
        *backend.posts.lock().unwrap() = posts;
        *backend.settings.lock().unwrap() = settings;
        backend
    }

    pub fn push_post(&self, post: Post) {
        self.posts.lock().unwrap().insert(0, post);
    }

    pub fn delay_fetch(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub fn delay_generate(&self, delay: Duration) {
        *self.generate_delay.lock().unwrap() = Some(delay);
    }

    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn sent_ids(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}

pub fn unavailable(endpoint: &str) -> ApiError {
    ApiError::Status {
        endpoint: endpoint.to_string(),
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: "down".to_string(),
    }
}

pub fn post(id: &str, timestamp: &str) -> Post {
    Post {
        id: id.to_string(),
        username: format!("@user{}", id),
        text: format!("my order {} never arrived", id),
        timestamp: timestamp.to_string(),
        sentiment: Sentiment::Negative,
        thread: Vec::new(),
    }
}

pub fn brand(auto_reply: bool) -> BrandSettings {
    BrandSettings {
        brand_name: "Acme".to_string(),
        industry: "Retail".to_string(),
        default_tone: "Empathetic".to_string(),
        keywords: vec!["acme".to_string()],
        auto_reply_enabled: auto_reply,
        ..BrandSettings::default()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_posts(&self) -> ApiResult<Vec<Post>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_fetch.load(Ordering::SeqCst) {
            return Err(unavailable("/tweets"));
        }
        Ok(self.posts.lock().unwrap().clone())
    }

    async fn fetch_brand_settings(&self) -> ApiResult<Option<BrandSettings>> {
        Ok(self.settings.lock().unwrap().clone())
    }

    async fn save_brand_settings(&self, settings: &BrandSettings) -> ApiResult<BrandSettings> {
        self.saved.lock().unwrap().push(settings.clone());
        *self.settings.lock().unwrap() = Some(settings.clone());
        Ok(settings.clone())
    }

    async fn fetch_replies(&self) -> ApiResult<Vec<ReplyRecord>> {
        Ok(self.replies.lock().unwrap().clone())
    }

    async fn generate_reply(&self, request: &GenerateReplyRequest) -> ApiResult<String> {
        self.generated.lock().unwrap().push(request.clone());
        let delay = *self.generate_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_generate.load(Ordering::SeqCst) {
            return Err(unavailable("/generate-reply"));
        }
        Ok(self.reply_text.lock().unwrap().clone())
    }

    async fn send_reply(&self, post_id: &str, request: &ThreadReplyRequest) -> ApiResult<Post> {
        let endpoint = format!("/tweets/{}/thread", post_id);
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(unavailable(&endpoint));
        }
        self.sent
            .lock()
            .unwrap()
            .push((post_id.to_string(), request.clone()));

        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| ApiError::Status {
                endpoint: endpoint.clone(),
                status: reqwest::StatusCode::NOT_FOUND,
                body: "Tweet not found".to_string(),
            })?;
        post.thread.push(ThreadEntry::Reply {
            username: request.username.clone(),
            text: request.text.clone(),
            timestamp: request.timestamp.clone(),
            auto_generated: request.auto_generated.unwrap_or(false),
        });
        Ok(post.clone())
    }

    async fn send_feedback(&self, request: &FeedbackRequest) -> ApiResult<()> {
        self.feedback.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn simulate_post(&self, request: &SimulateRequest) -> ApiResult<Post> {
        let id = format!("sim{}", self.posts.lock().unwrap().len() + 1);
        let mut simulated = post(&id, "2025-05-17T12:00:00Z");
        if let Some(text) = &request.tweet_text {
            simulated.text = text.clone();
        }
        self.push_post(simulated.clone());
        Ok(simulated)
    }

    async fn health(&self) -> ApiResult<Health> {
        Ok(Health {
            status: "healthy".to_string(),
            api_version: "1.0.0".to_string(),
            openai_configured: false,
            timestamp: "2025-05-17T12:00:00Z".to_string(),
        })
    }
}
