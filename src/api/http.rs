use super::{
    Backend, BrandSettings, FeedbackRequest, GenerateReplyRequest, Health, Post, ReplyRecord,
    SimulateRequest, ThreadReplyRequest,
};
use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

const USER_AGENT: &str = concat!("replydesk/", env!("CARGO_PKG_VERSION"));

/// `GET /tweets` answers either with a wrapper object or a bare array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PostsPayload {
    Wrapped { tweets: Vec<Post> },
    Bare(Vec<Post>),
}

impl PostsPayload {
    fn into_posts(self) -> Vec<Post> {
        match self {
            PostsPayload::Wrapped { tweets } => tweets,
            PostsPayload::Bare(tweets) => tweets,
        }
    }
}

/// `POST /brand-settings` echoes the settings, possibly wrapped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SettingsPayload {
    Wrapped { settings: BrandSettings },
    Bare(BrandSettings),
}

#[derive(Debug, Deserialize)]
struct GenerateReplyResponse {
    #[serde(default)]
    reply: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SimulateResponse {
    tweet: Post,
}

/// [`Backend`] over the JSON REST API.
///
/// No retries and no request timeouts: a failed call surfaces as an error
/// and the caller decides whether to try again.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(endpoint = path, "GET");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| ApiError::Http {
                endpoint: path.to_string(),
                source,
            })?;
        decode(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(endpoint = path, "POST");
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::Http {
                endpoint: path.to_string(),
                source,
            })?;
        decode(path, response).await
    }
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: reqwest::Response) -> ApiResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(|source| ApiError::Http {
        endpoint: endpoint.to_string(),
        source,
    })?;

    if !status.is_success() {
        return Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status,
            body,
        });
    }

    serde_json::from_str(&body).map_err(|source| ApiError::Decode {
        endpoint: endpoint.to_string(),
        source,
    })
}

/// An empty object (or `null`) means nothing has been configured yet.
fn settings_from_value(
    endpoint: &str,
    value: serde_json::Value,
) -> ApiResult<Option<BrandSettings>> {
    let empty = match &value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if empty {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
}

fn thread_path(post_id: &str) -> String {
    format!("/tweets/{}/thread", urlencoding::encode(post_id))
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_posts(&self) -> ApiResult<Vec<Post>> {
        let payload: PostsPayload = self.get_json("/tweets").await?;
        Ok(payload.into_posts())
    }

    async fn fetch_brand_settings(&self) -> ApiResult<Option<BrandSettings>> {
        let endpoint = "/brand-settings";
        let value: serde_json::Value = self.get_json(endpoint).await?;
        settings_from_value(endpoint, value)
    }

    async fn save_brand_settings(&self, settings: &BrandSettings) -> ApiResult<BrandSettings> {
        let payload: SettingsPayload = self.post_json("/brand-settings", settings).await?;
        Ok(match payload {
            SettingsPayload::Wrapped { settings } => settings,
            SettingsPayload::Bare(settings) => settings,
        })
    }

    async fn fetch_replies(&self) -> ApiResult<Vec<ReplyRecord>> {
        let replies: Option<Vec<ReplyRecord>> = self.get_json("/replies").await?;
        Ok(replies.unwrap_or_default())
    }

    async fn generate_reply(&self, request: &GenerateReplyRequest) -> ApiResult<String> {
        let response: GenerateReplyResponse = self.post_json("/generate-reply", request).await?;
        Ok(response.reply.unwrap_or_default())
    }

    async fn send_reply(&self, post_id: &str, request: &ThreadReplyRequest) -> ApiResult<Post> {
        self.post_json(&thread_path(post_id), request).await
    }

    async fn send_feedback(&self, request: &FeedbackRequest) -> ApiResult<()> {
        let _ack: serde_json::Value = self.post_json("/feedback", request).await?;
        Ok(())
    }

    async fn simulate_post(&self, request: &SimulateRequest) -> ApiResult<Post> {
        let response: SimulateResponse = self.post_json("/simulate-new-tweet", request).await?;
        Ok(response.tweet)
    }

    async fn health(&self) -> ApiResult<Health> {
        self.get_json("/health").await
    }
}
