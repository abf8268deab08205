use crate::api::{Backend, BrandSettings, GenerateReplyRequest, Post, ReplyRecord, ThreadReplyRequest};
use crate::error::ApiResult;
use crate::message::AppEvent;
use crate::parser::now_timestamp;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Generate a reply for `post` and send it without confirmation.
///
/// Returns `Ok(None)` when the backend generated nothing, in which case
/// nothing is sent. A failure in either call ends the attempt; the post is
/// not marked and will not be tried again.
pub async fn auto_reply(
    backend: &dyn Backend,
    post: &Post,
    settings: &BrandSettings,
) -> ApiResult<Option<(Post, ReplyRecord)>> {
    let request = GenerateReplyRequest::for_post(post, &settings.default_tone, Some(settings));
    let text = backend.generate_reply(&request).await?;
    if text.is_empty() {
        return Ok(None);
    }

    let timestamp = now_timestamp();
    let updated = backend
        .send_reply(
            &post.id,
            &ThreadReplyRequest {
                username: settings.sender_handle(),
                text: text.clone(),
                timestamp: timestamp.clone(),
                auto_generated: Some(true),
            },
        )
        .await?;

    let record = ReplyRecord {
        tweet_id: post.id.clone(),
        text,
        timestamp,
        auto_generated: true,
        feedback: None,
    };
    Ok(Some((updated, record)))
}

/// Run [`auto_reply`] as its own task and report the outcome.
///
/// The task outlives the poll loop. Stopping polling does not cancel a
/// pipeline that already started.
pub fn spawn_auto_reply(
    backend: Arc<dyn Backend>,
    post: Post,
    settings: BrandSettings,
    events: mpsc::UnboundedSender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        match auto_reply(backend.as_ref(), &post, &settings).await {
            Ok(Some((updated, record))) => {
                info!(post_id = %post.id, "auto-reply sent");
                let _ = events.send(AppEvent::AutoReplied {
                    post: updated,
                    record,
                });
            }
            Ok(None) => {
                warn!(post_id = %post.id, "auto-reply skipped, backend generated no text");
            }
            Err(e) => {
                warn!(post_id = %post.id, error = %e, "auto-reply failed");
            }
        }
    })
}
