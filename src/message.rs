use crate::api::{BrandSettings, Feedback, Health, Post, ReplyRecord};
use crate::error::ApiResult;

/// Completion of an asynchronous action, folded into state by
/// [`AppState::apply`](crate::state::AppState::apply).
#[derive(Debug)]
pub enum AppEvent {
    Loaded {
        posts: ApiResult<Vec<Post>>,
        settings: ApiResult<Option<BrandSettings>>,
        replies: ApiResult<Vec<ReplyRecord>>,
    },
    Health(ApiResult<Health>),
    /// Posts the poll loop saw for the first time.
    PollMerged(Vec<Post>),
    /// An automatic reply went out; `post` is the backend's updated copy.
    AutoReplied {
        post: Post,
        record: ReplyRecord,
    },
    Generated {
        post_id: String,
        result: ApiResult<String>,
    },
    ReplySent {
        post_id: String,
        transmitted: String,
        result: ApiResult<Post>,
    },
    /// Fired once the "sent" confirmation has been on screen long enough.
    ReplyDelivered {
        post: Post,
        transmitted: String,
    },
    FeedbackSent {
        post_id: String,
        feedback: Feedback,
        result: ApiResult<()>,
    },
    SettingsSaved {
        submitted: BrandSettings,
        result: ApiResult<BrandSettings>,
    },
    Simulated(ApiResult<Post>),
}
