//! Manual reply workflow for the selected post.
//!
//! ```text
//! Idle -> Generating -> Generated <-> Editing
//!                          |            |
//!                          +-> Sending <+
//!                                 |
//!                               Sent -> Idle
//! ```

use crate::api::{Feedback, FeedbackRequest, Post, TONES};
use crate::error::{ApiResult, FeatureArea};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerPhase {
    Idle,
    Generating,
    Generated,
    Editing,
    Sending,
    Sent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    pub raised_at: Instant,
}

#[derive(Debug, Clone)]
pub struct ReplyComposer {
    post_id: Option<String>,
    phase: ComposerPhase,
    tone: String,
    generated: String,
    draft: String,
    /// Phase to fall back to if a send fails.
    sent_from: ComposerPhase,
    notice: Option<Notice>,
}

impl Default for ReplyComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplyComposer {
    pub fn new() -> Self {
        Self {
            post_id: None,
            phase: ComposerPhase::Idle,
            tone: TONES[0].to_string(),
            generated: String::new(),
            draft: String::new(),
            sent_from: ComposerPhase::Generated,
            notice: None,
        }
    }

    pub fn post_id(&self) -> Option<&str> {
        self.post_id.as_deref()
    }

    pub fn phase(&self) -> ComposerPhase {
        self.phase
    }

    pub fn tone(&self) -> &str {
        &self.tone
    }

    pub fn generated(&self) -> &str {
        &self.generated
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        matches!(
            self.phase,
            ComposerPhase::Generating | ComposerPhase::Sending | ComposerPhase::Sent
        )
    }

    /// Point the composer at a post, discarding any reply in progress.
    pub fn select(&mut self, post_id: &str, tone: &str) {
        *self = Self {
            post_id: Some(post_id.to_string()),
            tone: tone.to_string(),
            ..Self::new()
        };
    }

    pub fn deselect(&mut self) {
        *self = Self {
            tone: std::mem::take(&mut self.tone),
            ..Self::new()
        };
    }

    pub fn cycle_tone(&mut self) {
        if self.is_busy() {
            return;
        }
        let next = TONES
            .iter()
            .position(|t| *t == self.tone)
            .map(|i| (i + 1) % TONES.len())
            .unwrap_or(0);
        self.tone = TONES[next].to_string();
    }

    /// Move to `Generating`. Returns false if no post is selected or a
    /// request is already running.
    pub fn begin_generate(&mut self) -> bool {
        if self.post_id.is_none() || self.is_busy() {
            return false;
        }
        self.phase = ComposerPhase::Generating;
        self.notice = None;
        true
    }

    pub fn finish_generate(&mut self, post_id: &str, result: ApiResult<String>) {
        if self.phase != ComposerPhase::Generating || self.post_id.as_deref() != Some(post_id) {
            return;
        }
        match result {
            Ok(text) => {
                self.draft = text.clone();
                self.generated = text;
                self.phase = if self.generated.is_empty() {
                    ComposerPhase::Idle
                } else {
                    ComposerPhase::Generated
                };
            }
            Err(_) => {
                self.phase = if self.generated.is_empty() {
                    ComposerPhase::Idle
                } else {
                    ComposerPhase::Generated
                };
                self.raise(FeatureArea::Generate.user_message(), true);
            }
        }
    }

    /// Switch between the generated text and the editable draft.
    pub fn toggle_editing(&mut self) {
        self.phase = match self.phase {
            ComposerPhase::Generated => ComposerPhase::Editing,
            ComposerPhase::Editing => ComposerPhase::Generated,
            other => other,
        };
    }

    pub fn push_char(&mut self, c: char) {
        if self.phase == ComposerPhase::Editing {
            self.draft.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if self.phase == ComposerPhase::Editing {
            self.draft.pop();
        }
    }

    /// The text a send would transmit right now.
    pub fn active_text(&self) -> &str {
        match self.phase {
            ComposerPhase::Editing => &self.draft,
            _ => &self.generated,
        }
    }

    /// The reply body to show, which stays on the draft while an edited
    /// reply is in flight.
    pub fn display_text(&self) -> &str {
        match self.phase {
            ComposerPhase::Sending | ComposerPhase::Sent
                if self.sent_from == ComposerPhase::Editing =>
            {
                &self.draft
            }
            _ => self.active_text(),
        }
    }

    /// Move to `Sending` and hand back the text to transmit.
    pub fn begin_send(&mut self) -> Option<(String, String)> {
        if !matches!(self.phase, ComposerPhase::Generated | ComposerPhase::Editing) {
            return None;
        }
        let post_id = self.post_id.clone()?;
        let text = self.active_text().to_string();
        self.sent_from = self.phase;
        self.phase = ComposerPhase::Sending;
        self.notice = None;
        Some((post_id, text))
    }

    /// Record the outcome of a send. Returns true when the reply went out.
    pub fn finish_send(&mut self, post_id: &str, result: &ApiResult<Post>) -> bool {
        if self.phase != ComposerPhase::Sending || self.post_id.as_deref() != Some(post_id) {
            return false;
        }
        match result {
            Ok(_) => {
                self.phase = ComposerPhase::Sent;
                self.raise("Reply sent successfully!", false);
                true
            }
            Err(_) => {
                self.phase = self.sent_from;
                self.raise(FeatureArea::Send.user_message(), true);
                false
            }
        }
    }

    /// Clear the sent reply once its confirmation has been shown.
    pub fn complete(&mut self) {
        if self.phase == ComposerPhase::Sent {
            self.deselect();
        }
    }

    /// Throw away the generated reply and draft.
    pub fn cancel(&mut self) {
        if matches!(self.phase, ComposerPhase::Generated | ComposerPhase::Editing) {
            self.generated.clear();
            self.draft.clear();
            self.phase = ComposerPhase::Idle;
        }
    }

    /// Build a feedback call for the generated reply, if there is one.
    pub fn feedback_request(&self, feedback: Feedback) -> Option<FeedbackRequest> {
        let post_id = self.post_id.clone()?;
        if self.generated.is_empty() {
            return None;
        }
        Some(FeedbackRequest {
            tweet_id: post_id,
            reply: self.generated.clone(),
            feedback,
            tone: self.tone.clone(),
        })
    }

    pub fn finish_feedback(&mut self, feedback: Feedback, result: &ApiResult<()>) {
        match result {
            Ok(()) => self.raise(&format!("Feedback recorded: {}", feedback.label()), false),
            Err(_) => self.raise(FeatureArea::Feedback.user_message(), true),
        }
    }

    /// Drop the notice once it has been visible for `ttl`.
    pub fn expire_notice(&mut self, now: Instant, ttl: Duration) {
        if let Some(notice) = &self.notice {
            if now.duration_since(notice.raised_at) >= ttl && self.phase != ComposerPhase::Sent {
                self.notice = None;
            }
        }
    }

    fn raise(&mut self, text: &str, is_error: bool) {
        self.notice = Some(Notice {
            text: text.to_string(),
            is_error,
            raised_at: Instant::now(),
        });
    }
}
