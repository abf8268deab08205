use crate::api::{BrandSettings, Health, Post, ReplyRecord};
use crate::composer::{ComposerPhase, ReplyComposer};
use crate::error::FeatureArea;
use crate::message::AppEvent;
use crate::parser::{now_timestamp, parse_timestamp};
use crate::poller::PollSnapshot;
use crate::settings_form::SettingsForm;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Posts,
    Settings,
    History,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Dashboard, Tab::Posts, Tab::Settings, Tab::History];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Posts => "Posts",
            Tab::Settings => "Brand Settings",
            Tab::History => "Reply History",
        }
    }

    pub fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    pub fn next(&self) -> Tab {
        Tab::ALL[(self.index() + 1) % Tab::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: String,
    pub is_error: bool,
    pub raised_at: Instant,
}

/// A sent manual reply waiting for its confirmation delay to pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledDelivery {
    pub post: Post,
    pub transmitted: String,
}

/// Everything the dashboard shows. Only [`AppState::apply`] and the key
/// handlers mutate it, both on the UI task.
#[derive(Debug)]
pub struct AppState {
    pub posts: Vec<Post>,
    pub replies: Vec<ReplyRecord>,
    pub settings: Option<BrandSettings>,
    pub auto_mode: bool,
    pub loading: bool,
    pub health: Option<Health>,
    pub banner: Option<Banner>,
    pub tab: Tab,
    pub post_cursor: usize,
    pub history_offset: usize,
    pub composer: ReplyComposer,
    pub form: SettingsForm,
}

impl AppState {
    pub fn new(auto_mode: bool) -> Self {
        Self {
            posts: Vec::new(),
            replies: Vec::new(),
            settings: None,
            auto_mode,
            loading: true,
            health: None,
            banner: None,
            tab: Tab::Dashboard,
            post_cursor: 0,
            history_offset: 0,
            composer: ReplyComposer::new(),
            form: SettingsForm::new(BrandSettings::default()),
        }
    }

    /// Append posts whose IDs are not present yet. Returns how many were added.
    pub fn merge_posts(&mut self, incoming: Vec<Post>) -> usize {
        let mut known = self.known_ids();
        let before = self.posts.len();
        for post in incoming {
            if known.insert(post.id.clone()) {
                self.posts.push(post);
            }
        }
        self.posts.len() - before
    }

    /// Replace the post with the same ID, or append it if unknown.
    pub fn upsert_post(&mut self, post: Post) {
        match self.posts.iter_mut().find(|p| p.id == post.id) {
            Some(existing) => *existing = post,
            None => self.posts.push(post),
        }
    }

    pub fn known_ids(&self) -> HashSet<String> {
        self.posts.iter().map(|p| p.id.clone()).collect()
    }

    pub fn poll_snapshot(&self) -> PollSnapshot {
        PollSnapshot {
            settings: self.settings.clone(),
            known_ids: self.known_ids(),
        }
    }

    /// Polling runs only while both the session toggle and the saved
    /// brand flag are on.
    pub fn auto_reply_active(&self) -> bool {
        self.auto_mode
            && self
                .settings
                .as_ref()
                .is_some_and(|s| s.auto_reply_enabled)
    }

    pub fn toggle_auto_mode(&mut self) {
        if self.settings.is_some() {
            self.auto_mode = !self.auto_mode;
            info!(enabled = self.auto_mode, "auto mode toggled");
        }
    }

    /// Posts ordered newest first; unparseable timestamps sort last.
    pub fn posts_newest_first(&self) -> Vec<&Post> {
        let mut sorted: Vec<&Post> = self.posts.iter().collect();
        sorted.sort_by(|a, b| parse_timestamp(&b.timestamp).cmp(&parse_timestamp(&a.timestamp)));
        sorted
    }

    pub fn cursor_post(&self) -> Option<&Post> {
        self.posts_newest_first().get(self.post_cursor).copied()
    }

    pub fn selected_post(&self) -> Option<&Post> {
        let id = self.composer.post_id()?;
        self.posts.iter().find(|p| p.id == id)
    }

    pub fn move_cursor(&mut self, down: bool) {
        let len = self.posts.len();
        if len == 0 {
            self.post_cursor = 0;
        } else if down {
            self.post_cursor = (self.post_cursor + 1).min(len - 1);
        } else {
            self.post_cursor = self.post_cursor.saturating_sub(1);
        }
    }

    /// Open the composer on the post under the cursor.
    pub fn select_cursor_post(&mut self) {
        let Some(id) = self.cursor_post().map(|p| p.id.clone()) else {
            return;
        };
        if self.composer.is_busy() {
            return;
        }
        let tone = self
            .settings
            .as_ref()
            .map(|s| s.tone_or_default().to_string())
            .unwrap_or_else(|| crate::api::TONES[0].to_string());
        self.composer.select(&id, &tone);
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        if tab == Tab::Settings && self.tab != Tab::Settings {
            self.form = SettingsForm::new(self.settings.clone().unwrap_or_default());
        }
        self.tab = tab;
    }

    /// True when keystrokes should go to a text field instead of shortcuts.
    pub fn capturing_text(&self) -> bool {
        match self.tab {
            Tab::Posts => self.composer.phase() == ComposerPhase::Editing,
            Tab::Settings => self.form.focus().takes_text(),
            _ => false,
        }
    }

    pub fn raise_error(&mut self, area: FeatureArea) {
        self.banner = Some(Banner {
            text: area.user_message().to_string(),
            is_error: true,
            raised_at: Instant::now(),
        });
    }

    pub fn raise_info(&mut self, text: impl Into<String>) {
        self.banner = Some(Banner {
            text: text.into(),
            is_error: false,
            raised_at: Instant::now(),
        });
    }

    pub fn expire_notices(&mut self, now: Instant, ttl: Duration) {
        if self
            .banner
            .as_ref()
            .is_some_and(|b| now.duration_since(b.raised_at) >= ttl)
        {
            self.banner = None;
        }
        self.composer.expire_notice(now, ttl);
    }

    /// Fold the result of an async action into state.
    pub fn apply(&mut self, event: AppEvent) -> Option<ScheduledDelivery> {
        match event {
            AppEvent::Loaded {
                posts,
                settings,
                replies,
            } => {
                self.loading = false;
                match posts {
                    Ok(posts) => {
                        self.posts.clear();
                        let count = self.merge_posts(posts);
                        info!(count, "posts loaded");
                    }
                    Err(e) => {
                        error!(error = %e, "loading posts failed");
                        self.raise_error(FeatureArea::Load);
                    }
                }
                match settings {
                    Ok(Some(settings)) => {
                        info!(brand = %settings.brand_name, "brand settings loaded");
                        self.settings = Some(settings);
                    }
                    Ok(None) => info!("no brand settings configured yet"),
                    Err(e) => debug!(error = %e, "brand settings unavailable"),
                }
                match replies {
                    Ok(replies) => self.replies = replies,
                    Err(e) => debug!(error = %e, "reply history unavailable"),
                }
                self.post_cursor = self.post_cursor.min(self.posts.len().saturating_sub(1));
            }
            AppEvent::Health(result) => match result {
                Ok(health) => {
                    info!(status = %health.status, version = %health.api_version, "backend health");
                    self.health = Some(health);
                }
                Err(e) => {
                    warn!(error = %e, "health check failed");
                    self.health = None;
                }
            },
            AppEvent::PollMerged(posts) => {
                let added = self.merge_posts(posts);
                debug!(added, "merged polled posts");
            }
            AppEvent::AutoReplied { post, record } => {
                self.upsert_post(post);
                self.replies.push(record);
            }
            AppEvent::Generated { post_id, result } => {
                if let Err(e) = &result {
                    error!(post_id = %post_id, error = %e, "generating reply failed");
                }
                self.composer.finish_generate(&post_id, result);
            }
            AppEvent::ReplySent {
                post_id,
                transmitted,
                result,
            } => {
                if let Err(e) = &result {
                    error!(post_id = %post_id, error = %e, "sending reply failed");
                }
                if self.composer.finish_send(&post_id, &result) {
                    if let Ok(post) = result {
                        return Some(ScheduledDelivery { post, transmitted });
                    }
                }
            }
            AppEvent::ReplyDelivered { post, transmitted } => {
                let text = post
                    .thread
                    .last()
                    .map(|entry| entry.text().to_string())
                    .unwrap_or(transmitted);
                self.replies.push(ReplyRecord {
                    tweet_id: post.id.clone(),
                    text,
                    timestamp: now_timestamp(),
                    auto_generated: false,
                    feedback: None,
                });
                self.upsert_post(post);
                self.composer.complete();
            }
            AppEvent::FeedbackSent {
                post_id,
                feedback,
                result,
            } => {
                if let Err(e) = &result {
                    error!(post_id = %post_id, error = %e, "submitting feedback failed");
                }
                if self.composer.post_id() == Some(post_id.as_str()) {
                    self.composer.finish_feedback(feedback, &result);
                }
            }
            AppEvent::SettingsSaved { submitted, result } => {
                self.form.finish_save();
                match result {
                    Ok(_) => {
                        info!(brand = %submitted.brand_name, "brand settings saved");
                        self.settings = Some(submitted);
                        self.tab = Tab::Dashboard;
                        self.raise_info("Settings saved");
                    }
                    Err(e) => {
                        error!(error = %e, "saving brand settings failed");
                        self.raise_error(FeatureArea::Save);
                    }
                }
            }
            AppEvent::Simulated(result) => match result {
                Ok(post) => {
                    // While polling, leave the post for the poll loop so it gets
                    // the auto-reply treatment.
                    if self.auto_reply_active() {
                        self.raise_info(format!("New post from {} queued", post.username));
                    } else {
                        self.raise_info(format!("New post from {}", post.username));
                        self.merge_posts(vec![post]);
                    }
                }
                Err(e) => {
                    error!(error = %e, "simulating post failed");
                    self.raise_error(FeatureArea::Simulate);
                }
            },
        }
        None
    }
}
