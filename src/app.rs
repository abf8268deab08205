use crate::api::{Backend, BrandSettings, Feedback, GenerateReplyRequest, SimulateRequest, ThreadReplyRequest};
use crate::composer::ComposerPhase;
use crate::config::Config;
use crate::message::AppEvent;
use crate::parser::now_timestamp;
use crate::poller::{spawn_poller, PollHandle, PollSnapshot};
use crate::settings_form::FormField;
use crate::state::{AppState, ScheduledDelivery, Tab};
use crate::ui;
use anyhow::Result;
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

enum Step {
    Tick,
    App(AppEvent),
    Input(Option<std::io::Result<Event>>),
}

pub struct App {
    state: AppState,
    config: Config,
    backend: Arc<dyn Backend>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    snapshot_tx: watch::Sender<Arc<PollSnapshot>>,
    poller: Option<PollHandle>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, backend: Arc<dyn Backend>, auto_mode: bool) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshot_tx, _) = watch::channel(Arc::new(PollSnapshot::default()));

        Self {
            state: AppState::new(auto_mode),
            config,
            backend,
            events_tx,
            events_rx,
            snapshot_tx,
            poller: None,
            should_quit: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let mut input = EventStream::new();
        let mut ticker = tokio::time::interval(self.config.tick_rate());

        self.reload();
        self.check_health();

        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, &self.state))?;

            let step = tokio::select! {
                _ = ticker.tick() => Step::Tick,
                Some(event) = self.events_rx.recv() => Step::App(event),
                event = input.next() => Step::Input(event),
            };

            match step {
                Step::Tick => self
                    .state
                    .expire_notices(Instant::now(), self.config.banner_ttl()),
                Step::App(event) => self.handle_event(event),
                Step::Input(Some(Ok(Event::Key(key)))) => self.handle_key(key),
                Step::Input(Some(Ok(_))) => {}
                Step::Input(Some(Err(e))) => return Err(e.into()),
                Step::Input(None) => break,
            }

            self.sync_poller().await;
        }

        self.shutdown().await;
        Ok(())
    }

    /// Stop background polling. Auto-replies already in flight still finish.
    pub async fn shutdown(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.shutdown().await;
        }
    }

    /// Publish the current snapshot to the poll task and start or stop it
    /// to match the auto-reply switches.
    pub async fn sync_poller(&mut self) {
        let snapshot = self.state.poll_snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if **current == snapshot {
                false
            } else {
                *current = Arc::new(snapshot);
                true
            }
        });

        let wanted = self.state.auto_reply_active();
        if wanted && self.poller.is_none() {
            self.poller = Some(spawn_poller(
                self.backend.clone(),
                self.config.poll_interval(),
                self.snapshot_tx.subscribe(),
                self.events_tx.clone(),
            ));
            info!("auto-reply polling started");
        } else if !wanted {
            if let Some(poller) = self.poller.take() {
                poller.shutdown().await;
                info!("auto-reply polling stopped");
            }
        }
    }

    /// Wait for the next completed action and fold it into state.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        if let Some(delivery) = self.state.apply(event) {
            self.schedule_delivery(delivery);
        }
    }

    fn schedule_delivery(&self, delivery: ScheduledDelivery) {
        let delay = self.config.send_display_delay();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(AppEvent::ReplyDelivered {
                post: delivery.post,
                transmitted: delivery.transmitted,
            });
        });
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let KeyCode::F(n @ 1..=4) = key.code {
            self.state.switch_tab(Tab::ALL[usize::from(n - 1)]);
            return;
        }

        let consumed = match self.state.tab {
            Tab::Posts => self.handle_posts_key(key),
            Tab::Settings => self.handle_settings_key(key),
            Tab::History => self.handle_history_key(key),
            Tab::Dashboard => false,
        };
        if consumed || self.state.capturing_text() {
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.state.switch_tab(Tab::ALL[index]);
            }
            KeyCode::Tab => self.state.switch_tab(self.state.tab.next()),
            KeyCode::Char('a') => self.state.toggle_auto_mode(),
            KeyCode::Char('n') => self.simulate_post(),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
    }

    fn handle_posts_key(&mut self, key: KeyEvent) -> bool {
        if self.state.composer.phase() == ComposerPhase::Editing {
            match key.code {
                KeyCode::Esc => self.state.composer.toggle_editing(),
                KeyCode::Enter => self.send_reply(),
                KeyCode::Backspace => self.state.composer.pop_char(),
                KeyCode::Char(c) => self.state.composer.push_char(c),
                _ => return false,
            }
            return true;
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.state.move_cursor(false),
            KeyCode::Down | KeyCode::Char('j') => self.state.move_cursor(true),
            KeyCode::Enter => self.state.select_cursor_post(),
            KeyCode::Esc => {
                if !self.state.composer.is_busy() {
                    self.state.composer.deselect();
                }
            }
            KeyCode::Char('g') => self.generate_reply(),
            KeyCode::Char('t') => self.state.composer.cycle_tone(),
            KeyCode::Char('e') => self.state.composer.toggle_editing(),
            KeyCode::Char('s') => self.send_reply(),
            KeyCode::Char('c') => self.state.composer.cancel(),
            KeyCode::Char('+') => self.send_feedback(Feedback::Positive),
            KeyCode::Char('-') => self.send_feedback(Feedback::Negative),
            _ => return false,
        }
        true
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.save_settings();
            return true;
        }
        if key.code == KeyCode::Esc {
            self.state.switch_tab(Tab::Dashboard);
            return true;
        }

        let form = &mut self.state.form;
        let text_field = form.focus().takes_text();

        match key.code {
            KeyCode::Down | KeyCode::Tab => form.focus_next(),
            KeyCode::Up | KeyCode::BackTab => form.focus_prev(),
            KeyCode::Left => form.cycle(false),
            KeyCode::Right => form.cycle(true),
            KeyCode::Enter if form.focus() == FormField::NewKeyword => {
                form.add_keyword();
            }
            KeyCode::Char(' ') if form.focus() == FormField::AutoReply => {
                form.toggle_auto_reply()
            }
            KeyCode::Backspace | KeyCode::Delete => form.pop_char(),
            KeyCode::Char(c) if text_field => form.push_char(c),
            _ => return false,
        }
        true
    }

    fn handle_history_key(&mut self, key: KeyEvent) -> bool {
        let len = self.state.replies.len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.history_offset = self.state.history_offset.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.state.history_offset =
                    (self.state.history_offset + 1).min(len.saturating_sub(1))
            }
            _ => return false,
        }
        true
    }

    pub fn reload(&mut self) {
        self.state.loading = true;
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let (posts, settings, replies) = tokio::join!(
                backend.fetch_posts(),
                backend.fetch_brand_settings(),
                backend.fetch_replies()
            );
            let _ = tx.send(AppEvent::Loaded {
                posts,
                settings,
                replies,
            });
        });
    }

    fn check_health(&self) {
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(AppEvent::Health(backend.health().await));
        });
    }

    pub fn generate_reply(&mut self) {
        let Some(post) = self.state.selected_post().cloned() else {
            return;
        };
        if !self.state.composer.begin_generate() {
            return;
        }
        let request = GenerateReplyRequest::for_post(
            &post,
            self.state.composer.tone(),
            self.state.settings.as_ref(),
        );
        debug!(post_id = %post.id, tone = %request.tone, "generating reply");

        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.generate_reply(&request).await;
            let _ = tx.send(AppEvent::Generated {
                post_id: post.id,
                result,
            });
        });
    }

    pub fn send_reply(&mut self) {
        let Some((post_id, text)) = self.state.composer.begin_send() else {
            return;
        };
        let username = self
            .state
            .settings
            .as_ref()
            .map(BrandSettings::sender_handle)
            .unwrap_or_else(|| BrandSettings::default().sender_handle());
        let request = ThreadReplyRequest {
            username,
            text: text.clone(),
            timestamp: now_timestamp(),
            auto_generated: None,
        };
        debug!(post_id = %post_id, "sending reply");

        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.send_reply(&post_id, &request).await;
            let _ = tx.send(AppEvent::ReplySent {
                post_id,
                transmitted: text,
                result,
            });
        });
    }

    /// Fire-and-forget rating of the generated reply.
    pub fn send_feedback(&mut self, feedback: Feedback) {
        let Some(request) = self.state.composer.feedback_request(feedback) else {
            return;
        };
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.send_feedback(&request).await;
            let _ = tx.send(AppEvent::FeedbackSent {
                post_id: request.tweet_id,
                feedback,
                result,
            });
        });
    }

    pub fn save_settings(&mut self) {
        let Some(submitted) = self.state.form.begin_save() else {
            return;
        };
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.save_brand_settings(&submitted).await;
            let _ = tx.send(AppEvent::SettingsSaved { submitted, result });
        });
    }

    fn simulate_post(&self) {
        let backend = self.backend.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let result = backend.simulate_post(&SimulateRequest::default()).await;
            let _ = tx.send(AppEvent::Simulated(result));
        });
    }
}
