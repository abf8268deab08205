use crate::api::{BrandSettings, INDUSTRIES, TONES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    BrandName,
    Industry,
    DefaultTone,
    ReplySpeed,
    MaxDailyReplies,
    AutoReply,
    NewKeyword,
    Keywords,
}

impl FormField {
    pub const ORDER: [FormField; 8] = [
        FormField::BrandName,
        FormField::Industry,
        FormField::DefaultTone,
        FormField::ReplySpeed,
        FormField::MaxDailyReplies,
        FormField::AutoReply,
        FormField::NewKeyword,
        FormField::Keywords,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::BrandName => "Brand Name",
            FormField::Industry => "Industry",
            FormField::DefaultTone => "Default Tone",
            FormField::ReplySpeed => "Reply Speed",
            FormField::MaxDailyReplies => "Max Daily Replies",
            FormField::AutoReply => "Auto-Reply",
            FormField::NewKeyword => "Add Keyword",
            FormField::Keywords => "Keywords",
        }
    }

    pub fn takes_text(&self) -> bool {
        matches!(
            self,
            FormField::BrandName
                | FormField::ReplySpeed
                | FormField::MaxDailyReplies
                | FormField::NewKeyword
        )
    }
}

/// Working copy of the brand settings behind the settings tab.
///
/// Edits never touch the app's settings; only a successful save does.
#[derive(Debug, Clone)]
pub struct SettingsForm {
    draft: BrandSettings,
    focus: usize,
    new_keyword: String,
    keyword_cursor: usize,
    saving: bool,
}

impl SettingsForm {
    pub fn new(settings: BrandSettings) -> Self {
        Self {
            draft: settings,
            focus: 0,
            new_keyword: String::new(),
            keyword_cursor: 0,
            saving: false,
        }
    }

    pub fn draft(&self) -> &BrandSettings {
        &self.draft
    }

    pub fn focus(&self) -> FormField {
        FormField::ORDER[self.focus]
    }

    pub fn new_keyword(&self) -> &str {
        &self.new_keyword
    }

    pub fn keyword_cursor(&self) -> usize {
        self.keyword_cursor
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % FormField::ORDER.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + FormField::ORDER.len() - 1) % FormField::ORDER.len();
    }

    pub fn push_char(&mut self, c: char) {
        match self.focus() {
            FormField::BrandName => self.draft.brand_name.push(c),
            FormField::ReplySpeed => self.draft.reply_speed.push(c),
            FormField::NewKeyword => self.new_keyword.push(c),
            FormField::MaxDailyReplies => {
                if let Some(digit) = c.to_digit(10) {
                    self.draft.max_daily_replies = self
                        .draft
                        .max_daily_replies
                        .saturating_mul(10)
                        .saturating_add(digit);
                }
            }
            _ => {}
        }
    }

    pub fn pop_char(&mut self) {
        match self.focus() {
            FormField::BrandName => {
                self.draft.brand_name.pop();
            }
            FormField::ReplySpeed => {
                self.draft.reply_speed.pop();
            }
            FormField::NewKeyword => {
                self.new_keyword.pop();
            }
            FormField::MaxDailyReplies => self.draft.max_daily_replies /= 10,
            FormField::Keywords => self.remove_selected_keyword(),
            _ => {}
        }
    }

    /// Left/right on a choice field.
    pub fn cycle(&mut self, forward: bool) {
        match self.focus() {
            FormField::Industry => {
                self.draft.industry = cycle_option(&INDUSTRIES, &self.draft.industry, forward)
            }
            FormField::DefaultTone => {
                self.draft.default_tone = cycle_option(&TONES, &self.draft.default_tone, forward)
            }
            FormField::AutoReply => self.toggle_auto_reply(),
            FormField::Keywords => {
                let len = self.draft.keywords.len();
                if len > 0 {
                    self.keyword_cursor = if forward {
                        (self.keyword_cursor + 1) % len
                    } else {
                        (self.keyword_cursor + len - 1) % len
                    };
                }
            }
            _ => {}
        }
    }

    pub fn toggle_auto_reply(&mut self) {
        self.draft.auto_reply_enabled = !self.draft.auto_reply_enabled;
    }

    /// Add the typed keyword. Blank input and existing keywords are no-ops.
    pub fn add_keyword(&mut self) -> bool {
        let added = self.draft.add_keyword(&self.new_keyword);
        if added {
            self.new_keyword.clear();
        }
        added
    }

    pub fn remove_keyword(&mut self, keyword: &str) -> bool {
        let removed = self.draft.remove_keyword(keyword);
        self.keyword_cursor = self
            .keyword_cursor
            .min(self.draft.keywords.len().saturating_sub(1));
        removed
    }

    pub fn remove_selected_keyword(&mut self) {
        if let Some(keyword) = self.draft.keywords.get(self.keyword_cursor).cloned() {
            self.remove_keyword(&keyword);
        }
    }

    /// Snapshot to submit, or `None` while a save is already running or the
    /// brand name is blank.
    pub fn begin_save(&mut self) -> Option<BrandSettings> {
        if self.saving || self.draft.brand_name.trim().is_empty() {
            return None;
        }
        self.saving = true;
        Some(self.draft.clone())
    }

    pub fn finish_save(&mut self) {
        self.saving = false;
    }
}

fn cycle_option(options: &[&str], current: &str, forward: bool) -> String {
    let len = options.len();
    let next = match options.iter().position(|o| *o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    options[next].to_string()
}
