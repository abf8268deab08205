//! Engagement figures derived from the current posts and replies.
//!
//! Nothing here is cached; the dashboard recomputes on every frame.

use crate::api::{Feedback, Post, ReplyRecord, Sentiment};
use crate::parser::parse_timestamp;
use std::collections::HashMap;

/// Smallest share of the bar a non-empty category is drawn with.
pub const MIN_VISIBLE_PERCENT: f64 = 3.0;

/// Number of reply records listed under "recent activity".
pub const RECENT_ACTIVITY: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentBar {
    pub sentiment: Sentiment,
    pub count: usize,
    /// Width as a percentage of the full bar. Zero only when `count` is zero.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analytics {
    pub total_posts: usize,
    pub total_replies: usize,
    pub sentiment: Vec<SentimentBar>,
    pub avg_response_minutes: Option<f64>,
    pub satisfaction_percent: Option<u32>,
}

impl Analytics {
    pub fn compute(posts: &[Post], replies: &[ReplyRecord]) -> Self {
        let counts = sentiment_counts(posts);
        let total = posts.len();
        let sentiment = Sentiment::CHARTED
            .iter()
            .map(|s| {
                let count = counts.get(s).copied().unwrap_or(0);
                SentimentBar {
                    sentiment: *s,
                    count,
                    percent: bar_percent(count, total),
                }
            })
            .collect();

        Self {
            total_posts: total,
            total_replies: replies.len(),
            sentiment,
            avg_response_minutes: average_response_minutes(posts, replies),
            satisfaction_percent: satisfaction_percent(replies),
        }
    }

    pub fn avg_response_display(&self) -> String {
        self.avg_response_minutes
            .map(|m| format!("{:.1} min", m))
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn satisfaction_display(&self) -> String {
        self.satisfaction_percent
            .map(|p| format!("{}%", p))
            .unwrap_or_else(|| "N/A".to_string())
    }
}

pub fn sentiment_counts(posts: &[Post]) -> HashMap<Sentiment, usize> {
    let mut counts = HashMap::new();
    for post in posts {
        *counts.entry(post.sentiment).or_insert(0) += 1;
    }
    counts
}

pub fn bar_percent(count: usize, total: usize) -> f64 {
    if total == 0 || count == 0 {
        return 0.0;
    }
    let percent = count as f64 / total as f64 * 100.0;
    percent.max(MIN_VISIBLE_PERCENT)
}

/// Mean minutes between a post and the replies to it.
///
/// Replies whose post is unknown, or whose timestamps don't parse, are
/// left out. `None` when nothing is left to average.
pub fn average_response_minutes(posts: &[Post], replies: &[ReplyRecord]) -> Option<f64> {
    let mut by_id: HashMap<&str, &Post> = HashMap::with_capacity(posts.len());
    for post in posts {
        by_id.entry(post.id.as_str()).or_insert(post);
    }

    let samples: Vec<f64> = replies
        .iter()
        .filter_map(|reply| {
            let post = by_id.get(reply.tweet_id.as_str())?;
            let posted = parse_timestamp(&post.timestamp)?;
            let answered = parse_timestamp(&reply.timestamp)?;
            Some((answered - posted).num_milliseconds() as f64 / 60_000.0)
        })
        .collect();

    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Share of replies rated positive, rounded to a whole percent.
pub fn satisfaction_percent(replies: &[ReplyRecord]) -> Option<u32> {
    if replies.is_empty() {
        return None;
    }
    let positive = replies
        .iter()
        .filter(|r| r.feedback == Some(Feedback::Positive))
        .count();
    Some((positive as f64 / replies.len() as f64 * 100.0).round() as u32)
}

/// Reply records for the activity list, joined with their post when known.
pub fn recent_activity<'a>(
    posts: &'a [Post],
    replies: &'a [ReplyRecord],
) -> Vec<(&'a ReplyRecord, Option<&'a Post>)> {
    replies
        .iter()
        .take(RECENT_ACTIVITY)
        .map(|reply| (reply, posts.iter().find(|p| p.id == reply.tweet_id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, timestamp: &str, sentiment: Sentiment) -> Post {
        Post {
            id: id.to_string(),
            username: format!("@user{}", id),
            text: "text".to_string(),
            timestamp: timestamp.to_string(),
            sentiment,
            thread: Vec::new(),
        }
    }

    fn reply(tweet_id: &str, timestamp: &str, feedback: Option<Feedback>) -> ReplyRecord {
        ReplyRecord {
            tweet_id: tweet_id.to_string(),
            text: "reply".to_string(),
            timestamp: timestamp.to_string(),
            auto_generated: false,
            feedback,
        }
    }

    #[test]
    fn test_average_response_five_minutes() {
        let posts = vec![post("1", "2025-05-17T10:00:00Z", Sentiment::Neutral)];
        let replies = vec![reply("1", "2025-05-17T10:05:00Z", None)];
        let analytics = Analytics::compute(&posts, &replies);
        assert_eq!(analytics.avg_response_minutes, Some(5.0));
        assert_eq!(analytics.avg_response_display(), "5.0 min");
    }

    #[test]
    fn test_average_response_without_matches() {
        let posts = vec![post("1", "2025-05-17T10:00:00Z", Sentiment::Neutral)];
        let replies = vec![reply("99", "2025-05-17T10:05:00Z", None)];
        let analytics = Analytics::compute(&posts, &replies);
        assert_eq!(analytics.avg_response_minutes, None);
        assert_eq!(analytics.avg_response_display(), "N/A");

        let analytics = Analytics::compute(&posts, &[]);
        assert_eq!(analytics.avg_response_display(), "N/A");
    }

    #[test]
    fn test_average_response_naive_post_against_utc_reply() {
        use chrono::{Local, SecondsFormat, TimeZone, Utc};

        let replied_at = Local
            .with_ymd_and_hms(2025, 5, 17, 10, 5, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let posts = vec![post("1", "2025-05-17T10:00:00", Sentiment::Urgent)];
        let replies = vec![reply("1", &replied_at, None)];

        assert_eq!(average_response_minutes(&posts, &replies), Some(5.0));
    }

    #[test]
    fn test_average_response_mixes_samples() {
        let posts = vec![
            post("1", "2025-05-17T10:00:00Z", Sentiment::Neutral),
            post("2", "2025-05-17T11:00:00Z", Sentiment::Neutral),
        ];
        let replies = vec![
            reply("1", "2025-05-17T10:05:00Z", None),
            reply("2", "2025-05-17T11:10:00Z", None),
            reply("2", "garbage", None),
        ];
        assert_eq!(average_response_minutes(&posts, &replies), Some(7.5));
    }

    #[test]
    fn test_satisfaction_half() {
        let replies = vec![
            reply("1", "", Some(Feedback::Positive)),
            reply("2", "", None),
        ];
        let analytics = Analytics::compute(&[], &replies);
        assert_eq!(analytics.satisfaction_percent, Some(50));
        assert_eq!(analytics.satisfaction_display(), "50%");
    }

    #[test]
    fn test_satisfaction_without_replies() {
        let analytics = Analytics::compute(&[], &[]);
        assert_eq!(analytics.satisfaction_display(), "N/A");
    }

    #[test]
    fn test_satisfaction_rounds() {
        let replies = vec![
            reply("1", "", Some(Feedback::Positive)),
            reply("2", "", Some(Feedback::Positive)),
            reply("3", "", Some(Feedback::Negative)),
        ];
        assert_eq!(satisfaction_percent(&replies), Some(67));
    }

    #[test]
    fn test_sentiment_histogram_keeps_small_categories_visible() {
        let mut posts: Vec<Post> = (0..50)
            .map(|i| post(&i.to_string(), "", Sentiment::Positive))
            .collect();
        posts.push(post("urgent", "", Sentiment::Urgent));

        let analytics = Analytics::compute(&posts, &[]);
        let urgent = analytics
            .sentiment
            .iter()
            .find(|b| b.sentiment == Sentiment::Urgent)
            .unwrap();
        assert_eq!(urgent.count, 1);
        assert_eq!(urgent.percent, MIN_VISIBLE_PERCENT);

        let negative = analytics
            .sentiment
            .iter()
            .find(|b| b.sentiment == Sentiment::Negative)
            .unwrap();
        assert_eq!(negative.count, 0);
        assert_eq!(negative.percent, 0.0);
    }

    #[test]
    fn test_unknown_sentiment_counted_but_not_charted() {
        let posts = vec![
            post("1", "", Sentiment::Unknown),
            post("2", "", Sentiment::Positive),
        ];
        let counts = sentiment_counts(&posts);
        assert_eq!(counts.get(&Sentiment::Unknown), Some(&1));

        let analytics = Analytics::compute(&posts, &[]);
        assert_eq!(analytics.total_posts, 2);
        assert_eq!(analytics.sentiment.len(), 4);
        assert_eq!(analytics.sentiment[0].percent, 50.0);
    }

    #[test]
    fn test_recent_activity_joins_posts() {
        let posts = vec![post("1", "", Sentiment::Neutral)];
        let replies: Vec<ReplyRecord> = (0..7).map(|_| reply("1", "", None)).collect();
        let mut with_orphan = vec![reply("404", "", None)];
        with_orphan.extend(replies);

        let activity = recent_activity(&posts, &with_orphan);
        assert_eq!(activity.len(), RECENT_ACTIVITY);
        assert!(activity[0].1.is_none());
        assert_eq!(activity[1].1.map(|p| p.id.as_str()), Some("1"));
    }
}
