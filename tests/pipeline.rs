mod common;

use common::{brand, post, FakeBackend};
use replydesk::api::ThreadEntry;
use replydesk::message::AppEvent;
use replydesk::pipeline::{auto_reply, spawn_auto_reply};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::test]
async fn test_auto_reply_uses_brand_tone_and_handle() {
    let target = post("1", "2025-05-17T10:00:00Z");
    let backend = FakeBackend::with_posts(vec![target.clone()], Some(brand(true)));

    let (updated, record) = auto_reply(&backend, &target, &brand(true))
        .await
        .unwrap()
        .expect("a reply should be sent");

    let requests = backend.generated.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].tone, "Empathetic");
    assert_eq!(requests[0].brand_name, "Acme");
    assert_eq!(requests[0].tweet_text, target.text);

    let sent = backend.sent.lock().unwrap().clone();
    assert_eq!(sent[0].0, "1");
    assert_eq!(sent[0].1.username, "@Acme_support");
    assert_eq!(sent[0].1.auto_generated, Some(true));

    assert_eq!(record.tweet_id, "1");
    assert!(record.auto_generated);
    assert_eq!(record.feedback, None);
    assert_eq!(record.timestamp, sent[0].1.timestamp);
    assert!(matches!(
        updated.thread.last(),
        Some(ThreadEntry::Reply { auto_generated: true, .. })
    ));
}

#[tokio::test]
async fn test_empty_generation_sends_nothing() {
    let target = post("1", "2025-05-17T10:00:00Z");
    let backend = FakeBackend::with_posts(vec![target.clone()], Some(brand(true)));
    backend.reply_text.lock().unwrap().clear();

    let outcome = auto_reply(&backend, &target, &brand(true)).await.unwrap();

    assert!(outcome.is_none());
    assert!(backend.sent_ids().is_empty());
}

#[tokio::test]
async fn test_generate_failure_aborts_before_send() {
    let target = post("1", "2025-05-17T10:00:00Z");
    let backend = FakeBackend::with_posts(vec![target.clone()], Some(brand(true)));
    backend.fail_generate.store(true, Ordering::SeqCst);

    let err = auto_reply(&backend, &target, &brand(true)).await.unwrap_err();

    assert_eq!(err.endpoint(), "/generate-reply");
    assert!(backend.sent_ids().is_empty());
}

#[tokio::test]
async fn test_spawned_pipeline_reports_only_success() {
    let target = post("1", "2025-05-17T10:00:00Z");
    let backend = Arc::new(FakeBackend::with_posts(vec![target.clone()], Some(brand(true))));
    let (tx, mut rx) = mpsc::unbounded_channel();

    backend.fail_send.store(true, Ordering::SeqCst);
    spawn_auto_reply(backend.clone(), target.clone(), brand(true), tx.clone())
        .await
        .unwrap();
    assert!(rx.try_recv().is_err());

    backend.fail_send.store(false, Ordering::SeqCst);
    spawn_auto_reply(backend.clone(), target, brand(true), tx)
        .await
        .unwrap();
    match rx.try_recv() {
        Ok(AppEvent::AutoReplied { post, record }) => {
            assert_eq!(post.id, "1");
            assert_eq!(record.tweet_id, "1");
        }
        other => panic!("expected auto-reply, got {:?}", other),
    }
}
