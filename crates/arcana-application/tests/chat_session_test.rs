mod common;

use std::sync::Arc;
use std::time::Duration;

use arcana_application::SessionEvent;
use arcana_core::billing::GateState;
use arcana_core::error::ArcanaError;
use arcana_core::language::Language;
use arcana_core::session::{MessageBody, Sender};
use arcana_core::storage::{KeyValueStore, keys};
use arcana_core::tarot::{ReadingIssue, ReadingStage};
use arcana_core::wallet::Balance;
use common::{ScriptedBackend, context, log_in, used_free_session};
use rust_decimal::Decimal;
use tokio::time::sleep;

#[tokio::test(start_paused = true)]
async fn test_free_session_expires_at_budget_and_paid_extension_reopens_it() {
    let backend = Arc::new(ScriptedBackend::with_balance(10));
    let (ctx, store) = context(&backend).await;
    log_in(&store).await;

    let session = ctx.open_chat(None).await.unwrap();
    assert_eq!(session.status().await.state, GateState::Free);
    session.start().await;

    sleep(Duration::from_millis(179_500)).await;
    let status = session.status().await;
    assert_eq!(status.elapsed, 179);
    assert_eq!(status.remaining, 1);
    assert_eq!(status.state, GateState::Free);
    session.send_message("Will I travel soon?").await.unwrap();

    let mut events = session.subscribe();
    sleep(Duration::from_secs(1)).await;
    let status = session.status().await;
    assert_eq!(status.state, GateState::Expired);
    assert_eq!(status.elapsed, 180);
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::Expired {
            balance: Balance::new(Decimal::from(10))
        }
    );
    assert!(matches!(
        session.send_message("Are you there?").await,
        Err(ArcanaError::InputBlocked)
    ));
    assert_eq!(backend.bot_requests.lock().unwrap().len(), 1);

    let receipt = session.extend().await.unwrap();
    assert_eq!(receipt.amount(), Decimal::from(6));
    assert_eq!(receipt.balance().amount, Decimal::from(4));
    assert_eq!(backend.balance(), Decimal::from(4));

    let status = session.status().await;
    assert_eq!(status.state, GateState::Active);
    assert_eq!(status.elapsed, 120);
    assert_eq!(status.balance.amount, Decimal::from(4));
    assert_eq!(
        events.recv().await.unwrap(),
        SessionEvent::Resumed {
            elapsed: 120,
            balance: Balance::new(Decimal::from(4))
        }
    );
    session.send_message("Thank you").await.unwrap();

    sleep(Duration::from_secs(2)).await;
    assert_eq!(session.status().await.elapsed, 122);
    session.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_ticks_stop_after_expiry() {
    let backend = Arc::new(ScriptedBackend::with_balance(0));
    let (ctx, store) = context(&backend).await;
    used_free_session(&store, 175).await;

    let session = ctx.open_chat(None).await.unwrap();
    assert_eq!(session.status().await.state, GateState::Active);
    session.start().await;

    sleep(Duration::from_secs(30)).await;
    let status = session.status().await;
    assert_eq!(status.elapsed, 180);
    assert_eq!(status.state, GateState::Expired);
    assert_eq!(
        store.get(keys::SESSION_ELAPSED_SECONDS).await.unwrap().as_deref(),
        Some("180")
    );
    session.stop().await;
}

#[tokio::test]
async fn test_fresh_install_ignores_stale_elapsed_seconds() {
    let backend = Arc::new(ScriptedBackend::with_balance(0));
    let (ctx, store) = context(&backend).await;
    store
        .set(keys::SESSION_ELAPSED_SECONDS, "500".to_string())
        .await
        .unwrap();

    let session = ctx.open_chat(None).await.unwrap();
    let status = session.status().await;
    assert_eq!(status.state, GateState::Free);
    assert_eq!(status.elapsed, 0);
    assert_eq!(
        store.get(keys::HAS_USED_FREE_SESSION).await.unwrap().as_deref(),
        Some("true")
    );
    assert_eq!(
        store.get(keys::SESSION_ELAPSED_SECONDS).await.unwrap().as_deref(),
        Some("0")
    );

    drop(session);
    let second = ctx.open_chat(None).await.unwrap();
    assert_ne!(second.status().await.state, GateState::Free);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_session_starts_blocked() {
    let backend = Arc::new(ScriptedBackend::with_balance(10));
    let (ctx, store) = context(&backend).await;
    used_free_session(&store, 180).await;

    let session = ctx.open_chat(None).await.unwrap();
    session.start().await;
    assert_eq!(session.status().await.state, GateState::Expired);

    let err = session.send_message("Hello").await.unwrap_err();
    assert!(matches!(err, ArcanaError::InputBlocked));
    assert!(session.messages().await.is_empty());
    assert!(backend.bot_requests.lock().unwrap().is_empty());

    sleep(Duration::from_secs(5)).await;
    assert_eq!(session.status().await.elapsed, 180);
    session.stop().await;
}

#[tokio::test]
async fn test_refused_debit_changes_nothing() {
    let backend = Arc::new(ScriptedBackend::with_balance(10));
    *backend.refuse_debits.lock().unwrap() = Some("insufficient funds".to_string());
    let (ctx, store) = context(&backend).await;
    log_in(&store).await;
    used_free_session(&store, 180).await;

    let session = ctx.open_chat(None).await.unwrap();
    let err = session.extend().await.unwrap_err();
    assert!(matches!(err, ArcanaError::Backend(ref m) if m == "insufficient funds"));

    let status = session.status().await;
    assert_eq!(status.state, GateState::Expired);
    assert_eq!(status.elapsed, 180);
    assert_eq!(status.balance.amount, Decimal::from(10));
    assert_eq!(
        store.get(keys::SESSION_ELAPSED_SECONDS).await.unwrap().as_deref(),
        Some("180")
    );
}

#[tokio::test]
async fn test_low_cached_balance_is_rejected_before_the_backend() {
    let backend = Arc::new(ScriptedBackend::with_balance(3));
    let (ctx, store) = context(&backend).await;
    log_in(&store).await;
    used_free_session(&store, 180).await;

    let session = ctx.open_chat(None).await.unwrap();
    let err = session.extend().await.unwrap_err();
    assert!(matches!(err, ArcanaError::InsufficientFunds { .. }));
    assert_eq!(*backend.deduct_calls.lock().unwrap(), 0);
    assert_eq!(session.status().await.state, GateState::Expired);
}

#[tokio::test]
async fn test_extension_of_active_session_is_refused() {
    let backend = Arc::new(ScriptedBackend::with_balance(10));
    let (ctx, store) = context(&backend).await;
    log_in(&store).await;
    used_free_session(&store, 30).await;

    let session = ctx.open_chat(None).await.unwrap();
    assert!(session.extend().await.unwrap_err().is_validation());
    assert_eq!(*backend.deduct_calls.lock().unwrap(), 0);
    assert_eq!(backend.balance(), Decimal::from(10));
}

#[tokio::test]
async fn test_transcript_keeps_send_order_and_survives_reopen() {
    let backend = Arc::new(ScriptedBackend::with_balance(0));
    let (ctx, _store) = context(&backend).await;

    let session = ctx.open_chat(None).await.unwrap();
    let id = session.session_id().to_string();
    session.send_message("Will I find love?").await.unwrap();
    session.send_message("And when?").await.unwrap();
    drop(session);

    let resumed = ctx.open_chat(Some(&id)).await.unwrap();
    let messages = resumed.messages().await;
    let senders: Vec<Sender> = messages.iter().map(|m| m.sender).collect();
    assert_eq!(
        senders,
        vec![Sender::User, Sender::Bot, Sender::User, Sender::Bot]
    );
    assert_eq!(messages[0].text(), Some("Will I find love?"));
    assert_eq!(messages[3].text(), Some("The stars are kind tonight."));

    let listed = ctx.history.list(None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Will I find love?");
}

#[tokio::test]
async fn test_failed_bot_request_keeps_only_the_user_message() {
    let backend = Arc::new(ScriptedBackend::with_balance(0));
    *backend.bot_reply.lock().unwrap() = None;
    let (ctx, _store) = context(&backend).await;

    let session = ctx.open_chat(None).await.unwrap();
    let err = session.send_message("Hello?").await.unwrap_err();
    assert!(err.is_remote());

    let messages = session.messages().await;
    assert_eq!(messages.len(), 1);
    assert!(messages[0].is_from_user());
}

#[tokio::test]
async fn test_empty_message_is_rejected_locally() {
    let backend = Arc::new(ScriptedBackend::with_balance(0));
    let (ctx, _store) = context(&backend).await;

    let session = ctx.open_chat(None).await.unwrap();
    assert!(session.send_message("   ").await.unwrap_err().is_validation());
    assert!(backend.bot_requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_question_language_and_personality_reach_the_bot() {
    let backend = Arc::new(ScriptedBackend::with_balance(0));
    let (ctx, _store) = context(&backend).await;
    ctx.persona.save("Stella", "playful").await.unwrap();

    let session = ctx.open_chat(None).await.unwrap();
    session.send_message("我的事业怎么样").await.unwrap();

    let requests = backend.bot_requests.lock().unwrap();
    assert_eq!(requests[0].lang, Language::Zh);
    assert!(requests[0].system.contains("Stella"));
    assert!(requests[0].system.contains("playful"));
}

#[tokio::test]
async fn test_guided_reading_shows_cards_and_asks_for_interpretation() {
    let backend = Arc::new(ScriptedBackend::with_balance(0));
    let (ctx, _store) = context(&backend).await;
    ctx.language.set(Language::En).await.unwrap();

    let session = ctx.open_chat(None).await.unwrap();
    assert!(session.draw_cards(3).await.unwrap_err().is_validation());

    session.begin_reading().await.unwrap();
    assert_eq!(session.reading_stage().await, Some(ReadingStage::Issue));
    session.choose_issue(ReadingIssue::Love).await.unwrap();
    assert!(session.shuffle_pool(6).await.unwrap_err().is_validation());
    session.shuffle_pool(7).await.unwrap();
    let reply = session.draw_cards(3).await.unwrap();

    assert_eq!(reply.text(), Some("The stars are kind tonight."));
    assert_eq!(session.reading_stage().await, Some(ReadingStage::Chat));

    let messages = session.messages().await;
    let cards = messages
        .iter()
        .filter(|m| matches!(m.body, MessageBody::Card { .. }))
        .count();
    assert_eq!(cards, 3);
    assert_eq!(messages.len(), 11);

    let question = messages[9].text().unwrap();
    assert!(messages[9].is_from_user());
    assert!(question.contains("Love"));
    assert_eq!(backend.bot_requests.lock().unwrap()[0].question, question);
}
