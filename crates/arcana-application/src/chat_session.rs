//! Chat session use case.
//!
//! `ChatSession` ties the billing gate, the balance ledger, the transcript and
//! the remote bot together. A background ticker advances the gate once per
//! second and publishes [`SessionEvent`]s so the front end can show the
//! remaining time and the recharge prompt.
//!
//! # Locking
//!
//! Gate, transcript and reading share one `tokio::sync::Mutex`. It is never
//! held across a bot or payment request, so the ticker keeps counting while a
//! reply is in flight.

use std::sync::Arc;
use std::time::Duration;

use arcana_core::billing::{BillingGate, BillingPolicy, GateState, GateTransition};
use arcana_core::bot::{BotRequest, TarotBot};
use arcana_core::error::{ArcanaError, Result};
use arcana_core::language::{Language, detect_language};
use arcana_core::session::{ChatMessage, ChatTranscript, TranscriptRepository, new_session_id};
use arcana_core::storage::{KeyValueStore, keys};
use arcana_core::tarot::{ReadingIssue, ReadingStage, TarotReading};
use arcana_core::wallet::{Balance, BalanceLedger, DebitReceipt};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;

use crate::language_service::LanguageService;
use crate::persona_service::PersonaService;

const TICK_PERIOD: Duration = Duration::from_secs(1);
const EVENT_CAPACITY: usize = 64;

/// Notifications published by a running session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// One second was counted.
    Tick { elapsed: u64, remaining: u64 },
    /// The budget ran out; input is blocked until a recharge.
    Expired { balance: Balance },
    /// A paid extension reopened the session.
    Resumed { elapsed: u64, balance: Balance },
}

/// Snapshot for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub session_id: String,
    pub state: GateState,
    pub elapsed: u64,
    pub remaining: u64,
    pub budget: u64,
    pub balance: Balance,
}

/// Collaborators of a chat session.
#[derive(Clone)]
pub struct ChatDeps {
    pub store: Arc<dyn KeyValueStore>,
    pub transcripts: Arc<dyn TranscriptRepository>,
    pub ledger: Arc<BalanceLedger>,
    pub bot: Arc<dyn TarotBot>,
    pub persona: Arc<PersonaService>,
    pub language: LanguageService,
    pub policy: BillingPolicy,
}

struct SessionState {
    gate: BillingGate,
    transcript: ChatTranscript,
    reading: Option<TarotReading>,
}

struct Ticker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

pub struct ChatSession {
    session_id: String,
    state: Arc<Mutex<SessionState>>,
    deps: ChatDeps,
    events: broadcast::Sender<SessionEvent>,
    ticker: std::sync::Mutex<Option<Ticker>>,
    /// Serializes paid extensions.
    extending: Mutex<()>,
}

impl ChatSession {
    /// Opens a chat session.
    ///
    /// With `resume` the stored transcript of that session is restored;
    /// otherwise a new session id is generated. The gate decides between a
    /// free, active or expired start (see [`BillingGate::open`]).
    pub async fn open(deps: ChatDeps, resume: Option<&str>) -> Result<Self> {
        let gate = BillingGate::open(deps.store.clone(), deps.policy.clone()).await?;
        let transcript = match resume {
            Some(id) => ChatTranscript::load(id, deps.transcripts.clone()).await?,
            None => ChatTranscript::new(new_session_id(), deps.transcripts.clone()),
        };
        let session_id = transcript.session_id().to_string();

        if let Err(e) = deps
            .store
            .set(keys::CURRENT_SESSION, session_id.clone())
            .await
        {
            tracing::warn!(error = %e, "failed to remember current session");
        }
        deps.ledger.refresh().await;

        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        tracing::info!(%session_id, state = ?gate.state(), "chat session opened");

        Ok(Self {
            session_id,
            state: Arc::new(Mutex::new(SessionState {
                gate,
                transcript,
                reading: None,
            })),
            deps,
            events,
            ticker: std::sync::Mutex::new(None),
            extending: Mutex::new(()),
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Starts the clock and its one-second ticker.
    ///
    /// Idempotent. An expired session keeps its ticker idle until extended.
    pub async fn start(&self) {
        self.state.lock().await.gate.start();

        let Ok(mut ticker) = self.ticker.lock() else {
            return;
        };
        if ticker.is_none() {
            *ticker = Some(self.spawn_ticker());
        }
    }

    /// Stops the ticker and the clock. Safe to call when not running.
    pub async fn stop(&self) {
        let ticker = self.ticker.lock().ok().and_then(|mut t| t.take());
        if let Some(ticker) = ticker {
            ticker.cancel.cancel();
            if let Err(e) = ticker.handle.await {
                tracing::warn!(error = %e, "session ticker ended abnormally");
            }
        }
        self.state.lock().await.gate.stop();
    }

    pub async fn status(&self) -> SessionStatus {
        let state = self.state.lock().await;
        let clock = state.gate.clock();
        SessionStatus {
            session_id: self.session_id.clone(),
            state: state.gate.state(),
            elapsed: clock.elapsed(),
            remaining: clock.remaining(),
            budget: clock.budget(),
            balance: self.deps.ledger.balance(),
        }
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().await.transcript.messages().to_vec()
    }

    /// Sends a user message and waits for the bot's reply.
    ///
    /// The user message is recorded before the request, the reply after it.
    /// A failed request leaves only the user message behind.
    pub async fn send_message(&self, text: &str) -> Result<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ArcanaError::validation("Message cannot be empty"));
        }
        self.ask(text.to_string()).await
    }

    /// Pays for one extension and reopens an expired session.
    ///
    /// The clock is only rewound after the backend confirmed the debit; a
    /// refused debit leaves both the balance and the clock untouched.
    pub async fn extend(&self) -> Result<DebitReceipt> {
        let _serial = self.extending.lock().await;

        if !self.state.lock().await.gate.is_expired() {
            return Err(ArcanaError::validation("Session is still active"));
        }

        let receipt = self.deps.ledger.debit(self.deps.policy.extension_price).await?;

        let elapsed = {
            let mut state = self.state.lock().await;
            state.gate.extend(&receipt).await?;
            state.gate.clock().elapsed()
        };
        let _ = self.events.send(SessionEvent::Resumed {
            elapsed,
            balance: receipt.balance(),
        });
        Ok(receipt)
    }

    // ============================================================================
    // Guided tarot reading
    // ============================================================================

    /// Starts a guided reading; the bot asks for the issue.
    pub async fn begin_reading(&self) -> Result<()> {
        let lang = self.deps.language.current();
        let mut state = self.state.lock().await;
        state.gate.ensure_accepts_input()?;
        state.reading = Some(TarotReading::new());
        state
            .transcript
            .append(ChatMessage::bot_text(reading_text(ReadingPrompt::ChooseIssue, lang)))
            .await;
        Ok(())
    }

    pub async fn reading_stage(&self) -> Option<ReadingStage> {
        self.state.lock().await.reading.as_ref().map(|r| r.stage())
    }

    pub async fn choose_issue(&self, issue: ReadingIssue) -> Result<()> {
        let lang = self.deps.language.current();
        let mut state = self.state.lock().await;
        state.gate.ensure_accepts_input()?;
        reading_mut(&mut state.reading)?.choose_issue(issue)?;

        let chosen = format!("{} {}", reading_text(ReadingPrompt::Chosen, lang), issue.label(lang));
        state.transcript.append(ChatMessage::bot_text(chosen)).await;
        state
            .transcript
            .append(ChatMessage::bot_text(reading_text(ReadingPrompt::Shuffle, lang)))
            .await;
        Ok(())
    }

    pub async fn shuffle_pool(&self, count: usize) -> Result<()> {
        let lang = self.deps.language.current();
        let mut state = self.state.lock().await;
        state.gate.ensure_accepts_input()?;
        let mut rng = StdRng::from_entropy();
        reading_mut(&mut state.reading)?.shuffle_pool(count, &mut rng)?;

        let shuffled = format!("{} ({count})", reading_text(ReadingPrompt::Shuffled, lang));
        state.transcript.append(ChatMessage::bot_text(shuffled)).await;
        state
            .transcript
            .append(ChatMessage::bot_text(reading_text(ReadingPrompt::Draw, lang)))
            .await;
        Ok(())
    }

    /// Draws cards, shows them and asks the bot to interpret them.
    ///
    /// Returns the bot's interpretation.
    pub async fn draw_cards(&self, count: usize) -> Result<ChatMessage> {
        let lang = self.deps.language.current();
        let question = {
            let mut state = self.state.lock().await;
            state.gate.ensure_accepts_input()?;
            let mut rng = StdRng::from_entropy();
            let reading = reading_mut(&mut state.reading)?;
            let drawn: Vec<_> = reading.draw(count, &mut rng)?.to_vec();
            let question = reading
                .interpretation_question(lang)
                .ok_or_else(|| ArcanaError::internal("Reading has no issue"))?;

            let names: Vec<&str> = drawn.iter().map(|card| card.name(lang)).collect();
            let summary = format!("{} {}", reading_text(ReadingPrompt::Drawn, lang), names.join(", "));
            state.transcript.append(ChatMessage::bot_text(summary)).await;
            for card in drawn {
                state.transcript.append(ChatMessage::bot_card(card.face(lang))).await;
            }
            question
        };
        self.ask(question).await
    }

    // ============================================================================
    // Internals
    // ============================================================================

    async fn ask(&self, question: String) -> Result<ChatMessage> {
        {
            let mut state = self.state.lock().await;
            state.gate.ensure_accepts_input()?;
            state
                .transcript
                .append(ChatMessage::user_text(question.clone()))
                .await;
        }

        let lang = detect_language(&question);
        let system = self.deps.persona.system_prompt(lang).await?;
        let request = BotRequest {
            question,
            system,
            lang,
        };
        let answer = self.deps.bot.ask(&request).await.map_err(|e| {
            tracing::warn!(session_id = %self.session_id, error = %e, "bot request failed");
            e
        })?;

        let reply = ChatMessage::bot_text(answer);
        self.state
            .lock()
            .await
            .transcript
            .append(reply.clone())
            .await;
        Ok(reply)
    }

    fn spawn_ticker(&self) -> Ticker {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let state = Arc::clone(&self.state);
        let ledger = Arc::clone(&self.deps.ledger);
        let events = self.events.clone();
        let session_id = self.session_id.clone();

        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let transition = state.lock().await.gate.on_tick().await;
                match transition {
                    GateTransition::Unchanged => {}
                    GateTransition::Counted { elapsed, remaining } => {
                        let _ = events.send(SessionEvent::Tick { elapsed, remaining });
                    }
                    GateTransition::Expired => {
                        let balance = ledger.refresh().await;
                        tracing::info!(%session_id, balance = %balance, "chat input blocked until recharge");
                        let _ = events.send(SessionEvent::Expired { balance });
                    }
                }
            }
            tracing::debug!(%session_id, "session ticker stopped");
        });

        Ticker { cancel, handle }
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            if let Some(ticker) = ticker.take() {
                ticker.cancel.cancel();
            }
        }
    }
}

fn reading_mut(reading: &mut Option<TarotReading>) -> Result<&mut TarotReading> {
    reading
        .as_mut()
        .ok_or_else(|| ArcanaError::validation("Start a reading first"))
}

#[derive(Debug, Clone, Copy)]
enum ReadingPrompt {
    ChooseIssue,
    Chosen,
    Shuffle,
    Shuffled,
    Draw,
    Drawn,
}

fn reading_text(prompt: ReadingPrompt, lang: Language) -> &'static str {
    use ReadingPrompt::*;
    match (prompt, lang) {
        (ChooseIssue, Language::En) => "Which part of your life shall the cards look into?",
        (ChooseIssue, Language::Zh) => "你想让塔罗牌为你解读哪方面的问题？",
        (Chosen, Language::En) => "You chose:",
        (Chosen, Language::Zh) => "你选择了：",
        (Shuffle, Language::En) => "How many cards shall I shuffle into the pool?",
        (Shuffle, Language::Zh) => "要洗多少张牌进入牌池？",
        (Shuffled, Language::En) => "The pool is shuffled",
        (Shuffled, Language::Zh) => "牌池已洗好",
        (Draw, Language::En) => "How many cards will you draw?",
        (Draw, Language::Zh) => "你要抽几张牌？",
        (Drawn, Language::En) => "You drew:",
        (Drawn, Language::Zh) => "你抽到了：",
    }
}
