//! Per-chat spin scheduler
//!
//! Every chat that arms the roulette gets one ticking task. The registry owns
//! the task handles explicitly, so arming twice is a visible conflict and
//! disarming (or process shutdown) cancels the exact task it targets instead
//! of relying on jobs to find each other by name.

use crate::errors::{RuletaResult, StateConflictError};
use crate::game::types::{ChatId, PlayerId, Wager};
use crate::game::{classify, settle, wheel};
use crate::platform::ChatApi;
use crate::store::CasinoStore;
use crate::texts;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, warn};

struct ChatSpinner {
    handle: JoinHandle<()>,
}

/// Registry of armed chats and their ticking spin tasks
pub struct SpinRegistry {
    spinners: DashMap<ChatId, ChatSpinner>,
    store: Arc<CasinoStore>,
    platform: Arc<dyn ChatApi>,
    interval: Duration,
}

impl SpinRegistry {
    pub fn new(store: Arc<CasinoStore>, platform: Arc<dyn ChatApi>, interval: Duration) -> Self {
        Self {
            spinners: DashMap::new(),
            store,
            platform,
            interval,
        }
    }

    /// Arm the wheel for a chat: open a round now, then spin every interval
    pub fn activate(&self, chat: ChatId) -> RuletaResult<Duration> {
        match self.spinners.entry(chat) {
            Entry::Occupied(_) => Err(StateConflictError::AlreadyArmed.into()),
            Entry::Vacant(slot) => {
                self.store.ensure_open_round(chat)?;

                let store = Arc::clone(&self.store);
                let platform = Arc::clone(&self.platform);
                let period = self.interval;
                let handle = tokio::spawn(async move {
                    // First draw lands one full period after activation.
                    let mut ticker = interval_at(Instant::now() + period, period);
                    loop {
                        ticker.tick().await;
                        let result = wheel::spin();
                        if let Err(e) =
                            run_cycle(store.as_ref(), platform.as_ref(), chat, result).await
                        {
                            error!(chat, error = %e, "round cycle failed");
                        }
                    }
                });

                slot.insert(ChatSpinner { handle });
                info!("🎡 Roulette armed for chat {} (every {}s)", chat, period.as_secs());
                Ok(period)
            }
        }
    }

    /// Disarm the wheel for a chat, cancelling its spin task
    pub fn deactivate(&self, chat: ChatId) -> RuletaResult<()> {
        match self.spinners.remove(&chat) {
            Some((_, spinner)) => {
                spinner.handle.abort();
                info!("🛑 Roulette disarmed for chat {}", chat);
                Ok(())
            }
            None => Err(StateConflictError::NotArmed.into()),
        }
    }

    pub fn is_armed(&self, chat: ChatId) -> bool {
        self.spinners.contains_key(&chat)
    }

    pub fn active_count(&self) -> usize {
        self.spinners.len()
    }

    /// Cancel every spin task; armed state is not persisted across restarts
    pub fn shutdown(&self) {
        let count = self.spinners.len();
        self.spinners.retain(|_, spinner| {
            spinner.handle.abort();
            false
        });
        if count > 0 {
            info!("🛑 Cancelled {} spin task(s)", count);
        }
    }

    pub fn spin_interval(&self) -> Duration {
        self.interval
    }
}

/// One full draw-settle-reopen cycle for a chat
///
/// The drawn pocket comes in as a parameter, which keeps the whole cycle
/// deterministic under test. Failures to announce never roll back chips.
pub async fn run_cycle(
    store: &CasinoStore,
    platform: &dyn ChatApi,
    chat: ChatId,
    result: u8,
) -> RuletaResult<()> {
    let Some(round) = store.seal_round(chat, result)? else {
        // Nothing was open; start the chat's next round and wait for bets.
        store.ensure_open_round(chat)?;
        return Ok(());
    };

    let records = store.wagers(round.id)?;
    let mut wagers = Vec::with_capacity(records.len());
    for record in &records {
        match classify(&record.token) {
            Ok(kind) => wagers.push(Wager {
                player: record.player,
                kind,
                stake: record.stake,
            }),
            Err(e) => {
                // A stored token that no longer classifies is skipped, not fatal.
                warn!(round = round.id, token = %record.token, error = %e, "skipping unclassifiable stored wager");
            }
        }
    }

    let settlement = settle(&wagers, result);
    store.apply_payouts(&settlement.payouts)?;

    // Betting reopens before the announcement goes out; a slow or failing
    // platform never blocks the next round.
    store.ensure_open_round(chat)?;

    let top_name = match settlement.top.as_ref() {
        Some(top) => Some(winner_name(store, platform, chat, top.player).await),
        None => None,
    };
    let text = texts::round_announcement(result, &settlement, top_name.as_deref());
    if let Err(e) = platform.send_message(chat, &text).await {
        warn!(chat, error = %e, "result announcement failed");
    }

    debug!(
        chat,
        round = round.id,
        result,
        winners = settlement.payouts.len(),
        paid = settlement.total_paid,
        "round settled"
    );
    Ok(())
}

/// Best display name for the winner banner: live platform data first, then
/// the stored name, then a numeric placeholder.
async fn winner_name(
    store: &CasinoStore,
    platform: &dyn ChatApi,
    chat: ChatId,
    player: PlayerId,
) -> String {
    match platform.member(chat, player).await {
        Ok(member) if !member.display_name.is_empty() => member.display_name,
        _ => match store.display_name(player) {
            Ok(Some(name)) => name,
            _ => format!("Jugador-{}", player),
        },
    }
}
