//! Persistent casino state stored in RocksDB
//!
//! Players, rounds, and wagers live here as JSON values under prefixed keys.
//! Every read-modify-write runs under one internal lock and lands as a single
//! RocksDB write batch, so a crash never leaves a debit without its wager or a
//! sealed round with a live open-pointer.

use crate::errors::{RuletaResult, StoreError, ValidationError};
use crate::game::settlement::Payout;
use crate::game::types::{BetKind, ChatId, PlayerId, RoundId};
use rocksdb::{Direction, IteratorMode, Options, WriteBatch, DB};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

const PLAYER_PREFIX: &str = "player:";
const ROUND_PREFIX: &str = "round:record:";
const OPEN_ROUND_PREFIX: &str = "round:open:";
const WAGER_PREFIX: &[u8] = b"wager:";
const ROUND_SEQ_KEY: &[u8] = b"meta:round:seq";

/// One chip-holding player
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerRecord {
    pub id: PlayerId,
    /// Last display name seen for this player; may be empty until they speak
    #[serde(default)]
    pub display_name: String,
    pub balance: u64,
}

/// Lifecycle of a betting round
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Open,
    Settled,
}

/// One betting round in one chat
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoundRecord {
    pub id: RoundId,
    pub chat: ChatId,
    pub status: RoundStatus,
    /// Drawn pocket, set exactly once when the round is sealed
    pub result: Option<u8>,
    /// Number of wagers appended so far; doubles as the next wager sequence
    pub wager_count: u32,
    pub opened_at: i64,
}

/// One placed wager, persisted in placement order within its round
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WagerRecord {
    pub round: RoundId,
    pub chat: ChatId,
    pub player: PlayerId,
    /// Canonical bet token, re-classified at settlement time
    pub token: String,
    pub stake: u64,
    pub placed_at: i64,
}

fn player_key(id: PlayerId) -> Vec<u8> {
    format!("{}{}", PLAYER_PREFIX, id).into_bytes()
}

fn round_key(id: RoundId) -> Vec<u8> {
    format!("{}{}", ROUND_PREFIX, id).into_bytes()
}

fn open_round_key(chat: ChatId) -> Vec<u8> {
    format!("{}{}", OPEN_ROUND_PREFIX, chat).into_bytes()
}

fn round_wagers_prefix(round: RoundId) -> Vec<u8> {
    let mut key = Vec::with_capacity(WAGER_PREFIX.len() + 8);
    key.extend_from_slice(WAGER_PREFIX);
    key.extend_from_slice(&round.to_be_bytes());
    key
}

fn wager_key(round: RoundId, seq: u32) -> Vec<u8> {
    // Key layout: prefix | round(be) | seq(be), so a prefix scan walks one
    // round's wagers in placement order.
    let mut key = round_wagers_prefix(round);
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

/// RocksDB-backed store for players, rounds, and wagers
pub struct CasinoStore {
    db: Arc<DB>,
    write_lock: Mutex<()>,
    starting_balance: u64,
}

impl CasinoStore {
    pub fn open<P: AsRef<Path>>(path: P, starting_balance: u64) -> RuletaResult<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);

        let db = DB::open(&opts, path).map_err(|e| StoreError::OpenFailed(e.to_string()))?;
        Ok(Self {
            db: Arc::new(db),
            write_lock: Mutex::new(()),
            starting_balance,
        })
    }

    /// Balance handed to a player the first time the store sees them
    pub fn starting_balance(&self) -> u64 {
        self.starting_balance
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        // A poisoned lock only means another thread panicked mid-write; the
        // batch semantics keep the data consistent, so take the guard back.
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn get_json<T: for<'de> Deserialize<'de>>(&self, key: &[u8]) -> RuletaResult<Option<T>> {
        let Some(bytes) = self
            .db
            .get(key)
            .map_err(|e| StoreError::ReadFailed(e.to_string()))?
        else {
            return Ok(None);
        };

        let value = serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptedRecord {
            key: String::from_utf8_lossy(key).into_owned(),
            reason: e.to_string(),
        })?;
        Ok(Some(value))
    }

    fn encode<T: Serialize>(key: &[u8], value: &T) -> RuletaResult<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| {
            StoreError::WriteFailed(format!(
                "failed to encode {}: {}",
                String::from_utf8_lossy(key),
                e
            ))
            .into()
        })
    }

    fn batch_write(&self, batch: WriteBatch) -> RuletaResult<()> {
        self.db
            .write(batch)
            .map_err(|e| StoreError::WriteFailed(e.to_string()).into())
    }

    fn scan_prefix(&self, prefix: &[u8]) -> RuletaResult<Vec<(Box<[u8]>, Box<[u8]>)>> {
        let mut rows = Vec::new();
        for item in self
            .db
            .iterator(IteratorMode::From(prefix, Direction::Forward))
        {
            let (key, value) = item.map_err(|e| StoreError::ReadFailed(e.to_string()))?;
            if !key.starts_with(prefix) {
                break;
            }
            rows.push((key, value));
        }
        Ok(rows)
    }

    // ------------------------------------------------------------------
    // Players
    // ------------------------------------------------------------------

    pub fn player(&self, id: PlayerId) -> RuletaResult<Option<PlayerRecord>> {
        self.get_json(&player_key(id))
    }

    /// Current balance; players the store has never seen hold nothing
    pub fn balance(&self, id: PlayerId) -> RuletaResult<u64> {
        Ok(self.player(id)?.map(|p| p.balance).unwrap_or(0))
    }

    pub fn display_name(&self, id: PlayerId) -> RuletaResult<Option<String>> {
        Ok(self
            .player(id)?
            .map(|p| p.display_name)
            .filter(|name| !name.is_empty()))
    }

    /// Create the player with the starting balance if unknown, refreshing the
    /// stored display name either way.
    pub fn ensure_player(&self, id: PlayerId, display_name: &str) -> RuletaResult<PlayerRecord> {
        let _guard = self.guard();

        let record = match self.player(id)? {
            Some(mut existing) => {
                if !display_name.is_empty() && existing.display_name != display_name {
                    existing.display_name = display_name.to_string();
                    let key = player_key(id);
                    let bytes = Self::encode(&key, &existing)?;
                    let mut batch = WriteBatch::default();
                    batch.put(&key, &bytes);
                    self.batch_write(batch)?;
                }
                existing
            }
            None => {
                let fresh = PlayerRecord {
                    id,
                    display_name: display_name.to_string(),
                    balance: self.starting_balance,
                };
                let key = player_key(id);
                let bytes = Self::encode(&key, &fresh)?;
                let mut batch = WriteBatch::default();
                batch.put(&key, &bytes);
                self.batch_write(batch)?;
                tracing::info!(player = id, balance = fresh.balance, "registered new player");
                fresh
            }
        };

        Ok(record)
    }

    /// Add or remove chips. Unknown players are created with the starting
    /// balance first, then the delta applies. Debits clamp at zero.
    pub fn adjust_balance(&self, id: PlayerId, delta: i64) -> RuletaResult<u64> {
        let _guard = self.guard();
        self.adjust_balance_locked(id, delta)
    }

    fn adjust_balance_locked(&self, id: PlayerId, delta: i64) -> RuletaResult<u64> {
        if delta.is_negative() {
            self.debit_locked(id, delta.unsigned_abs())
        } else {
            self.credit_locked(id, delta.unsigned_abs())
        }
    }

    /// Credits take the full u64 range: a saturated payout can exceed
    /// `i64::MAX` and must never fold into a signed delta.
    fn credit_locked(&self, id: PlayerId, amount: u64) -> RuletaResult<u64> {
        let mut record = self.player(id)?.unwrap_or(PlayerRecord {
            id,
            display_name: String::new(),
            balance: self.starting_balance,
        });
        record.balance = record.balance.saturating_add(amount);

        let key = player_key(id);
        let bytes = Self::encode(&key, &record)?;
        let mut batch = WriteBatch::default();
        batch.put(&key, &bytes);
        self.batch_write(batch)?;
        Ok(record.balance)
    }

    fn debit_locked(&self, id: PlayerId, amount: u64) -> RuletaResult<u64> {
        let mut record = self.player(id)?.unwrap_or(PlayerRecord {
            id,
            display_name: String::new(),
            balance: self.starting_balance,
        });
        record.balance = record.balance.saturating_sub(amount);

        let key = player_key(id);
        let bytes = Self::encode(&key, &record)?;
        let mut batch = WriteBatch::default();
        batch.put(&key, &bytes);
        self.batch_write(batch)?;
        Ok(record.balance)
    }

    /// Overwrite a balance outright (admin `give` path uses the delta form;
    /// this exists for tooling and tests)
    pub fn set_balance(&self, id: PlayerId, amount: u64) -> RuletaResult<u64> {
        let _guard = self.guard();

        let mut record = self.player(id)?.unwrap_or(PlayerRecord {
            id,
            display_name: String::new(),
            balance: self.starting_balance,
        });
        record.balance = amount;

        let key = player_key(id);
        let bytes = Self::encode(&key, &record)?;
        let mut batch = WriteBatch::default();
        batch.put(&key, &bytes);
        self.batch_write(batch)?;
        Ok(amount)
    }

    /// Move chips between two players atomically
    pub fn transfer(
        &self,
        from: PlayerId,
        to: PlayerId,
        amount: u64,
    ) -> RuletaResult<(u64, u64)> {
        let _guard = self.guard();

        let giver_balance = self.player(from)?.map(|p| p.balance).unwrap_or(0);
        if giver_balance < amount {
            return Err(ValidationError::InsufficientBalance {
                balance: giver_balance,
                needed: amount,
            }
            .into());
        }

        let giver_after = self.debit_locked(from, amount)?;
        let recipient_after = self.credit_locked(to, amount)?;
        Ok((giver_after, recipient_after))
    }

    /// All players ordered by balance, richest first; ties break on the lower
    /// player id
    pub fn top_players(&self, limit: usize) -> RuletaResult<Vec<PlayerRecord>> {
        let mut players = Vec::new();
        for (key, value) in self.scan_prefix(PLAYER_PREFIX.as_bytes())? {
            let record: PlayerRecord =
                serde_json::from_slice(&value).map_err(|e| StoreError::CorruptedRecord {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    reason: e.to_string(),
                })?;
            players.push(record);
        }

        players.sort_by(|a, b| b.balance.cmp(&a.balance).then(a.id.cmp(&b.id)));
        players.truncate(limit);
        Ok(players)
    }

    pub fn player_count(&self) -> RuletaResult<usize> {
        Ok(self.scan_prefix(PLAYER_PREFIX.as_bytes())?.len())
    }

    /// Drop a player record entirely. Their wagers stay in round history.
    pub fn remove_player(&self, id: PlayerId) -> RuletaResult<bool> {
        let _guard = self.guard();

        if self.player(id)?.is_none() {
            return Ok(false);
        }
        self.db
            .delete(player_key(id))
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        tracing::info!(player = id, "removed player record");
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Rounds and wagers
    // ------------------------------------------------------------------

    pub fn round(&self, id: RoundId) -> RuletaResult<Option<RoundRecord>> {
        self.get_json(&round_key(id))
    }

    /// The chat's open round, if any
    pub fn current_round(&self, chat: ChatId) -> RuletaResult<Option<RoundRecord>> {
        let Some(id) = self.get_json::<RoundId>(&open_round_key(chat))? else {
            return Ok(None);
        };
        self.round(id)
    }

    /// Return the chat's open round, opening a fresh one if none exists
    pub fn ensure_open_round(&self, chat: ChatId) -> RuletaResult<RoundRecord> {
        let _guard = self.guard();
        self.ensure_open_round_locked(chat)
    }

    fn ensure_open_round_locked(&self, chat: ChatId) -> RuletaResult<RoundRecord> {
        if let Some(round) = self.current_round(chat)? {
            return Ok(round);
        }

        let next_id = self
            .get_json::<RoundId>(ROUND_SEQ_KEY)?
            .unwrap_or(0)
            .saturating_add(1);
        let round = RoundRecord {
            id: next_id,
            chat,
            status: RoundStatus::Open,
            result: None,
            wager_count: 0,
            opened_at: chrono::Utc::now().timestamp(),
        };

        let record_key = round_key(next_id);
        let record_bytes = Self::encode(&record_key, &round)?;
        let pointer_key = open_round_key(chat);
        let pointer_bytes = Self::encode(&pointer_key, &next_id)?;
        let seq_bytes = Self::encode(ROUND_SEQ_KEY, &next_id)?;

        let mut batch = WriteBatch::default();
        batch.put(&record_key, &record_bytes);
        batch.put(&pointer_key, &pointer_bytes);
        batch.put(ROUND_SEQ_KEY, &seq_bytes);
        self.batch_write(batch)?;

        tracing::info!(chat, round = next_id, "opened round");
        Ok(round)
    }

    /// Debit the stake and append the wager to the chat's open round in one
    /// batch, opening the round first if needed.
    pub fn place_wager(
        &self,
        chat: ChatId,
        player: PlayerId,
        kind: &BetKind,
        stake: u64,
    ) -> RuletaResult<(RoundRecord, WagerRecord)> {
        let _guard = self.guard();

        let Some(mut player_record) = self.player(player)? else {
            return Err(ValidationError::InsufficientBalance {
                balance: 0,
                needed: stake,
            }
            .into());
        };
        if player_record.balance < stake {
            return Err(ValidationError::InsufficientBalance {
                balance: player_record.balance,
                needed: stake,
            }
            .into());
        }

        let mut round = self.ensure_open_round_locked(chat)?;

        player_record.balance -= stake;
        let wager = WagerRecord {
            round: round.id,
            chat,
            player,
            token: kind.to_string(),
            stake,
            placed_at: chrono::Utc::now().timestamp(),
        };
        let seq = round.wager_count;
        round.wager_count += 1;

        let player_db_key = player_key(player);
        let player_bytes = Self::encode(&player_db_key, &player_record)?;
        let round_db_key = round_key(round.id);
        let round_bytes = Self::encode(&round_db_key, &round)?;
        let wager_db_key = wager_key(round.id, seq);
        let wager_bytes = Self::encode(&wager_db_key, &wager)?;

        let mut batch = WriteBatch::default();
        batch.put(&player_db_key, &player_bytes);
        batch.put(&round_db_key, &round_bytes);
        batch.put(&wager_db_key, &wager_bytes);
        self.batch_write(batch)?;

        tracing::debug!(
            chat,
            round = round.id,
            player,
            token = %wager.token,
            stake,
            "wager placed"
        );
        Ok((round, wager))
    }

    /// Seal the chat's open round with the drawn pocket
    ///
    /// Returns `None` when no round is open. The result is written exactly
    /// once; the open-pointer disappears in the same batch.
    pub fn seal_round(&self, chat: ChatId, result: u8) -> RuletaResult<Option<RoundRecord>> {
        let _guard = self.guard();

        let pointer_key = open_round_key(chat);
        let Some(round_id) = self.get_json::<RoundId>(&pointer_key)? else {
            return Ok(None);
        };
        let Some(mut round) = self.round(round_id)? else {
            // Dangling pointer; clear it and report no open round.
            tracing::warn!(chat, round = round_id, "open-round pointer had no record");
            self.db
                .delete(&pointer_key)
                .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
            return Ok(None);
        };

        round.status = RoundStatus::Settled;
        round.result = Some(result);

        let record_key = round_key(round_id);
        let record_bytes = Self::encode(&record_key, &round)?;
        let mut batch = WriteBatch::default();
        batch.put(&record_key, &record_bytes);
        batch.delete(&pointer_key);
        self.batch_write(batch)?;

        tracing::info!(chat, round = round_id, result, "sealed round");
        Ok(Some(round))
    }

    /// All wagers of one round in placement order
    pub fn wagers(&self, round: RoundId) -> RuletaResult<Vec<WagerRecord>> {
        let prefix = round_wagers_prefix(round);
        let mut wagers = Vec::new();
        for (key, value) in self.scan_prefix(&prefix)? {
            let record: WagerRecord =
                serde_json::from_slice(&value).map_err(|e| StoreError::CorruptedRecord {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    reason: e.to_string(),
                })?;
            wagers.push(record);
        }
        Ok(wagers)
    }

    /// Credit every payout of a settled round in one batch
    pub fn apply_payouts(&self, payouts: &[Payout]) -> RuletaResult<()> {
        if payouts.is_empty() {
            return Ok(());
        }
        let _guard = self.guard();
        for payout in payouts {
            self.credit_locked(payout.player, payout.amount)?;
        }
        Ok(())
    }
}
