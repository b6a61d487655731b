//! Command layer: one inbound chat message in, at most one reply out
//!
//! Unknown text is silently ignored. Player mistakes come back as chat
//! replies; only infrastructure failures escalate to the caller.

use crate::errors::{RuletaError, RuletaResult, ValidationError};
use crate::game::classify;
use crate::game::types::{ChatId, PlayerId};
use crate::platform::ChatApi;
use crate::scheduler::SpinRegistry;
use crate::store::CasinoStore;
use crate::texts;
use std::sync::Arc;
use tracing::{debug, warn};

const BET_USAGE: &str = "/bet <stake> <token>";
const GIVE_USAGE: &str = "/give <amount> as a reply, or /give <player-id> <amount>";
const GIFT_USAGE: &str = "/gift <amount> as a reply to the recipient";

/// Whoever wrote or is referenced by a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: PlayerId,
    pub display_name: String,
    pub is_bot: bool,
}

/// One chat message on its way into the dispatcher
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub chat: ChatId,
    pub sender: Participant,
    pub text: String,
    /// Present when the message was sent as a reply to someone
    pub reply_to: Option<Participant>,
}

fn display(participant: &Participant) -> String {
    if participant.display_name.is_empty() {
        format!("Jugador-{}", participant.id)
    } else {
        participant.display_name.clone()
    }
}

/// Positive whole number that also fits a balance delta
fn parse_positive(raw: &str) -> Option<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|v| *v > 0 && *v <= i64::MAX as u64)
}

/// Split `/name arg arg` into the command name and its arguments
///
/// A `@BotName` suffix on the command word is dropped, as chat clients add it
/// when completing commands in groups. Text without the leading slash is not
/// a command.
fn parse_command(text: &str) -> Option<(&str, Vec<&str>)> {
    let mut words = text.split_whitespace();
    let first = words.next()?;
    let name = first.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }
    Some((name, words.collect()))
}

/// Routes chat commands to the store, the spin registry, and the platform
pub struct Dispatcher {
    store: Arc<CasinoStore>,
    registry: Arc<SpinRegistry>,
    platform: Arc<dyn ChatApi>,
    ranking_size: usize,
    /// The bot's own account id, when known; it must stay out of the economy
    bot_player_id: Option<PlayerId>,
}

impl Dispatcher {
    pub fn new(
        store: Arc<CasinoStore>,
        registry: Arc<SpinRegistry>,
        platform: Arc<dyn ChatApi>,
        ranking_size: usize,
        bot_player_id: Option<PlayerId>,
    ) -> Self {
        Self {
            store,
            registry,
            platform,
            ranking_size,
            bot_player_id,
        }
    }

    /// Handle one message. `Ok(None)` means it was not a command for us.
    pub async fn dispatch(&self, msg: &InboundMessage) -> RuletaResult<Option<String>> {
        let Some((command, args)) = parse_command(&msg.text) else {
            return Ok(None);
        };

        let outcome = match command {
            "start" => self.start(msg).await,
            "balance" => self.balance(msg).await,
            "rules" => Ok(texts::rules()),
            "bet" => self.bet(msg, &args).await,
            "roulette-on" => self.roulette_on(msg).await,
            "roulette-off" => self.roulette_off(msg).await,
            "give" => self.give(msg, &args).await,
            "gift" => self.gift(msg, &args).await,
            "list-admins" => self.list_admins(msg).await,
            "ranking" => self.ranking().await,
            _ => return Ok(None),
        };

        match outcome {
            Ok(reply) => Ok(Some(reply)),
            Err(e) if e.is_player_facing() => {
                debug!(chat = msg.chat, command, error = %e, "command rejected");
                Ok(Some(texts::error_reply(&e)))
            }
            Err(e) => Err(e),
        }
    }

    async fn start(&self, msg: &InboundMessage) -> RuletaResult<String> {
        let record = self
            .store
            .ensure_player(msg.sender.id, &msg.sender.display_name)?;
        Ok(texts::welcome(&display(&msg.sender), record.balance))
    }

    async fn balance(&self, msg: &InboundMessage) -> RuletaResult<String> {
        let record = self
            .store
            .ensure_player(msg.sender.id, &msg.sender.display_name)?;
        Ok(texts::balance_report(&display(&msg.sender), record.balance))
    }

    async fn bet(&self, msg: &InboundMessage, args: &[&str]) -> RuletaResult<String> {
        let &[stake_raw, token_raw] = args else {
            return Err(ValidationError::BadUsage(BET_USAGE).into());
        };

        let stake = parse_positive(stake_raw)
            .ok_or_else(|| ValidationError::InvalidStake(stake_raw.to_string()))?;
        let kind = classify(token_raw).map_err(|reason| ValidationError::InvalidToken {
            token: token_raw.to_string(),
            reason,
        })?;

        self.store
            .ensure_player(msg.sender.id, &msg.sender.display_name)?;
        let (round, wager) = self.store.place_wager(msg.chat, msg.sender.id, &kind, stake)?;

        Ok(texts::bet_accepted(
            &display(&msg.sender),
            stake,
            &wager.token,
            round.id,
        ))
    }

    async fn roulette_on(&self, msg: &InboundMessage) -> RuletaResult<String> {
        self.require_admin(msg.chat, msg.sender.id).await?;
        let period = self.registry.activate(msg.chat)?;
        Ok(texts::roulette_activated(period.as_secs()))
    }

    async fn roulette_off(&self, msg: &InboundMessage) -> RuletaResult<String> {
        self.require_admin(msg.chat, msg.sender.id).await?;
        self.registry.deactivate(msg.chat)?;
        Ok(texts::roulette_deactivated())
    }

    async fn give(&self, msg: &InboundMessage, args: &[&str]) -> RuletaResult<String> {
        self.require_admin(msg.chat, msg.sender.id).await?;

        let (target_id, target_name, amount_raw) = match args {
            // Reply form: the amount is the only argument.
            &[amount_raw] => {
                let Some(target) = &msg.reply_to else {
                    return Err(ValidationError::MissingTarget.into());
                };
                if target.is_bot {
                    return Err(ValidationError::BotRecipient.into());
                }
                (target.id, Some(display(target)), amount_raw)
            }
            &[target_raw, amount_raw] => {
                let id = target_raw
                    .parse::<PlayerId>()
                    .map_err(|_| ValidationError::BadUsage(GIVE_USAGE))?;
                (id, None, amount_raw)
            }
            _ => return Err(ValidationError::BadUsage(GIVE_USAGE).into()),
        };

        // Bare ids carry no bot flag, so both arms also check the one bot
        // account we always know: our own.
        if self.bot_player_id == Some(target_id) {
            return Err(ValidationError::BotRecipient.into());
        }

        let amount = parse_positive(amount_raw)
            .ok_or_else(|| ValidationError::InvalidAmount(amount_raw.to_string()))?;
        self.store.adjust_balance(target_id, amount as i64)?;

        let name = match target_name {
            Some(name) => name,
            None => self
                .store
                .display_name(target_id)?
                .unwrap_or_else(|| format!("Jugador-{}", target_id)),
        };
        Ok(texts::chips_granted(amount, &name))
    }

    async fn gift(&self, msg: &InboundMessage, args: &[&str]) -> RuletaResult<String> {
        let &[amount_raw] = args else {
            return Err(ValidationError::BadUsage(GIFT_USAGE).into());
        };
        let amount = parse_positive(amount_raw)
            .ok_or_else(|| ValidationError::InvalidAmount(amount_raw.to_string()))?;

        let Some(target) = &msg.reply_to else {
            return Err(ValidationError::MissingTarget.into());
        };
        if target.is_bot {
            return Err(ValidationError::BotRecipient.into());
        }

        self.store
            .ensure_player(msg.sender.id, &msg.sender.display_name)?;
        self.store.transfer(msg.sender.id, target.id, amount)?;

        Ok(texts::chips_gifted(
            &display(&msg.sender),
            amount,
            &display(target),
        ))
    }

    async fn list_admins(&self, msg: &InboundMessage) -> RuletaResult<String> {
        let admins = self.platform.chat_admins(msg.chat).await?;
        Ok(texts::admin_list(&admins))
    }

    async fn ranking(&self) -> RuletaResult<String> {
        let rows = self.store.top_players(self.ranking_size)?;
        Ok(texts::ranking(&rows))
    }

    /// Admin gate with a two-step lookup
    ///
    /// The roster query decides when it answers. When it fails, a single
    /// member lookup gets one more chance; if that fails too the status is
    /// unknown and the gate stays closed.
    async fn require_admin(&self, chat: ChatId, player: PlayerId) -> RuletaResult<()> {
        match self.platform.chat_admins(chat).await {
            Ok(admins) => {
                if admins.iter().any(|a| a.id == player && a.role.is_admin()) {
                    Ok(())
                } else {
                    Err(RuletaError::Unauthorized)
                }
            }
            Err(primary) => {
                warn!(chat, error = %primary, "admin roster query failed, trying member lookup");
                match self.platform.member(chat, player).await {
                    Ok(member) if member.role.is_admin() => Ok(()),
                    Ok(_) => Err(RuletaError::Unauthorized),
                    Err(fallback) => {
                        warn!(chat, player, error = %fallback, "admin status unknown, denying");
                        Err(RuletaError::Unauthorized)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{ChatMember, ChatRole, PlatformError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Scriptable platform stub: a fixed roster plus failure switches
    #[derive(Default)]
    struct StubChat {
        admins: Vec<ChatMember>,
        members: HashMap<PlayerId, ChatMember>,
        roster_fails: bool,
        member_fails: bool,
        sent: Mutex<Vec<(ChatId, String)>>,
    }

    #[async_trait]
    impl ChatApi for StubChat {
        async fn send_message(&self, chat: ChatId, text: &str) -> Result<(), PlatformError> {
            self.sent.lock().unwrap().push((chat, text.to_string()));
            Ok(())
        }

        async fn chat_admins(&self, chat: ChatId) -> Result<Vec<ChatMember>, PlatformError> {
            if self.roster_fails {
                return Err(PlatformError::Unavailable(format!("roster of {}", chat)));
            }
            Ok(self.admins.clone())
        }

        async fn member(&self, chat: ChatId, player: PlayerId) -> Result<ChatMember, PlatformError> {
            if self.member_fails {
                return Err(PlatformError::Unavailable("member lookup".to_string()));
            }
            self.members
                .get(&player)
                .cloned()
                .ok_or(PlatformError::UnknownMember { chat, player })
        }
    }

    fn admin(id: PlayerId, name: &str) -> ChatMember {
        ChatMember {
            id,
            display_name: name.to_string(),
            role: ChatRole::Admin,
        }
    }

    struct Fixture {
        _dir: TempDir,
        store: Arc<CasinoStore>,
        registry: Arc<SpinRegistry>,
        dispatcher: Dispatcher,
    }

    fn fixture(platform: StubChat) -> Fixture {
        fixture_with_bot_id(platform, None)
    }

    fn fixture_with_bot_id(platform: StubChat, bot_player_id: Option<PlayerId>) -> Fixture {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(CasinoStore::open(dir.path(), 1_000).unwrap());
        let platform: Arc<dyn ChatApi> = Arc::new(platform);
        let registry = Arc::new(SpinRegistry::new(
            Arc::clone(&store),
            Arc::clone(&platform),
            Duration::from_secs(120),
        ));
        let dispatcher = Dispatcher::new(
            Arc::clone(&store),
            Arc::clone(&registry),
            platform,
            10,
            bot_player_id,
        );
        Fixture {
            _dir: dir,
            store,
            registry,
            dispatcher,
        }
    }

    fn msg(text: &str) -> InboundMessage {
        InboundMessage {
            chat: -100,
            sender: Participant {
                id: 1,
                display_name: "Ana".to_string(),
                is_bot: false,
            },
            text: text.to_string(),
            reply_to: None,
        }
    }

    fn msg_from(id: PlayerId, name: &str, text: &str) -> InboundMessage {
        InboundMessage {
            chat: -100,
            sender: Participant {
                id,
                display_name: name.to_string(),
                is_bot: false,
            },
            text: text.to_string(),
            reply_to: None,
        }
    }

    fn with_reply(mut message: InboundMessage, target: Participant) -> InboundMessage {
        message.reply_to = Some(target);
        message
    }

    #[test]
    fn test_parse_command_grammar() {
        assert_eq!(parse_command("/rules"), Some(("rules", vec![])));
        assert_eq!(
            parse_command("/bet 100 rojo"),
            Some(("bet", vec!["100", "rojo"]))
        );
        assert_eq!(
            parse_command("/bet@RuletaBot 100 rojo"),
            Some(("bet", vec!["100", "rojo"]))
        );
        assert_eq!(parse_command("  /ranking  "), Some(("ranking", vec![])));
        assert_eq!(parse_command("hello there"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("/"), None);
    }

    #[tokio::test]
    async fn test_non_commands_are_ignored() {
        let f = fixture(StubChat::default());
        assert_eq!(f.dispatcher.dispatch(&msg("just chatting")).await.unwrap(), None);
        assert_eq!(f.dispatcher.dispatch(&msg("/unknowncmd")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_start_registers_and_welcomes() {
        let f = fixture(StubChat::default());

        let reply = f.dispatcher.dispatch(&msg("/start")).await.unwrap().unwrap();
        assert_eq!(reply, "🎰 Welcome, Ana! You hold 1000 chips.");
        assert_eq!(f.store.balance(1).unwrap(), 1_000);

        // A second /start neither resets nor doubles the balance.
        f.store.adjust_balance(1, -400).unwrap();
        let reply = f.dispatcher.dispatch(&msg("/start")).await.unwrap().unwrap();
        assert!(reply.contains("600"));
    }

    #[tokio::test]
    async fn test_balance_report() {
        let f = fixture(StubChat::default());
        let reply = f.dispatcher.dispatch(&msg("/balance")).await.unwrap().unwrap();
        assert_eq!(reply, "💰 Ana, you hold 1000 chips.");
    }

    #[tokio::test]
    async fn test_rules_lists_the_board() {
        let f = fixture(StubChat::default());
        let reply = f.dispatcher.dispatch(&msg("/rules")).await.unwrap().unwrap();
        for token in ["rojo", "docena1", "columna3", "x36", "x18", "x3"] {
            assert!(reply.contains(token), "rules must mention {}", token);
        }
    }

    #[tokio::test]
    async fn test_bet_places_and_debits() {
        let f = fixture(StubChat::default());

        let reply = f
            .dispatcher
            .dispatch(&msg("/bet 100 rojo"))
            .await
            .unwrap()
            .unwrap();

        assert!(reply.contains("Ana bet 100 on rojo"));
        assert!(reply.contains("round #1"));
        assert_eq!(f.store.balance(1).unwrap(), 900);

        let round = f.store.current_round(-100).unwrap().unwrap();
        assert_eq!(round.wager_count, 1);
    }

    #[tokio::test]
    async fn test_bet_canonicalizes_token() {
        let f = fixture(StubChat::default());
        let reply = f
            .dispatcher
            .dispatch(&msg("/bet 10 ROJO"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("on rojo"));
    }

    #[tokio::test]
    async fn test_bet_rejections() {
        let f = fixture(StubChat::default());

        let reply = f.dispatcher.dispatch(&msg("/bet")).await.unwrap().unwrap();
        assert!(reply.starts_with("Usage:"));

        let reply = f
            .dispatcher
            .dispatch(&msg("/bet diez rojo"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("not a valid stake"));

        let reply = f
            .dispatcher
            .dispatch(&msg("/bet 0 rojo"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("not a valid stake"));

        let reply = f
            .dispatcher
            .dispatch(&msg("/bet 10 verde"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("not a bet I know"));

        let reply = f
            .dispatcher
            .dispatch(&msg("/bet 99999 rojo"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("Not enough chips"));
        assert_eq!(f.store.balance(1).unwrap(), 1_000);
    }

    #[tokio::test]
    async fn test_roulette_on_requires_admin() {
        let f = fixture(StubChat {
            admins: vec![admin(2, "Luis")],
            ..Default::default()
        });

        let reply = f
            .dispatcher
            .dispatch(&msg("/roulette-on"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "⛔ Admins only.");
        assert!(!f.registry.is_armed(-100));

        let reply = f
            .dispatcher
            .dispatch(&msg_from(2, "Luis", "/roulette-on"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("every 120s"));
        assert!(f.registry.is_armed(-100));
        f.registry.shutdown();
    }

    #[tokio::test]
    async fn test_admin_fallback_uses_member_lookup() {
        let mut members = HashMap::new();
        members.insert(
            2,
            ChatMember {
                id: 2,
                display_name: "Luis".to_string(),
                role: ChatRole::Creator,
            },
        );
        let f = fixture(StubChat {
            roster_fails: true,
            members,
            ..Default::default()
        });

        let reply = f
            .dispatcher
            .dispatch(&msg_from(2, "Luis", "/roulette-on"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("Roulette armed"));
        f.registry.shutdown();
    }

    #[tokio::test]
    async fn test_admin_status_unknown_denies() {
        let f = fixture(StubChat {
            roster_fails: true,
            member_fails: true,
            ..Default::default()
        });

        let reply = f
            .dispatcher
            .dispatch(&msg("/roulette-on"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "⛔ Admins only.");
        assert!(!f.registry.is_armed(-100));
    }

    #[tokio::test]
    async fn test_double_activation_reports_conflict() {
        let f = fixture(StubChat {
            admins: vec![admin(1, "Ana")],
            ..Default::default()
        });

        f.dispatcher.dispatch(&msg("/roulette-on")).await.unwrap();
        let reply = f
            .dispatcher
            .dispatch(&msg("/roulette-on"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "⚠️ The roulette is already running.");
        f.registry.shutdown();
    }

    #[tokio::test]
    async fn test_roulette_off_lifecycle() {
        let f = fixture(StubChat {
            admins: vec![admin(1, "Ana")],
            ..Default::default()
        });

        let reply = f
            .dispatcher
            .dispatch(&msg("/roulette-off"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "ℹ️ The roulette isn't running.");

        f.dispatcher.dispatch(&msg("/roulette-on")).await.unwrap();
        let reply = f
            .dispatcher
            .dispatch(&msg("/roulette-off"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "🛑 Roulette stopped.");
        assert!(!f.registry.is_armed(-100));
    }

    #[tokio::test]
    async fn test_give_by_reply_and_by_id() {
        let f = fixture(StubChat {
            admins: vec![admin(1, "Ana")],
            ..Default::default()
        });

        let target = Participant {
            id: 5,
            display_name: "Eva".to_string(),
            is_bot: false,
        };
        let reply = f
            .dispatcher
            .dispatch(&with_reply(msg("/give 250"), target))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "✅ Granted 250 chips to Eva.");
        // Unknown target is created with the starting balance first.
        assert_eq!(f.store.balance(5).unwrap(), 1_250);

        let reply = f
            .dispatcher
            .dispatch(&msg("/give 5 100"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("100 chips"));
        assert_eq!(f.store.balance(5).unwrap(), 1_350);
    }

    #[tokio::test]
    async fn test_give_guards() {
        let f = fixture(StubChat {
            admins: vec![admin(1, "Ana")],
            ..Default::default()
        });

        // Not an admin.
        let reply = f
            .dispatcher
            .dispatch(&msg_from(2, "Luis", "/give 10"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "⛔ Admins only.");

        // No reply target and no id.
        let reply = f.dispatcher.dispatch(&msg("/give 10")).await.unwrap().unwrap();
        assert!(reply.contains("Reply to the player"));

        // Bots stay out of the economy.
        let bot = Participant {
            id: 900,
            display_name: "HelperBot".to_string(),
            is_bot: true,
        };
        let reply = f
            .dispatcher
            .dispatch(&with_reply(msg("/give 10"), bot))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "🤖 Bots can't hold chips.");

        let reply = f
            .dispatcher
            .dispatch(&msg("/give 5 abc"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("not a valid amount"));
    }

    #[tokio::test]
    async fn test_give_never_credits_the_bot_account() {
        let f = fixture_with_bot_id(
            StubChat {
                admins: vec![admin(1, "Ana")],
                ..Default::default()
            },
            Some(900),
        );

        // Explicit form: the bare id carries no bot flag.
        let reply = f
            .dispatcher
            .dispatch(&msg("/give 900 50"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "🤖 Bots can't hold chips.");
        assert_eq!(f.store.balance(900).unwrap(), 0);

        // Reply form with a connector that forgot to set the flag.
        let us = Participant {
            id: 900,
            display_name: "Ruleta".to_string(),
            is_bot: false,
        };
        let reply = f
            .dispatcher
            .dispatch(&with_reply(msg("/give 50"), us))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reply, "🤖 Bots can't hold chips.");
        assert_eq!(f.store.balance(900).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_gift_transfers_chips() {
        let f = fixture(StubChat::default());
        f.store.ensure_player(2, "Luis").unwrap();

        let target = Participant {
            id: 2,
            display_name: "Luis".to_string(),
            is_bot: false,
        };
        let reply = f
            .dispatcher
            .dispatch(&with_reply(msg("/gift 300"), target))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(reply, "🎁 Ana gifted 300 chips to Luis.");
        assert_eq!(f.store.balance(1).unwrap(), 700);
        assert_eq!(f.store.balance(2).unwrap(), 1_300);
    }

    #[tokio::test]
    async fn test_gift_guards() {
        let f = fixture(StubChat::default());

        let reply = f.dispatcher.dispatch(&msg("/gift 10")).await.unwrap().unwrap();
        assert!(reply.contains("Reply to the player"));

        let target = Participant {
            id: 2,
            display_name: "Luis".to_string(),
            is_bot: false,
        };
        let reply = f
            .dispatcher
            .dispatch(&with_reply(msg("/gift 5000"), target))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("Not enough chips"));
        assert_eq!(f.store.balance(2).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_admins() {
        let f = fixture(StubChat {
            admins: vec![admin(2, "Luis"), admin(3, "Eva")],
            ..Default::default()
        });

        let reply = f
            .dispatcher
            .dispatch(&msg("/list-admins"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("Luis (admin)"));
        assert!(reply.contains("Eva (admin)"));
    }

    #[tokio::test]
    async fn test_list_admins_platform_failure_is_a_reply() {
        let f = fixture(StubChat {
            roster_fails: true,
            ..Default::default()
        });

        let reply = f
            .dispatcher
            .dispatch(&msg("/list-admins"))
            .await
            .unwrap()
            .unwrap();
        assert!(reply.contains("didn't answer"));
    }

    #[tokio::test]
    async fn test_ranking_orders_players() {
        let f = fixture(StubChat::default());
        f.store.ensure_player(1, "Ana").unwrap();
        f.store.ensure_player(2, "Luis").unwrap();
        f.store.set_balance(2, 9_000).unwrap();

        let reply = f.dispatcher.dispatch(&msg("/ranking")).await.unwrap().unwrap();
        assert!(reply.contains("🥇 Luis — 9000 chips"));
        assert!(reply.contains("🥈 Ana — 1000 chips"));
    }
}
