//! Ruleta - Group-Chat Roulette Casino Bot
//!
//! Players bet play-money chips on roulette outcomes; a per-chat timer draws
//! a pocket, settles the open round, and announces the winners. The chat
//! network itself stays behind an HTTP/WebSocket gateway so any platform
//! connector can drive the game.

pub mod commands;
pub mod config;
pub mod errors;
pub mod game;
pub mod gateway;
pub mod platform;
pub mod scheduler;
pub mod store;
pub mod texts;
