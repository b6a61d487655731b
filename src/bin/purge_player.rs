//! Offline maintenance tool: remove one player record from the store.
//!
//! Useful when an account should no longer appear in rankings, for example
//! the bot's own account after it was accidentally greeted into the game.
//! Run it while the gateway is stopped; RocksDB allows one writer.

use clap::Parser;
use ruleta::store::CasinoStore;

#[derive(Parser, Debug)]
#[command(name = "purge-player")]
#[command(about = "Remove a player record from the casino store", long_about = None)]
struct Args {
    /// Database directory
    #[arg(long, default_value = "./DB/ruleta_data")]
    db_path: String,

    /// Player id to remove
    #[arg(long)]
    player_id: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Starting balance is irrelevant here; no records are created.
    let store = CasinoStore::open(&args.db_path, 0)?;

    match store.player(args.player_id)? {
        Some(record) => {
            let name = if record.display_name.is_empty() {
                "(no name)".to_string()
            } else {
                record.display_name.clone()
            };
            println!("🔍 Found player {}: {} with {} chips", record.id, name, record.balance);
            store.remove_player(args.player_id)?;
            println!("✅ Player {} removed", args.player_id);
        }
        None => {
            println!("❌ No player record for id {}", args.player_id);
        }
    }

    Ok(())
}
