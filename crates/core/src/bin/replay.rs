//! Replay the games in a PGN file, ply by ply

use pgn_replay_core::{parse_file, Game};

fn main() {
    // Logs go to stderr so `--json` output stays clean.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let json = match args.iter().position(|a| a == "--json") {
        Some(i) => {
            args.remove(i);
            true
        }
        None => false,
    };

    let path = args.first().cloned().unwrap_or_else(|| {
        eprintln!("Usage: replay <pgn_file> [game_index] [--json]");
        std::process::exit(1);
    });
    let index = match args.get(1).map(|s| s.parse::<usize>()) {
        None => 0,
        Some(Ok(index)) => index,
        Some(Err(_)) => {
            eprintln!("game_index must be a non-negative number");
            std::process::exit(1);
        }
    };

    let games = match parse_file(&path, |game: Game| game) {
        Ok(games) => games,
        Err(e) => {
            eprintln!("Failed to parse {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let Some(game) = games.get(index) else {
        eprintln!("No game #{} (file has {})", index, games.len());
        std::process::exit(1);
    };

    if json {
        match serde_json::to_string_pretty(game) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Failed to serialize game: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    println!("Parsed {} games from {}", games.len(), path);
    println!("Game #{}: {} ({} plies)\n", index, game.summary(), game.ply_count());

    for (key, value) in game.metadata().iter() {
        println!("[{} \"{}\"]", key, value);
    }
    match game.winner() {
        Some(player) => println!("\nWinner: {}\n", player),
        None => println!("\nDrawn\n"),
    }
    for (ply, board) in game.board_states().iter().enumerate() {
        println!("Ply {}", ply + 1);
        println!("{}", board);
    }
}
