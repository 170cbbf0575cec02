//! A terminal host: stdin lines become chat from one player, and the session
//! is ticked at a fixed rate while chunks stream in around that player.

use anyhow::Context;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};
use tagcraft_blocks::BlockPos;
use tagcraft_core::chat::{OutgoingMessage, Recipient};
use tagcraft_core::commands::CommandSender;
use tagcraft_core::player::Player;
use tagcraft_core::{Session, SessionConfig};
use tagcraft_world::MemoryWorld;
use tracing::{debug, info, warn};

/// Loads chunks around a position a few at a time and drops the ones left
/// behind, so the world is only ever partially available.
pub struct ChunkStreamer {
    view_distance: i32,
    chunks_per_tick: usize,
}

impl ChunkStreamer {
    pub fn new(view_distance: i32, chunks_per_tick: usize) -> ChunkStreamer {
        ChunkStreamer {
            view_distance: view_distance.max(0),
            chunks_per_tick: chunks_per_tick.max(1),
        }
    }

    /// Returns the number of chunks loaded by this call.
    pub fn update(&self, world: &mut MemoryWorld, center: BlockPos) -> usize {
        let (center_x, center_z) = center.chunk_pos();
        let in_range =
            |x: i32, z: i32| (x - center_x).abs().max((z - center_z).abs()) <= self.view_distance;

        let out_of_range = world
            .loaded_chunks()
            .filter(|&(x, z)| !in_range(x, z))
            .collect::<Vec<_>>();
        for (x, z) in out_of_range {
            debug!("Unloading chunk {}, {}", x, z);
            world.unload_chunk(x, z);
        }

        let mut missing = Vec::new();
        for x in center_x - self.view_distance..=center_x + self.view_distance {
            for z in center_z - self.view_distance..=center_z + self.view_distance {
                if !world.is_chunk_loaded(x, z) {
                    missing.push((x, z));
                }
            }
        }
        missing.sort_by_key(|&(x, z)| ((x - center_x).pow(2) + (z - center_z).pow(2), x, z));

        let loaded = missing.len().min(self.chunks_per_tick);
        for &(x, z) in &missing[..loaded] {
            world.load_chunk(x, z);
        }
        loaded
    }
}

enum ConsoleInput {
    Chat(CommandSender, String),
    Move(BlockPos),
    Quit,
}

fn parse_input(player: CommandSender, line: &str) -> Option<ConsoleInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Some(ConsoleInput::Chat(player, line.to_string()));
    };

    let mut parts = rest.split_whitespace();
    match parts.next() {
        Some("quit" | "stop") => Some(ConsoleInput::Quit),
        Some("say") => Some(ConsoleInput::Chat(
            CommandSender::Console,
            parts.collect::<Vec<_>>().join(" "),
        )),
        Some("tp") => {
            let coords = parts
                .map(str::parse::<i32>)
                .collect::<Result<Vec<_>, _>>()
                .ok()?;
            match coords[..] {
                [x, y, z] => Some(ConsoleInput::Move(BlockPos::new(x, y, z))),
                _ => None,
            }
        }
        _ => None,
    }
}

fn spawn_stdin_reader() -> anyhow::Result<Receiver<String>> {
    let (tx, rx) = mpsc::channel();
    thread::Builder::new()
        .name("stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to spawn the stdin reader")?;
    Ok(rx)
}

fn print_message(message: &OutgoingMessage) {
    let target = match &message.recipient {
        Recipient::Player(name) => format!("[to {}] ", name),
        Recipient::Console => "[console] ".to_string(),
        Recipient::Everyone => String::new(),
    };
    if message.is_error {
        eprintln!("{}Error: {}", target, message.text);
    } else {
        println!("{}{}", target, message.text);
    }
}

pub fn run(config: SessionConfig, player: Player) -> anyhow::Result<()> {
    let mut session = Session::with_builtins(&config)?;
    let name = player.name.clone();
    let index = session.game.players.len();
    let sender = session.add_player(player);

    let streamer = ChunkStreamer::new(config.view_distance as i32, config.chunks_per_tick as usize);
    let lines = spawn_stdin_reader()?;
    let tick_duration = Duration::from_nanos(1_000_000_000 / config.tps.clamp(1, 1000) as u64);
    info!(
        "{} joined. Chat with {}Help to list commands, /quit to leave.",
        name, config.command_prefix
    );

    let mut next_tick = Instant::now();
    loop {
        loop {
            let line = match lines.try_recv() {
                Ok(line) => line,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => return Ok(()),
            };
            match parse_input(sender, &line) {
                Some(ConsoleInput::Chat(sender, message)) => {
                    session.handle_chat(sender, message);
                }
                Some(ConsoleInput::Move(pos)) => {
                    session.game.players[index].pos = pos;
                    info!("{} moved to {}", name, pos);
                }
                Some(ConsoleInput::Quit) => return Ok(()),
                None => warn!("Unrecognized input: {}", line),
            }
        }

        let pos = session.game.players[index].pos;
        streamer.update(&mut session.game.world, pos);
        session.tick();
        for message in session.drain_messages() {
            print_message(&message);
        }

        next_tick += tick_duration;
        let now = Instant::now();
        if next_tick > now {
            thread::sleep(next_tick - now);
        } else {
            next_tick = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streamer_loads_gradually_and_unloads_far_chunks() {
        let mut world = MemoryWorld::new(-64, 384, 64);
        let streamer = ChunkStreamer::new(1, 2);
        let origin = BlockPos::new(0, 65, 0);

        assert_eq!(streamer.update(&mut world, origin), 2);
        assert!(world.is_chunk_loaded(0, 0));
        let mut total = 2;
        while total < 9 {
            total += streamer.update(&mut world, origin);
        }
        assert_eq!(streamer.update(&mut world, origin), 0);
        assert_eq!(world.loaded_chunks().count(), 9);

        streamer.update(&mut world, BlockPos::new(160, 65, 0));
        assert!(!world.is_chunk_loaded(0, 0));
        assert_eq!(world.loaded_chunks().count(), 2);
    }

    #[test]
    fn console_input() {
        let player = CommandSender::Player(0);
        assert!(matches!(
            parse_input(player, ".bb 9"),
            Some(ConsoleInput::Chat(CommandSender::Player(0), line)) if line == ".bb 9"
        ));
        assert!(matches!(
            parse_input(player, "/tp 1 -2 3"),
            Some(ConsoleInput::Move(pos)) if pos == BlockPos::new(1, -2, 3)
        ));
        assert!(matches!(
            parse_input(player, "/say .gta"),
            Some(ConsoleInput::Chat(CommandSender::Console, _))
        ));
        assert!(matches!(parse_input(player, "/quit"), Some(ConsoleInput::Quit)));
        assert!(parse_input(player, "/tp 1 2").is_none());
        assert!(parse_input(player, "   ").is_none());
    }
}
