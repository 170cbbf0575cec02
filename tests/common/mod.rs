#![allow(dead_code)]

use rustc_hash::{FxHashMap, FxHashSet};
use tagcraft_blocks::{Block, BlockPos};
use tagcraft_core::chat::OutgoingMessage;
use tagcraft_core::commands::CommandSender;
use tagcraft_core::player::Player;
use tagcraft_core::{Session, SessionConfig};
use tagcraft_world::{BlockRef, World, WorldError};

/// Flat grass at `ground` everywhere, with columns that can be hidden on demand.
pub struct TestWorld {
    ground: i32,
    blocks: FxHashMap<BlockPos, Block>,
    unloaded_columns: FxHashSet<(i32, i32)>,
    everything_unloaded: bool,
    reject_writes: bool,
    writes: usize,
}

impl TestWorld {
    pub fn new(ground: i32) -> TestWorld {
        TestWorld {
            ground,
            blocks: FxHashMap::default(),
            unloaded_columns: FxHashSet::default(),
            everything_unloaded: false,
            reject_writes: false,
            writes: 0,
        }
    }

    pub fn set_all_unloaded(&mut self, unloaded: bool) {
        self.everything_unloaded = unloaded;
    }

    pub fn unload_column(&mut self, x: i32, z: i32) {
        self.unloaded_columns.insert((x, z));
    }

    pub fn load_column(&mut self, x: i32, z: i32) {
        self.unloaded_columns.remove(&(x, z));
    }

    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    /// Places a block without counting it as a write.
    pub fn place(&mut self, pos: BlockPos, block: Block) {
        self.blocks.insert(pos, block);
    }

    pub fn write_count(&self) -> usize {
        self.writes
    }

    pub fn block_at(&self, pos: BlockPos) -> Block {
        match self.blocks.get(&pos) {
            Some(block) => *block,
            None if pos.y < self.ground => Block::Dirt,
            None if pos.y == self.ground => Block::GrassBlock,
            None => Block::Air,
        }
    }

    fn is_loaded(&self, x: i32, z: i32) -> bool {
        !self.everything_unloaded && !self.unloaded_columns.contains(&(x, z))
    }
}

impl World for TestWorld {
    fn topmost_block(&self, x: i32, z: i32) -> Option<BlockRef> {
        if !self.is_loaded(x, z) {
            return None;
        }
        let placed = self
            .blocks
            .iter()
            .filter(|(pos, block)| pos.x == x && pos.z == z && block.is_solid())
            .map(|(pos, _)| pos.y)
            .max();
        let y = placed.map_or(self.ground, |y| y.max(self.ground));
        let pos = BlockPos::new(x, y, z);
        Some(BlockRef {
            pos,
            block: self.block_at(pos),
        })
    }

    fn block(&self, pos: BlockPos) -> Option<BlockRef> {
        if !self.is_loaded(pos.x, pos.z) {
            return None;
        }
        Some(BlockRef {
            pos,
            block: self.block_at(pos),
        })
    }

    fn set_block(&mut self, pos: BlockPos, block: Block) -> Result<(), WorldError> {
        if !self.is_loaded(pos.x, pos.z) {
            return Err(WorldError::ChunkNotLoaded(pos));
        }
        if self.reject_writes {
            return Err(WorldError::Rejected { pos, block });
        }
        self.writes += 1;
        self.blocks.insert(pos, block);
        Ok(())
    }
}

pub const ADMIN_TAG: &str = "tagAdmin";

/// A session with the builtin commands, an admin and a guest standing at the origin.
pub struct Harness {
    pub session: Session,
    pub admin: CommandSender,
    pub guest: CommandSender,
}

impl Harness {
    pub fn new() -> Harness {
        Harness::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Harness {
        let mut session = Session::with_builtins(&config).unwrap();
        let admin = session
            .add_player(Player::new("Admin", BlockPos::new(0, 65, 0)).with_tags([ADMIN_TAG]));
        let guest = session.add_player(Player::new("Guest", BlockPos::new(0, 65, 0)));
        Harness {
            session,
            admin,
            guest,
        }
    }

    pub fn load_chunks_around_origin(&mut self, radius: i32) {
        for x in -radius..=radius {
            for z in -radius..=radius {
                self.session.game.world.load_chunk(x, z);
            }
        }
    }

    /// Sends a chat line and returns what came out of it.
    pub fn chat(&mut self, sender: CommandSender, line: &str) -> Vec<OutgoingMessage> {
        self.session.handle_chat(sender, line);
        self.session.drain_messages()
    }

    pub fn ticks(&mut self, count: usize) -> Vec<OutgoingMessage> {
        for _ in 0..count {
            self.session.tick();
        }
        self.session.drain_messages()
    }
}

pub fn texts(messages: &[OutgoingMessage]) -> Vec<&str> {
    messages.iter().map(|message| message.text.as_str()).collect()
}

pub fn pos(x: i32, y: i32, z: i32) -> BlockPos {
    BlockPos::new(x, y, z)
}
