use crate::{BlockRef, World, WorldError};
use rustc_hash::{FxHashMap, FxHashSet};
use tagcraft_blocks::{Block, BlockPos};
use tracing::trace;

const CHUNK_WIDTH: usize = 16;

/// A 16x16 column of blocks spanning the whole build height.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub x: i32,
    pub z: i32,
    height: usize,
    blocks: Vec<Block>,
}

impl Chunk {
    pub fn empty(x: i32, z: i32, height: usize) -> Chunk {
        Chunk {
            x,
            z,
            height,
            blocks: vec![Block::Air; CHUNK_WIDTH * CHUNK_WIDTH * height],
        }
    }

    /// Bedrock floor, stone, three layers of dirt and grass at `ground` (relative to the chunk floor).
    pub fn flat(x: i32, z: i32, height: usize, ground: usize) -> Chunk {
        let mut chunk = Chunk::empty(x, z, height);
        let ground = ground.min(height.saturating_sub(1));
        for bx in 0..CHUNK_WIDTH as u32 {
            for bz in 0..CHUNK_WIDTH as u32 {
                for y in 0..=ground as u32 {
                    let block = match ground as u32 - y {
                        _ if y == 0 => Block::Bedrock,
                        0 => Block::GrassBlock,
                        1..=3 => Block::Dirt,
                        _ => Block::Stone,
                    };
                    chunk.set_block(bx, y, bz, block);
                }
            }
        }
        chunk
    }

    fn index(x: u32, y: u32, z: u32) -> usize {
        (y as usize * CHUNK_WIDTH + z as usize) * CHUNK_WIDTH + x as usize
    }

    pub fn get_block(&self, x: u32, y: u32, z: u32) -> Block {
        if y as usize >= self.height {
            return Block::Air;
        }
        self.blocks[Self::index(x, y, z)]
    }

    /// Sets a block in storage. Returns true if a block was changed.
    pub fn set_block(&mut self, x: u32, y: u32, z: u32, block: Block) -> bool {
        if y as usize >= self.height {
            return false;
        }
        let slot = &mut self.blocks[Self::index(x, y, z)];
        let changed = *slot != block;
        *slot = block;
        changed
    }

    /// Returns the height of the highest solid block in the column, if any.
    pub fn top_solid(&self, x: u32, z: u32) -> Option<u32> {
        (0..self.height as u32)
            .rev()
            .find(|&y| self.get_block(x, y, z).is_solid())
    }
}

/// An in-memory world made of chunks that can be loaded and unloaded at will.
///
/// Unloaded chunks keep their contents; they are only invisible to lookups
/// until loaded again.
pub struct MemoryWorld {
    min_y: i32,
    height: usize,
    ground: usize,
    chunks: FxHashMap<(i32, i32), Chunk>,
    loaded: FxHashSet<(i32, i32)>,
    writes: u64,
    #[cfg(feature = "testing")]
    rejected: FxHashSet<BlockPos>,
}

impl MemoryWorld {
    pub fn new(min_y: i32, height: usize, ground_height: i32) -> MemoryWorld {
        let ground = (ground_height - min_y).max(0) as usize;
        MemoryWorld {
            min_y,
            height,
            ground,
            chunks: FxHashMap::default(),
            loaded: FxHashSet::default(),
            writes: 0,
            #[cfg(feature = "testing")]
            rejected: FxHashSet::default(),
        }
    }

    /// Makes the chunk visible, generating flat terrain the first time it is loaded.
    pub fn load_chunk(&mut self, x: i32, z: i32) {
        let (height, ground) = (self.height, self.ground);
        self.chunks.entry((x, z)).or_insert_with(|| {
            trace!("generating chunk {}, {}", x, z);
            Chunk::flat(x, z, height, ground)
        });
        self.loaded.insert((x, z));
    }

    pub fn unload_chunk(&mut self, x: i32, z: i32) -> bool {
        self.loaded.remove(&(x, z))
    }

    pub fn is_chunk_loaded(&self, x: i32, z: i32) -> bool {
        self.loaded.contains(&(x, z))
    }

    pub fn loaded_chunks(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.loaded.iter().copied()
    }

    /// Number of block writes that actually changed a block.
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    /// Makes every later write to `pos` fail with [`WorldError::Rejected`].
    #[cfg(feature = "testing")]
    pub fn reject_writes_at(&mut self, pos: BlockPos) {
        self.rejected.insert(pos);
    }

    #[cfg(feature = "testing")]
    pub fn accept_all_writes(&mut self) {
        self.rejected.clear();
    }

    fn loaded_chunk(&self, x: i32, z: i32) -> Option<&Chunk> {
        let key = (x >> 4, z >> 4);
        if !self.loaded.contains(&key) {
            return None;
        }
        self.chunks.get(&key)
    }

    fn local_y(&self, y: i32) -> Option<u32> {
        let local = y - self.min_y;
        if local < 0 || local as usize >= self.height {
            return None;
        }
        Some(local as u32)
    }
}

impl World for MemoryWorld {
    fn topmost_block(&self, x: i32, z: i32) -> Option<BlockRef> {
        let chunk = self.loaded_chunk(x, z)?;
        let y = chunk.top_solid((x & 0xF) as u32, (z & 0xF) as u32)?;
        let pos = BlockPos::new(x, y as i32 + self.min_y, z);
        Some(BlockRef {
            pos,
            block: chunk.get_block((x & 0xF) as u32, y, (z & 0xF) as u32),
        })
    }

    fn block(&self, pos: BlockPos) -> Option<BlockRef> {
        let chunk = self.loaded_chunk(pos.x, pos.z)?;
        let y = self.local_y(pos.y)?;
        Some(BlockRef {
            pos,
            block: chunk.get_block((pos.x & 0xF) as u32, y, (pos.z & 0xF) as u32),
        })
    }

    fn set_block(&mut self, pos: BlockPos, block: Block) -> Result<(), WorldError> {
        #[cfg(feature = "testing")]
        if self.rejected.contains(&pos) {
            return Err(WorldError::Rejected { pos, block });
        }

        let y = self.local_y(pos.y).ok_or(WorldError::OutOfBounds(pos))?;
        let key = pos.chunk_pos();
        if !self.loaded.contains(&key) {
            return Err(WorldError::ChunkNotLoaded(pos));
        }
        let chunk = self
            .chunks
            .get_mut(&key)
            .ok_or(WorldError::ChunkNotLoaded(pos))?;
        if chunk.set_block((pos.x & 0xF) as u32, y, (pos.z & 0xF) as u32, block) {
            self.writes += 1;
        }
        Ok(())
    }
}
