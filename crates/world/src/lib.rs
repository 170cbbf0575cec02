pub mod storage;

use tagcraft_blocks::{Block, BlockPos};
use thiserror::Error;

pub use storage::{Chunk, MemoryWorld};

/// A block read from the world at a known position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRef {
    pub pos: BlockPos,
    pub block: Block,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    #[error("chunk containing {0} is not loaded")]
    ChunkNotLoaded(BlockPos),
    #[error("{0} is outside the build height")]
    OutOfBounds(BlockPos),
    #[error("the world refused to set {block} at {pos}")]
    Rejected { pos: BlockPos, block: Block },
}

/// Block access the gameplay scripts are given by the host.
///
/// Lookups return `None` when the position is in a chunk that is not
/// currently resident. Callers are expected to treat that as "try again
/// later", never as an error.
pub trait World {
    /// Returns the highest solid block in the `x`, `z` column.
    /// Returns None if the column is unloaded or holds no solid block.
    fn topmost_block(&self, x: i32, z: i32) -> Option<BlockRef>;

    /// Returns the block located at `pos`.
    fn block(&self, pos: BlockPos) -> Option<BlockRef>;

    /// Sets the block at `pos`.
    fn set_block(&mut self, pos: BlockPos, block: Block) -> Result<(), WorldError>;
}
