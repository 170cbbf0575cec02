use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(PartialEq, Eq, Copy, Clone, Debug, Serialize, Deserialize, Hash, PartialOrd, Ord)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> BlockPos {
        BlockPos { x, y, z }
    }

    pub fn zero() -> BlockPos {
        BlockPos::new(0, 0, 0)
    }

    pub fn up(self, amount: i32) -> BlockPos {
        BlockPos::new(self.x, self.y + amount, self.z)
    }

    /// Returns the coordinates of the chunk containing this position.
    pub fn chunk_pos(self) -> (i32, i32) {
        (self.x >> 4, self.z >> 4)
    }

    /// Largest horizontal distance on either axis, ignoring height.
    pub fn horizontal_chebyshev(self, other: BlockPos) -> i32 {
        std::cmp::max((self.x - other.x).abs(), (self.z - other.z).abs())
    }
}

impl std::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

macro_rules! blocks {
    (
        $( $name:ident => $id:literal, solid: $solid:literal ),* $(,)?
    ) => {
        /// The block types the scripts read and write, keyed by their namespaced type id.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Block {
            $( $name, )*
        }

        impl Block {
            pub fn type_id(self) -> &'static str {
                match self {
                    $( Block::$name => $id, )*
                }
            }

            /// Solid blocks are the ones a topmost-block query can land on.
            pub fn is_solid(self) -> bool {
                match self {
                    $( Block::$name => $solid, )*
                }
            }

            pub fn values() -> &'static [Block] {
                &[ $( Block::$name, )* ]
            }
        }

        impl FromStr for Block {
            type Err = UnknownBlockType;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $id => Ok(Block::$name), )*
                    _ => Err(UnknownBlockType(s.to_string())),
                }
            }
        }
    };
}

blocks! {
    Air => "minecraft:air", solid: false,
    Stone => "minecraft:stone", solid: true,
    Dirt => "minecraft:dirt", solid: true,
    GrassBlock => "minecraft:grass_block", solid: true,
    Bedrock => "minecraft:bedrock", solid: true,
    OakLeaves => "minecraft:oak_leaves", solid: true,
    BorderBlock => "minecraft:border_block", solid: true,
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.type_id())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown block type id: {0}")]
pub struct UnknownBlockType(pub String);

#[test]
fn block_type_ids_round_trip() {
    for block in Block::values() {
        assert_eq!(block.type_id().parse::<Block>(), Ok(*block));
    }
    assert!("minecraft:lava".parse::<Block>().is_err());
}

#[test]
fn chunk_pos_floors_negative_coordinates() {
    assert_eq!(BlockPos::new(-1, 0, 15).chunk_pos(), (-1, 0));
    assert_eq!(BlockPos::new(16, 0, -17).chunk_pos(), (1, -2));
}
