//! The tag area: a square border of blocks painted into the world a little at
//! a time.
//!
//! Chunks load asynchronously on the host, so a border can rarely be placed in
//! one go. Building and resetting are therefore split into passes. Every pass
//! handles whatever columns are loaded right now and leaves the rest for the
//! next one, which the builder schedules on a fixed interval until nothing is
//! left. Passes are idempotent: a column whose border block is already there
//! is confirmed without writing to the world again.

pub mod perimeter;
mod state;

pub use state::{AreaBuildState, AreaSnapshot, AreaState};

use crate::scheduler::{Task, TickScheduler};
use tagcraft_blocks::{Block, BlockPos};
use tagcraft_world::{World, WorldError};
use thiserror::Error;
use tracing::{debug, info, trace};

pub const DEFAULT_RETRY_INTERVAL: u32 = 20;
pub const DEFAULT_MAX_SCAN_ATTEMPTS: u32 = 100;
pub const DEFAULT_MAX_SIDE_LENGTH: u32 = 512;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AreaError {
    #[error("The side length must be greater than 2 and at most {max}, got {side_length}.")]
    InvalidSideLength { side_length: i32, max: u32 },
    #[error("A tag area around {0} would not fit in the world.")]
    OutOfBounds(BlockPos),
    #[error("The tag area is not in a state that can be {action}. Current state: {state}.")]
    InvalidState {
        action: &'static str,
        state: AreaState,
    },
    #[error("Updating the block at {pos} failed: {source}")]
    BlockUpdate {
        pos: BlockPos,
        #[source]
        source: WorldError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaSettings {
    pub border: Block,
    /// Block types the border may overwrite while building.
    pub replaceable: Vec<Block>,
    pub retry_interval: u32,
    /// How far above the topmost block of a column a pass looks for room.
    pub max_scan_attempts: u32,
    pub max_side_length: u32,
}

impl Default for AreaSettings {
    fn default() -> Self {
        Self {
            border: Block::BorderBlock,
            replaceable: vec![Block::Air],
            retry_interval: DEFAULT_RETRY_INTERVAL,
            max_scan_attempts: DEFAULT_MAX_SCAN_ATTEMPTS,
            max_side_length: DEFAULT_MAX_SIDE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// There was nothing to do in the current state.
    Idle,
    InProgress { state: AreaState, remaining: usize },
    /// The pass finished the phase; `state` is the state it moved to.
    Complete { state: AreaState },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReplaceResult {
    Unloaded,
    NoMatch,
    AlreadySet,
    Replaced,
}

#[derive(Debug, Default)]
pub struct AreaBuilder {
    settings: AreaSettings,
    area: AreaBuildState,
}

impl AreaBuilder {
    pub fn new(settings: AreaSettings) -> Self {
        Self {
            settings,
            area: AreaBuildState::default(),
        }
    }

    pub fn settings(&self) -> &AreaSettings {
        &self.settings
    }

    pub fn state(&self) -> AreaState {
        self.area.state
    }

    pub fn build_state(&self) -> &AreaBuildState {
        &self.area
    }

    pub fn snapshot(&self) -> AreaSnapshot {
        AreaSnapshot::from(&self.area)
    }

    /// Starts building a border around `center`. The first pass runs on the next tick.
    pub fn build(
        &mut self,
        center: BlockPos,
        side_length: i32,
        scheduler: &mut TickScheduler,
    ) -> Result<(), AreaError> {
        let max = self.settings.max_side_length;
        if side_length <= 2 || side_length as i64 > max as i64 {
            return Err(AreaError::InvalidSideLength { side_length, max });
        }
        if self.area.state != AreaState::None {
            return Err(AreaError::InvalidState {
                action: "built",
                state: self.area.state,
            });
        }
        let fits = |c: i32| c.checked_sub(side_length).is_some() && c.checked_add(side_length).is_some();
        if !fits(center.x) || !fits(center.z) {
            return Err(AreaError::OutOfBounds(center));
        }

        let side_length = side_length as u32;
        self.area.center = Some(center);
        self.area.side_length = Some(side_length);
        self.area.pending = perimeter::perimeter(center, side_length).into_iter().collect();
        self.area.committed.clear();
        self.area.state = AreaState::Building;
        info!(
            "Building tag area of side {} around {} ({} columns)",
            side_length,
            center,
            self.area.pending.len()
        );

        scheduler.run_once(Task::TagAreaPass);
        Ok(())
    }

    /// Starts removing the border. Columns that were never built are forgotten.
    pub fn reset(&mut self, scheduler: &mut TickScheduler) -> Result<(), AreaError> {
        if self.area.state == AreaState::None {
            return Err(AreaError::InvalidState {
                action: "reset",
                state: self.area.state,
            });
        }

        self.cancel_retry(scheduler);
        self.area.state = AreaState::Resetting;
        self.area.pending.clear();
        info!(
            "Resetting tag area ({} border blocks)",
            self.area.committed.len()
        );

        scheduler.run_once(Task::TagAreaPass);
        Ok(())
    }

    /// Runs one best-effort pass for the current phase.
    ///
    /// Whenever the phase is left unfinished, including when the pass fails,
    /// a retry interval is kept scheduled. It is cancelled once the phase
    /// completes.
    pub fn run_pass(
        &mut self,
        world: &mut dyn World,
        scheduler: &mut TickScheduler,
    ) -> Result<PassOutcome, AreaError> {
        let result = match self.area.state {
            AreaState::Building => self.build_pass(world),
            AreaState::Resetting => self.reset_pass(world),
            AreaState::None | AreaState::Built => return Ok(PassOutcome::Idle),
        };

        match result {
            Ok(true) => {
                self.cancel_retry(scheduler);
                match self.area.state {
                    AreaState::Building => self.area.state = AreaState::Built,
                    _ => self.area.clear(),
                }
                info!("Tag area is now {}", self.area.state);
                Ok(PassOutcome::Complete {
                    state: self.area.state,
                })
            }
            Ok(false) => {
                self.ensure_retry(scheduler);
                let remaining = match self.area.state {
                    AreaState::Building => self.area.pending.len(),
                    _ => self.area.committed.len(),
                };
                debug!(
                    "Tag area pass left {} blocks ({})",
                    remaining, self.area.state
                );
                Ok(PassOutcome::InProgress {
                    state: self.area.state,
                    remaining,
                })
            }
            Err(err) => {
                self.ensure_retry(scheduler);
                Err(err)
            }
        }
    }

    /// Returns true once every pending column holds a border block.
    fn build_pass(&mut self, world: &mut dyn World) -> Result<bool, AreaError> {
        for index in (0..self.area.pending.len()).rev() {
            let column = self.area.pending[index];
            if let Some(placed) = self.place_border(world, column)? {
                self.area.pending.shift_remove_index(index);
                self.area.committed.insert(placed);
            }
        }
        Ok(self.area.pending.is_empty())
    }

    /// Returns true once every committed border block is gone.
    fn reset_pass(&mut self, world: &mut dyn World) -> Result<bool, AreaError> {
        for index in (0..self.area.committed.len()).rev() {
            let pos = self.area.committed[index];
            match replace_block(world, pos, Block::Air, &[self.settings.border])? {
                ReplaceResult::Unloaded => continue,
                ReplaceResult::NoMatch => {
                    trace!("{} holds neither air nor a border block", pos);
                    continue;
                }
                ReplaceResult::AlreadySet | ReplaceResult::Replaced => {}
            }
            self.area.committed.shift_remove_index(index);
        }
        Ok(self.area.committed.is_empty())
    }

    /// Finds the first block at or above the top of the column that either
    /// already is a border block or may be replaced by one.
    fn place_border(
        &self,
        world: &mut dyn World,
        column: BlockPos,
    ) -> Result<Option<BlockPos>, AreaError> {
        let Some(top) = world.topmost_block(column.x, column.z) else {
            trace!("Column {}, {} is not loaded", column.x, column.z);
            return Ok(None);
        };

        for offset in 0..=self.settings.max_scan_attempts {
            let pos = top.pos.up(offset as i32);
            match replace_block(world, pos, self.settings.border, &self.settings.replaceable)? {
                ReplaceResult::Unloaded => return Ok(None),
                ReplaceResult::NoMatch => continue,
                ReplaceResult::AlreadySet | ReplaceResult::Replaced => return Ok(Some(pos)),
            }
        }

        debug!("No room for a border block above {}", top.pos);
        Ok(None)
    }

    fn ensure_retry(&mut self, scheduler: &mut TickScheduler) {
        if self.area.retry.is_none() {
            let handle = scheduler.run_at_interval(Task::TagAreaPass, self.settings.retry_interval);
            trace!("Scheduled tag area retry {}", handle);
            self.area.retry = Some(handle);
        }
    }

    fn cancel_retry(&mut self, scheduler: &mut TickScheduler) {
        if let Some(handle) = self.area.retry.take() {
            scheduler.cancel(handle);
            trace!("Cancelled tag area retry {}", handle);
        }
    }
}

fn replace_block(
    world: &mut dyn World,
    pos: BlockPos,
    to: Block,
    from: &[Block],
) -> Result<ReplaceResult, AreaError> {
    let Some(current) = world.block(pos) else {
        return Ok(ReplaceResult::Unloaded);
    };

    if current.block == to {
        trace!("{} is already {}", pos, to);
        Ok(ReplaceResult::AlreadySet)
    } else if from.contains(&current.block) {
        trace!("Setting {} from {} to {}", pos, current.block, to);
        world
            .set_block(pos, to)
            .map_err(|source| AreaError::BlockUpdate { pos, source })?;
        Ok(ReplaceResult::Replaced)
    } else {
        Ok(ReplaceResult::NoMatch)
    }
}
