use crate::scheduler::TaskHandle;
use indexmap::IndexSet;
use serde::Serialize;
use std::fmt;
use tagcraft_blocks::BlockPos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AreaState {
    #[default]
    None,
    Building,
    Built,
    Resetting,
}

impl fmt::Display for AreaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AreaState::None => "NONE",
            AreaState::Building => "BUILDING",
            AreaState::Built => "BUILT",
            AreaState::Resetting => "RESETTING",
        })
    }
}

/// Mutable state of one bordered area.
#[derive(Debug, Default)]
pub struct AreaBuildState {
    pub(super) side_length: Option<u32>,
    pub(super) center: Option<BlockPos>,
    pub(super) state: AreaState,
    /// Columns whose border block is not confirmed yet.
    pub(super) pending: IndexSet<BlockPos>,
    /// Border blocks confirmed in the world; reset walks these.
    pub(super) committed: IndexSet<BlockPos>,
    pub(super) retry: Option<TaskHandle>,
}

impl AreaBuildState {
    pub(super) fn clear(&mut self) {
        self.side_length = None;
        self.center = None;
        self.state = AreaState::None;
        self.pending.clear();
        self.committed.clear();
    }

    pub fn pending(&self) -> impl ExactSizeIterator<Item = &BlockPos> {
        self.pending.iter()
    }

    pub fn committed(&self) -> impl ExactSizeIterator<Item = &BlockPos> {
        self.committed.iter()
    }
}

/// Bounded debug view of an area: coordinate sets are reported as counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaSnapshot {
    pub state: AreaState,
    pub side_length: Option<u32>,
    pub center: Option<BlockPos>,
    pub pending_count: usize,
    pub committed_count: usize,
    pub retry_scheduled: bool,
}

impl From<&AreaBuildState> for AreaSnapshot {
    fn from(state: &AreaBuildState) -> Self {
        AreaSnapshot {
            state: state.state,
            side_length: state.side_length,
            center: state.center,
            pending_count: state.pending.len(),
            committed_count: state.committed.len(),
            retry_scheduled: state.retry.is_some(),
        }
    }
}

impl fmt::Display for AreaSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(self) {
            Ok(json) => f.write_str(&json),
            Err(_) => Err(fmt::Error),
        }
    }
}
