use rustc_hash::FxHashSet;
use tagcraft_blocks::BlockPos;

pub struct Player {
    pub name: String,
    pub pos: BlockPos,
    tags: FxHashSet<String>,
}

impl Player {
    pub fn new(name: impl Into<String>, pos: BlockPos) -> Self {
        Self {
            name: name.into(),
            pos,
            tags: FxHashSet::default(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Permissions are plain tags on the player.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.tags.contains(permission)
    }
}
