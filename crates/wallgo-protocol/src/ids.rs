use serde::{Deserialize, Serialize};

/// Player ID is a simple seat index (0 or 1 in a two-player room).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u8);

impl PlayerId {
    pub const ONE: PlayerId = PlayerId(0);
    pub const TWO: PlayerId = PlayerId(1);

    /// The other seat in a two-player game.
    #[inline]
    pub const fn opponent(self) -> PlayerId {
        PlayerId(1 - self.0)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
