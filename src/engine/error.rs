use thiserror::Error;

use crate::game::PileId;

/// Recoverable rejections surfaced to the host. Empty-pile reads are
/// `Option`, not errors, and nothing here is ever a panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("illegal move: {reason}")]
    IllegalMove { reason: &'static str },

    #[error("invalid index {index} into {pile:?}")]
    InvalidIndex { pile: PileId, index: usize },

    #[error("animation in progress")]
    AnimationBusy,
}

impl MoveError {
    pub fn illegal(reason: &'static str) -> Self {
        Self::IllegalMove { reason }
    }

    /// Short label for the `MoveRejected` event payload.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::IllegalMove { reason } => reason,
            Self::InvalidIndex { .. } => "invalid index",
            Self::AnimationBusy => "animation in progress",
        }
    }
}
