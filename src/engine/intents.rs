use crate::game::{
    DrawMode, FreecellCardCountMode, GameMode, PileId, SpiderSuitMode,
};

/// Inbound command surface. Hosts translate input gestures into intents;
/// the session answers with events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Deal a fresh game. `None` asks the session to pick a random seed.
    NewGame { seed: Option<u64> },
    /// Re-deal the current seed without consuming a new one.
    RestartGame,
    /// Prime an explicit seed and deal it.
    Shuffle { seed: u64 },
    DrawStock,
    SelectCard { pile: PileId, index: usize },
    /// Move `src[start..]` to `dst`. A `Foundation` destination routes by
    /// the card's suit; the requested foundation index is advisory.
    MoveCards { src: PileId, start: usize, dst: PileId },
    /// Act on the current selection: auto-move to a foundation when legal,
    /// otherwise clear it.
    ActivateSelection,
    /// Knock in Thirty-One, giving every other player one last turn.
    Knock,
    /// Declare an instant-win Thirty-One hand, ending the round.
    LayDown,
    /// Deal the next Thirty-One round after a showdown; tokens carry over.
    NextRound,
    AutoFinish,
    CancelAnimation,
    SetDrawMode(DrawMode),
    SetGameMode(GameMode),
}

/// Per-variant deal options, fixed at session construction and on
/// `SetGameMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeConfig {
    pub draw_mode: DrawMode,
    pub spider_suits: SpiderSuitMode,
    pub freecell_cards: FreecellCardCountMode,
    pub thirty_one_players: usize,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            draw_mode: DrawMode::One,
            spider_suits: SpiderSuitMode::One,
            freecell_cards: FreecellCardCountMode::FiftyTwo,
            thirty_one_players: 4,
        }
    }
}
