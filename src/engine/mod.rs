pub mod animation;
pub mod auto_finish;
pub mod boundary;
pub mod celebration;
pub mod error;
pub mod events;
pub mod intents;
pub mod layout;
pub mod rules;
pub mod scheduler;
pub mod session;
pub mod variant;
pub mod variant_engine;
pub mod variant_state;

#[cfg(test)]
mod tests;

pub use error::MoveError;
pub use events::{EventSink, GameEvent, QueueSink, SoundCue};
pub use intents::{Intent, ModeConfig};
pub use session::GameSession;
