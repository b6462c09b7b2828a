//! Core engine for a family of single-player card games (Klondike, Spider,
//! FreeCell, Pyramid and the Thirty-One token game).
//!
//! The crate owns the deck/pile data model, per-variant move legality, win
//! evaluation, the tick-driven animation scheduler and the auto-finish
//! driver. Rendering, input routing, asset loading and audio playback are
//! collaborator concerns: they feed [`engine::intents::Intent`] values into a
//! [`engine::session::GameSession`] and consume the
//! [`engine::events::GameEvent`] stream it produces.

pub mod engine;
pub mod game;
