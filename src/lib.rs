//! Mood Chain: mood-driven scene selection for branching story games.
//!
//! Tracks the player's mood across a fixed number of turns, moves the story
//! to a new theme through a mood → theme transition table, and offers
//! literary quotes from distinct works as the player's choices. A pluggable
//! narrator bridges each choice into the next scene of a growing transcript.

pub mod core;
pub mod schema;
pub mod story;
