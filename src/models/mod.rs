//! Game model and its persistence adapter.

pub mod best_score;
pub mod game;
