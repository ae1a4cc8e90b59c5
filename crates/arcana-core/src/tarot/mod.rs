//! Tarot reading domain module.
//!
//! # Module Structure
//!
//! - `deck`: the 22 major arcana (`TarotCard`, `MAJOR_ARCANA`)
//! - `reading`: the issue → pool → draw flow (`TarotReading`)

mod deck;
mod reading;

pub use deck::{MAJOR_ARCANA, TarotCard};
pub use reading::{DRAW_SIZES, POOL_SIZES, ReadingIssue, ReadingStage, TarotReading};
