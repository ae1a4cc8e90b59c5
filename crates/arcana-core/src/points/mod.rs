//! Coins and daily check-in.

mod model;

pub use model::{CheckInRecord, CheckInStatus, PointsBackend};
