//! Horoscope domain module.

mod model;

pub use model::{HoroscopeBackend, HoroscopeQuery, Period, ZodiacSign};
