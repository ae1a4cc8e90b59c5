pub mod account;
pub mod bot;
pub mod chat;
pub mod history;
pub mod horoscope;
pub mod language;
pub mod points;
pub mod wallet;
