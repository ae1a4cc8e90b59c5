//! Wallet domain module.
//!
//! The remote backend owns the balance. [`BalanceLedger`] mirrors it locally
//! for display and is the only path through which spends and recharges are
//! applied.

mod backend;
mod ledger;
mod model;

pub use backend::{PaymentGateway, WalletBackend};
pub use ledger::BalanceLedger;
pub use model::{
    Balance, DebitReceipt, PaymentConfirmation, PaymentIntent, PaymentMethod, PaymentRedirect,
    PaymentStatus, RechargeEntry,
};
