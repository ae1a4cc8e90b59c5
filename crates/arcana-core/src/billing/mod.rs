//! Session billing gate.
//!
//! # Module Structure
//!
//! - `policy`: budget and pricing constants (`BillingPolicy`)
//! - `gate`: the Free/Active/Expired state machine (`BillingGate`)

mod gate;
mod policy;

pub use gate::{BillingGate, GateState, GateTransition};
pub use policy::BillingPolicy;
