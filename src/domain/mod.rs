//! Domain layer: payout entities, derivation rules, and the ports the
//! application layer talks through.

pub mod invoice;
pub mod ports;
pub mod recipient;
pub mod reference;
pub mod transfer;
