//! Application layer: the payout ledger and the notification dispatcher it
//! triggers. The ledger is the only component that mutates the recipient and
//! transfer collections.

pub mod dispatcher;
pub mod ledger;
