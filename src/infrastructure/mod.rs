//! Adapters for external infrastructure: storage backends, the mail
//! transport, and the platform balance probe.

pub mod in_memory;
pub mod json_file;
pub mod kv_rest;
pub mod resend;
pub mod stripe;
