//! Presentation-layer adapters. Currently only the HTML email bodies.

pub mod email;
