#![doc(test(attr(deny(warnings))))]

//! Booking Core drives the multi-step wizard used to book maintenance
//! appointments for a company's vehicles, from client data to payment.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod dealership;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod storage;
pub mod utils;
pub mod wizard;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Booking Core tracing initialized.");
    });
}
