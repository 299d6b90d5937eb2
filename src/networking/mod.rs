//! Networking module for lanwatch
//!
//! This module handles core networking functionalities including:
//! - Packet capture and the ingestion thread (`capture`)
//! - Link-layer decoding and protocol bucketing (`classify`)
//! - The shared traffic counter aggregate (`stats`)
//! - Local subnet detection and address utilities (`subnet`)
//! - TCP connect-scan host discovery (`discover`)

pub mod capture;
pub mod classify;
pub mod discover;
pub mod stats;
pub mod subnet;

pub use stats::SharedStats;
