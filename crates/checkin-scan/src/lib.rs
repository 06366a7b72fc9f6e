//! # Check-In Scan
//!
//! Scan-and-redeem check-in flow for event gifting: a camera-driven
//! scan loop that decodes badge payloads, submits them to the scanner
//! verification endpoint, and keeps the live inventory view in sync
//! with server truth after every scan.

/// Wire types and scan outcomes
mod scan_types;
pub use scan_types::*;

/// Frame capture and payload decoding seams
mod capture;
pub use capture::*;

/// HTTP client for the scanner endpoints
mod scanner_client;
pub use scanner_client::*;

/// Scan loop controller and session state
mod controller;
pub use controller::*;
