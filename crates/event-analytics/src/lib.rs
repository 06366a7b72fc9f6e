//! # Event Analytics
//!
//! Analytics export action for event dashboards: requests a CSV report
//! from the platform and hands back the bytes with the
//! server-suggested filename. A failed export produces an error and no
//! file.

/// Export request/response handling
mod export;
pub use export::*;
