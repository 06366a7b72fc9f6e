//! # Platform Session
//!
//! Tenant-scoped HTTP session layer for the rewards platform API.
//! Every API client in the workspace goes through a [`TenantSession`],
//! which carries the base URL, the tenant identifier, and the optional
//! bearer token as explicit configuration rather than ambient state.

/// Tenant session and its configuration
mod session;
pub use session::*;

/// Error type shared by all platform API clients
mod error;
pub use error::*;
