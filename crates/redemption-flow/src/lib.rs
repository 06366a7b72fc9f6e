//! # Redemption Flow
//!
//! Voucher redemption for the rewards platform: the linear redemption
//! wizard (denomination, confirmation, success), the rewards catalog
//! and wallet view state, and the HTTP client that submits the
//! redemption at wizard completion.

/// Catalog, wallet, and redemption wire types
mod types;
pub use types::*;

/// Redemption wizard state machine
mod wizard;
pub use wizard::*;

/// Wallet view state (vouchers, history, claim-code copy)
mod wallet;
pub use wallet::*;

/// HTTP client for the rewards endpoints
mod rewards_client;
pub use rewards_client::*;
