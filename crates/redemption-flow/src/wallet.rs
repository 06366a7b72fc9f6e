use crate::types::{Transaction, Voucher};

/// Tab selection in the wallet view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletTab {
    /// Voucher cards with claim codes
    Vouchers,
    /// Point ledger
    History,
}

/// Local view state for the wallet screen.
///
/// Balance, vouchers, and transactions come from the platform; tab
/// selection and the transient copied-claim-code marker are purely
/// local UI state.
#[derive(Debug, Clone)]
pub struct WalletView {
    /// Available point balance
    pub balance: i64,
    /// Vouchers held by the user
    pub vouchers: Vec<Voucher>,
    /// Ledger entries
    pub transactions: Vec<Transaction>,
    /// Currently selected tab
    pub active_tab: WalletTab,
    /// Voucher whose claim code was just copied, if any
    pub copied_voucher: Option<String>,
}

impl WalletView {
    /// Empty wallet, vouchers tab selected.
    pub fn new(balance: i64) -> Self {
        Self {
            balance,
            vouchers: Vec::new(),
            transactions: Vec::new(),
            active_tab: WalletTab::Vouchers,
            copied_voucher: None,
        }
    }

    /// Switch tabs.
    pub fn select_tab(&mut self, tab: WalletTab) {
        self.active_tab = tab;
    }

    /// Mark a voucher's claim code as copied and return the code, or
    /// `None` for an unknown voucher. The clipboard itself is an
    /// external collaborator of the caller.
    pub fn copy_claim_code(&mut self, voucher_id: &str) -> Option<&str> {
        let voucher = self.vouchers.iter().find(|v| v.id == voucher_id)?;
        self.copied_voucher = Some(voucher.id.clone());
        Some(voucher.claim_code.as_str())
    }

    /// Clear the copied marker after the display window.
    pub fn clear_copied(&mut self) {
        self.copied_voucher = None;
    }
}
