//! The on-chain half of the ledger.
//!
//! [`ChainClient`] is the seam for a real wallet/contract SDK.  [`LocalChain`]
//! keeps its records in memory: each mint becomes one block, and the
//! transaction hash is derived from the account, the content id and a nonce.

use std::fmt;

use sha2::{Digest, Sha256};
use tracing::info;

use crate::error::{LedgerError, Result};
use crate::store::ContentId;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account(String);

impl Account {
    pub fn new(address: impl Into<String>) -> Self {
        Account(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of a successful mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash:    String,
    pub block:      u64,
    pub account:    Account,
    pub content_id: ContentId,
}

pub trait ChainClient: Send {
    /// The connected account, if a wallet is connected.
    fn account(&self) -> Option<&Account>;

    /// Record `content_id` against the connected account.
    fn mint_gesture(&mut self, content_id: &ContentId) -> Result<Receipt>;

    /// Content ids minted for `account`, oldest first.
    fn gesture_history(&self, account: &Account) -> Result<Vec<ContentId>>;
}

// ════════════════════════════════════════════════════════════════════════════
// LocalChain
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct LocalChain {
    account:  Option<Account>,
    receipts: Vec<Receipt>,
    nonce:    u64,
    paused:   bool,
}

impl LocalChain {
    pub fn connected(address: impl Into<String>) -> Self {
        LocalChain { account: Some(Account::new(address)), ..LocalChain::default() }
    }

    pub fn disconnected() -> Self {
        LocalChain::default()
    }

    /// Switch the active account (the wallet's "accounts changed" event).
    pub fn set_account(&mut self, account: Option<Account>) {
        self.account = account;
    }

    /// While paused, every mint is rejected, as a paused contract does.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }
}

impl ChainClient for LocalChain {
    fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    fn mint_gesture(&mut self, content_id: &ContentId) -> Result<Receipt> {
        let account = self.account.clone().ok_or(LedgerError::WalletUnavailable)?;
        if self.paused {
            return Err(LedgerError::Rejected("contract is paused".into()));
        }

        let mut h = Sha256::new();
        h.update(account.as_str().as_bytes());
        h.update(content_id.as_str().as_bytes());
        h.update(self.nonce.to_be_bytes());
        self.nonce += 1;

        let receipt = Receipt {
            tx_hash:    format!("0x{}", hex::encode(h.finalize())),
            block:      self.receipts.len() as u64 + 1,
            account,
            content_id: content_id.clone(),
        };
        info!(tx = %receipt.tx_hash, block = receipt.block, cid = %content_id, "minted gesture");
        self.receipts.push(receipt.clone());
        Ok(receipt)
    }

    fn gesture_history(&self, account: &Account) -> Result<Vec<ContentId>> {
        Ok(self.receipts
            .iter()
            .filter(|r| &r.account == account)
            .map(|r| r.content_id.clone())
            .collect())
    }
}
