//! Upload-then-mint.

use chrono::Utc;
use tracing::info;

use crate::chain::{ChainClient, Receipt};
use crate::error::{LedgerError, Result};
use crate::metadata::{GestureMetadata, GestureRecord};
use crate::store::{ContentId, ContentStore};

pub struct LedgerAdapter<S, C> {
    store:       S,
    chain:       C,
    initialized: bool,
}

impl<S: ContentStore, C: ChainClient> LedgerAdapter<S, C> {
    pub fn new(store: S, chain: C) -> Self {
        LedgerAdapter { store, chain, initialized: false }
    }

    /// Fails with [`LedgerError::WalletUnavailable`] when no account is
    /// connected; writes are refused until this succeeds.
    pub fn initialize(&mut self) -> Result<()> {
        let account = self.chain.account().ok_or(LedgerError::WalletUnavailable)?;
        info!(%account, "ledger initialized");
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Upload `{gesture, timestamp, score}` and mint its content id.
    pub fn save_gesture(&mut self, record: &GestureRecord) -> Result<Receipt> {
        if !self.initialized {
            return Err(LedgerError::NotInitialized);
        }
        let metadata = GestureMetadata::from_record(record, Utc::now());
        let bytes    = serde_json::to_vec(&metadata)?;
        let cid      = self.store.put(&bytes)?;
        self.chain.mint_gesture(&cid)
    }

    /// Content ids minted for the connected account.
    pub fn gesture_history(&self) -> Result<Vec<ContentId>> {
        if !self.initialized {
            return Err(LedgerError::NotInitialized);
        }
        let account = self.chain.account().ok_or(LedgerError::WalletUnavailable)?;
        self.chain.gesture_history(account)
    }

    /// Fetch and decode a stored metadata document.
    pub fn metadata(&self, id: &ContentId) -> Result<Option<GestureMetadata>> {
        match self.store.get(id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None        => Ok(None),
        }
    }

    pub fn store(&self) -> &S { &self.store }
    pub fn chain(&self) -> &C { &self.chain }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::LocalChain;
    use crate::store::MemoryContentStore;
    use pose_gesture::Gesture;

    fn adapter(chain: LocalChain) -> LedgerAdapter<MemoryContentStore, LocalChain> {
        LedgerAdapter::new(MemoryContentStore::default(), chain)
    }

    #[test]
    fn initialize_without_wallet_fails() {
        let mut l = adapter(LocalChain::disconnected());
        assert!(matches!(l.initialize(), Err(LedgerError::WalletUnavailable)));
        assert!(!l.is_initialized());
    }

    #[test]
    fn save_before_initialize_fails() {
        let mut l = adapter(LocalChain::connected("0xabc"));
        let err = l.save_gesture(&GestureRecord::new(Gesture::Squat, 1.0)).unwrap_err();
        assert!(matches!(err, LedgerError::NotInitialized));
        assert!(l.store().is_empty());
    }

    #[test]
    fn save_uploads_then_mints() {
        let mut l = adapter(LocalChain::connected("0xabc"));
        l.initialize().unwrap();
        let r = l.save_gesture(&GestureRecord::new(Gesture::TPose, 0.9)).unwrap();

        assert_eq!(r.account.as_str(), "0xabc");
        assert_eq!(l.chain().receipts().len(), 1);
        let md = l.metadata(&r.content_id).unwrap().unwrap();
        assert_eq!(md.gesture, "t_pose");
        assert_eq!(md.score, 0.9);
        assert!(md.timestamp > 0);
        assert_eq!(l.gesture_history().unwrap(), vec![r.content_id]);
    }
}
