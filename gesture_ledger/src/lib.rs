//! # gesture_ledger
//!
//! Persist recognised gestures as an external record: the gesture's metadata
//! is uploaded to a content-addressed store, then the resulting content id is
//! minted against the active account on a chain.
//!
//! * [`ContentStore`]: off-chain storage ([`MemoryContentStore`],
//!   [`DirContentStore`]).
//! * [`ChainClient`]: the account and mint call ([`LocalChain`]).
//! * [`LedgerAdapter`]: ties the two together.
//! * [`LedgerWorker`]: runs an adapter on its own thread so the frame loop
//!   only ever hands records over a channel.
//!
//! ```rust
//! use gesture_ledger::{GestureRecord, LedgerAdapter, LocalChain, MemoryContentStore};
//! use pose_gesture::Gesture;
//!
//! let mut ledger = LedgerAdapter::new(
//!     MemoryContentStore::default(),
//!     LocalChain::connected("0xabc"),
//! );
//! ledger.initialize().unwrap();
//! let receipt = ledger.save_gesture(&GestureRecord::new(Gesture::Squat, 1.0)).unwrap();
//! assert_eq!(ledger.gesture_history().unwrap(), vec![receipt.content_id]);
//! ```

pub mod adapter;
pub mod chain;
pub mod error;
pub mod metadata;
pub mod store;
pub mod worker;

pub use adapter::LedgerAdapter;
pub use chain::{Account, ChainClient, LocalChain, Receipt};
pub use error::{LedgerError, Result};
pub use metadata::{GestureMetadata, GestureRecord};
pub use store::{ContentId, ContentStore, DirContentStore, MemoryContentStore};
pub use worker::{LedgerOutcome, LedgerWorker};
