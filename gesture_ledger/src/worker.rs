//! Background ledger thread.
//!
//! Records are submitted over a channel and written one at a time.  The first
//! failed write disables the worker: later records are dropped, so a broken
//! wallet costs one warning rather than one per frame.

use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::adapter::LedgerAdapter;
use crate::chain::{ChainClient, Receipt};
use crate::metadata::GestureRecord;
use crate::store::ContentStore;

enum LedgerCommand {
    Save(GestureRecord),
    Quit,
}

/// Reported back for every record the worker attempted.
#[derive(Debug, Clone)]
pub enum LedgerOutcome {
    Minted(Receipt),
    /// The write failed; the worker is now disabled.
    Failed { gesture: String, error: String },
}

/// Handle to the ledger thread.
pub struct LedgerWorker {
    cmd_tx:     Sender<LedgerCommand>,
    outcome_rx: Receiver<LedgerOutcome>,
}

impl LedgerWorker {
    /// Move `adapter` onto its own thread.
    pub fn spawn<S, C>(adapter: LedgerAdapter<S, C>) -> Self
    where
        S: ContentStore + 'static,
        C: ChainClient + 'static,
    {
        let (cmd_tx, cmd_rx)         = mpsc::channel::<LedgerCommand>();
        let (outcome_tx, outcome_rx) = mpsc::channel::<LedgerOutcome>();

        thread::spawn(move || ledger_thread(adapter, cmd_rx, outcome_tx));

        LedgerWorker { cmd_tx, outcome_rx }
    }

    /// Hand a record to the thread without waiting.  False once the thread
    /// has gone away.
    pub fn submit(&self, record: GestureRecord) -> bool {
        self.cmd_tx.send(LedgerCommand::Save(record)).is_ok()
    }

    pub fn quit(&self) {
        let _ = self.cmd_tx.send(LedgerCommand::Quit);
    }

    /// Drain any pending outcomes (non-blocking).
    pub fn drain_outcomes(&self) -> Vec<LedgerOutcome> {
        self.outcome_rx.try_iter().collect()
    }

    /// Block up to `timeout` for the next outcome.
    pub fn wait_outcome(&self, timeout: Duration) -> Option<LedgerOutcome> {
        self.outcome_rx.recv_timeout(timeout).ok()
    }
}

impl Drop for LedgerWorker {
    fn drop(&mut self) {
        self.quit();
    }
}

fn ledger_thread<S, C>(
    mut adapter: LedgerAdapter<S, C>,
    cmd_rx:      Receiver<LedgerCommand>,
    outcome_tx:  Sender<LedgerOutcome>,
) where
    S: ContentStore,
    C: ChainClient,
{
    let mut disabled = false;

    for cmd in cmd_rx {
        let record = match cmd {
            LedgerCommand::Save(r) => r,
            LedgerCommand::Quit    => break,
        };
        if disabled {
            debug!(gesture = %record.name, "ledger disabled; record dropped");
            continue;
        }

        let outcome = match adapter.save_gesture(&record) {
            Ok(receipt) => LedgerOutcome::Minted(receipt),
            Err(e) => {
                warn!(gesture = %record.name, error = %e, "ledger write failed; disabling ledger");
                disabled = true;
                LedgerOutcome::Failed { gesture: record.name, error: e.to_string() }
            }
        };
        if outcome_tx.send(outcome).is_err() {
            break;
        }
    }
    info!("ledger thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::LocalChain;
    use crate::store::MemoryContentStore;
    use pose_gesture::Gesture;

    const WAIT: Duration = Duration::from_secs(2);

    #[test]
    fn minted_outcomes_come_back() {
        let mut adapter = LedgerAdapter::new(MemoryContentStore::default(), LocalChain::connected("0x1"));
        adapter.initialize().unwrap();
        let w = LedgerWorker::spawn(adapter);

        assert!(w.submit(GestureRecord::new(Gesture::Squat, 1.0)));
        assert!(w.submit(GestureRecord::new(Gesture::Wave, 1.0)));
        let blocks: Vec<u64> = (0..2)
            .map(|_| match w.wait_outcome(WAIT) {
                Some(LedgerOutcome::Minted(r)) => r.block,
                other => panic!("unexpected outcome {:?}", other),
            })
            .collect();
        assert_eq!(blocks, vec![1, 2]);
    }

    #[test]
    fn first_failure_disables_worker() {
        let mut chain = LocalChain::connected("0x1");
        chain.set_paused(true);
        let mut adapter = LedgerAdapter::new(MemoryContentStore::default(), chain);
        adapter.initialize().unwrap();
        let w = LedgerWorker::spawn(adapter);

        w.submit(GestureRecord::new(Gesture::TPose, 1.0));
        w.submit(GestureRecord::new(Gesture::TPose, 1.0));
        match w.wait_outcome(WAIT) {
            Some(LedgerOutcome::Failed { gesture, error }) => {
                assert_eq!(gesture, "t_pose");
                assert!(error.contains("paused"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(w.wait_outcome(Duration::from_millis(200)).is_none());
    }

    #[test]
    fn uninitialized_adapter_fails_once() {
        let adapter = LedgerAdapter::new(MemoryContentStore::default(), LocalChain::connected("0x1"));
        let w = LedgerWorker::spawn(adapter);
        w.submit(GestureRecord::new(Gesture::Squat, 1.0));
        assert!(matches!(w.wait_outcome(WAIT), Some(LedgerOutcome::Failed { .. })));
    }
}
