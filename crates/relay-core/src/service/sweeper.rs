//! # Reconciliation Sweeper
//!
//! The guaranteed confirmation path. On a fixed interval it re-queries
//! the ledger for every record still pending and promotes each one whose
//! receipt has landed. The fast-path subscription may or may not have
//! fired first; both writers go through the store's idempotent terminal
//! upsert, so the race needs no coordination.
//!
//! Sweeps are independent per record: receipt queries run concurrently
//! under a semaphore cap, and one record's failure is logged and left
//! for the next tick without touching the rest of the batch. A record
//! with no receipt stays pending indefinitely; the per-tick report is
//! what surfaces that to operators. Nothing here is ever fatal to the
//! process.

use std::sync::Arc;

use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use shared_types::to_hex;

use crate::config::SweeperConfig;
use crate::domain::{TerminalState, TransactionRecord, TxState};
use crate::ports::{LedgerClient, TimeSource, TransactionStore};

/// Outcome counters for one sweep tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Pending records examined.
    pub checked: usize,
    /// Promoted to `Mined` this tick.
    pub mined: usize,
    /// Promoted to `Failed` this tick.
    pub failed: usize,
    /// No receipt yet; left for the next tick.
    pub still_pending: usize,
    /// Query or persist faults; left for the next tick.
    pub errors: usize,
}

/// What one record's sweep produced.
enum SweepOutcome {
    Promoted(TerminalState),
    StillPending,
    Errored,
}

/// Periodic reconciliation loop over the pending set.
pub struct ReconciliationSweeper {
    store: Arc<dyn TransactionStore>,
    ledger: Arc<dyn LedgerClient>,
    clock: Arc<dyn TimeSource>,
    config: SweeperConfig,
}

impl ReconciliationSweeper {
    /// Wire the sweeper from its collaborators.
    pub fn new(
        store: Arc<dyn TransactionStore>,
        ledger: Arc<dyn LedgerClient>,
        clock: Arc<dyn TimeSource>,
        config: SweeperConfig,
    ) -> Self {
        Self {
            store,
            ledger,
            clock,
            config,
        }
    }

    /// Spawn the sweep loop. It ticks until `shutdown` observes `true`,
    /// then drains the in-flight tick and exits.
    pub fn spawn(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let period = std::time::Duration::from_secs(self.config.interval_secs);
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            info!(interval_secs = self.config.interval_secs, "reconciliation sweeper started");

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let report = self.sweep_once().await;
                        if report.mined + report.failed + report.errors > 0 {
                            info!(
                                checked = report.checked,
                                mined = report.mined,
                                failed = report.failed,
                                still_pending = report.still_pending,
                                errors = report.errors,
                                "sweep tick complete"
                            );
                        } else {
                            debug!(checked = report.checked, "sweep tick complete; nothing to promote");
                        }
                    }
                    changed = shutdown.changed() => {
                        // A closed channel means the owner is gone; stop too.
                        if changed.is_err() || *shutdown.borrow() {
                            info!("reconciliation sweeper stopping");
                            break;
                        }
                    }
                }
            }
        })
    }

    /// One full pass over the pending set.
    pub async fn sweep_once(&self) -> SweepReport {
        let pending = match self.store.pending().await {
            Ok(pending) => pending,
            Err(error) => {
                warn!(%error, "sweep could not list pending records");
                return SweepReport {
                    errors: 1,
                    ..SweepReport::default()
                };
            }
        };

        let mut report = SweepReport {
            checked: pending.len(),
            ..SweepReport::default()
        };
        if pending.is_empty() {
            return report;
        }

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent));
        let mut tasks = JoinSet::new();
        for record in pending {
            let semaphore = Arc::clone(&semaphore);
            let store = Arc::clone(&self.store);
            let ledger = Arc::clone(&self.ledger);
            let clock = Arc::clone(&self.clock);
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return SweepOutcome::Errored;
                };
                sweep_record(&*store, &*ledger, &*clock, &record).await
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(SweepOutcome::Promoted(TerminalState::Mined)) => report.mined += 1,
                Ok(SweepOutcome::Promoted(TerminalState::Failed)) => report.failed += 1,
                Ok(SweepOutcome::StillPending) => report.still_pending += 1,
                Ok(SweepOutcome::Errored) => report.errors += 1,
                Err(error) => {
                    warn!(%error, "sweep task panicked");
                    report.errors += 1;
                }
            }
        }
        report
    }
}

/// Reconcile a single record against the ledger.
async fn sweep_record(
    store: &dyn TransactionStore,
    ledger: &dyn LedgerClient,
    clock: &dyn TimeSource,
    record: &TransactionRecord,
) -> SweepOutcome {
    match ledger.get_transaction_receipt(record.hash).await {
        Ok(Some(receipt)) => {
            let state = TerminalState::from_status(receipt.status_ok);
            match store.mark_terminal(&record.hash, state, clock.now()).await {
                Ok(_) => {
                    debug!(
                        tx_hash = %to_hex(&record.hash),
                        state = %TxState::from(state),
                        "sweeper reconciled transaction"
                    );
                    SweepOutcome::Promoted(state)
                }
                Err(error) => {
                    warn!(tx_hash = %to_hex(&record.hash), %error, "sweeper could not persist terminal state");
                    SweepOutcome::Errored
                }
            }
        }
        Ok(None) => SweepOutcome::StillPending,
        Err(error) => {
            warn!(tx_hash = %to_hex(&record.hash), %error, "receipt query failed; record left for next tick");
            SweepOutcome::Errored
        }
    }
}
