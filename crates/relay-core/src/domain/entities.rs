//! # Domain Entities
//!
//! The durable unit of work is the [`TransactionRecord`]: one row per
//! broadcast attempt, keyed by the transaction hash the ledger assigned.
//! Wallet-creation operations additionally produce a [`WalletRecord`],
//! whose on-ledger address is resolved lazily from the creation receipt.
//!
//! ## Lifecycle
//!
//! ```text
//!            insert_pending            mark_terminal
//!   (none) ────────────────→ Pending ────────────────→ Mined | Failed
//! ```
//!
//! Terminal states are absorbing: the store's terminal write is an
//! idempotent upsert, so the fast-path subscription and the sweeper can
//! race without coordination.

use serde::{Deserialize, Serialize};
use shared_types::{Address, TxHash, U256};

/// Every operation the relay knows how to classify.
///
/// Closed enumeration: the selector table in
/// [`super::selectors::SelectorTable`] maps each canonical contract
/// signature onto exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Registers a platform wallet contract for a user.
    WalletCreation,
    /// Registers an organization contract.
    OrganizationCreation,
    /// Moves platform funds into a wallet.
    Deposit,
    /// Moves wallet funds out to the platform.
    Withdrawal,
    /// Approves a previously queued withdrawal.
    PendingWithdrawalApproval,
    /// Pays out from an organization's fund.
    OrganizationFundWithdrawal,
    /// Pays out from a project's fund.
    ProjectFundWithdrawal,
    /// Wallet-to-wallet transfer.
    Transfer,
    /// Commits funds to a project.
    Investment,
    /// Approves a previously queued investment.
    PendingInvestmentApproval,
    /// Returns a committed investment to the investor.
    InvestmentCancellation,
    /// Adds a member wallet to an organization.
    OrganizationMembershipAdd,
    /// Registers a project under an organization.
    ProjectAdd,
    /// Flips an organization live.
    OrganizationActivation,
}

impl OperationKind {
    /// Whether the encoded call carries an `(address, uint256)` argument
    /// pair. These are the value-bearing kinds; their decoded amount is
    /// persisted on the record.
    pub fn carries_amount(&self) -> bool {
        matches!(
            self,
            Self::Deposit
                | Self::Withdrawal
                | Self::PendingWithdrawalApproval
                | Self::OrganizationFundWithdrawal
                | Self::ProjectFundWithdrawal
                | Self::Transfer
                | Self::Investment
                | Self::PendingInvestmentApproval
                | Self::InvestmentCancellation
        )
    }

    /// Canonical column value for the relational schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WalletCreation => "WALLET_CREATION",
            Self::OrganizationCreation => "ORGANIZATION_CREATION",
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::PendingWithdrawalApproval => "PENDING_WITHDRAWAL_APPROVAL",
            Self::OrganizationFundWithdrawal => "ORGANIZATION_FUND_WITHDRAWAL",
            Self::ProjectFundWithdrawal => "PROJECT_FUND_WITHDRAWAL",
            Self::Transfer => "TRANSFER",
            Self::Investment => "INVESTMENT",
            Self::PendingInvestmentApproval => "PENDING_INVESTMENT_APPROVAL",
            Self::InvestmentCancellation => "INVESTMENT_CANCELLATION",
            Self::OrganizationMembershipAdd => "ORGANIZATION_MEMBERSHIP_ADD",
            Self::ProjectAdd => "PROJECT_ADD",
            Self::OrganizationActivation => "ORGANIZATION_ACTIVATION",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a relayed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxState {
    /// Durably recorded, broadcast, awaiting a receipt.
    Pending,
    /// The ledger included the transaction and it succeeded.
    Mined,
    /// The ledger included the transaction and it reverted.
    Failed,
}

impl TxState {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Canonical column value for the relational schema.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Mined => "MINED",
            Self::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for TxState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two states a receipt can promote a record into.
///
/// A separate type rather than a `TxState` subset so the store's
/// terminal-write API cannot be handed `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminalState {
    /// Receipt reported success.
    Mined,
    /// Receipt reported revert.
    Failed,
}

impl TerminalState {
    /// Map a receipt's status flag.
    pub fn from_status(status_ok: bool) -> Self {
        if status_ok {
            Self::Mined
        } else {
            Self::Failed
        }
    }
}

impl From<TerminalState> for TxState {
    fn from(state: TerminalState) -> Self {
        match state {
            TerminalState::Mined => TxState::Mined,
            TerminalState::Failed => TxState::Failed,
        }
    }
}

/// The durable record of one relayed operation.
///
/// Identity is the ledger-assigned transaction hash. Created exactly once
/// per broadcast attempt, in `Pending`, before the broadcast call
/// returns. Mutated exactly once afterwards, to a terminal state, by
/// whichever completer (subscription or sweeper) observes the receipt
/// first. Never deleted by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Ledger transaction hash (unique, immutable once assigned).
    pub hash: TxHash,
    /// Sender recovered from the signed payload.
    pub from: Address,
    /// Target contract address.
    pub to: Address,
    /// Raw call data, selector included.
    pub input: Vec<u8>,
    /// Classified operation kind.
    pub kind: OperationKind,
    /// Lifecycle state.
    pub state: TxState,
    /// Decoded amount for value-bearing kinds.
    pub amount: Option<U256>,
    /// Epoch seconds at creation.
    pub created_at: u64,
    /// Epoch seconds of the terminal write, unset while pending.
    pub processed_at: Option<u64>,
}

impl TransactionRecord {
    /// Build a fresh pending record.
    #[allow(clippy::too_many_arguments)]
    pub fn pending(
        hash: TxHash,
        from: Address,
        to: Address,
        input: Vec<u8>,
        kind: OperationKind,
        amount: Option<U256>,
        created_at: u64,
    ) -> Self {
        Self {
            hash,
            from,
            to,
            input,
            kind,
            state: TxState::Pending,
            amount,
            created_at,
            processed_at: None,
        }
    }
}

/// Secondary record derived from a wallet-creation operation.
///
/// At most one per transaction hash. The address is a cache of an
/// immutable on-ledger fact: unresolved until the creation transaction is
/// mined, then filled from the receipt log and never changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletRecord {
    /// The wallet-creation transaction that owns this record.
    pub tx_hash: TxHash,
    /// Resolved on-ledger wallet address, if the creation has been mined
    /// and a caller has asked for it.
    pub address: Option<Address>,
    /// Set later by the onboarding flow; carried, not interpreted, here.
    pub public_key: Option<Vec<u8>>,
}

impl WalletRecord {
    /// A wallet record as created at submission time: address unknown.
    pub fn unresolved(tx_hash: TxHash) -> Self {
        Self {
            tx_hash,
            address: None,
            public_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states_are_terminal() {
        assert!(!TxState::Pending.is_terminal());
        assert!(TxState::Mined.is_terminal());
        assert!(TxState::Failed.is_terminal());
    }

    #[test]
    fn test_terminal_state_from_receipt_status() {
        assert_eq!(TerminalState::from_status(true), TerminalState::Mined);
        assert_eq!(TerminalState::from_status(false), TerminalState::Failed);
        assert_eq!(TxState::from(TerminalState::Mined), TxState::Mined);
        assert_eq!(TxState::from(TerminalState::Failed), TxState::Failed);
    }

    #[test]
    fn test_value_bearing_kinds_carry_amount() {
        assert!(OperationKind::Transfer.carries_amount());
        assert!(OperationKind::Deposit.carries_amount());
        assert!(OperationKind::InvestmentCancellation.carries_amount());
        assert!(!OperationKind::WalletCreation.carries_amount());
        assert!(!OperationKind::ProjectAdd.carries_amount());
        assert!(!OperationKind::OrganizationActivation.carries_amount());
    }

    #[test]
    fn test_pending_record_starts_pending() {
        let record = TransactionRecord::pending(
            [1u8; 32],
            [2u8; 20],
            [3u8; 20],
            vec![0xaa],
            OperationKind::Transfer,
            Some(U256::from(7u64)),
            1_700_000_000,
        );
        assert_eq!(record.state, TxState::Pending);
        assert_eq!(record.processed_at, None);
    }

    #[test]
    fn test_unresolved_wallet_has_no_address() {
        let wallet = WalletRecord::unresolved([9u8; 32]);
        assert_eq!(wallet.address, None);
        assert_eq!(wallet.public_key, None);
    }
}
