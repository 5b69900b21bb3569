//! # Operation Classifier
//!
//! Maps the 4-byte function selector at the front of a call payload onto
//! an [`OperationKind`]. The table is derived once from the canonical
//! signature strings and is read-only for the process lifetime: it is
//! configuration, not state.
//!
//! ## Known limitation
//!
//! Classification is selector equality, not signature parsing. Two
//! distinct signatures whose Keccak-256 digests share a 4-byte prefix
//! would be indistinguishable. The platform's contract surface is small
//! enough that this is accepted rather than defended against.

use std::collections::HashMap;

use shared_types::Selector;

use super::entities::OperationKind;
use super::errors::RelayError;
use super::hashing::keccak256;

/// Canonical signatures of every call the platform contracts expose to
/// the relay, paired with the kind each one classifies as.
const SIGNATURES: &[(&str, OperationKind)] = &[
    ("addWallet(address)", OperationKind::WalletCreation),
    ("addOrganization(address)", OperationKind::OrganizationCreation),
    ("deposit(address,uint256)", OperationKind::Deposit),
    ("withdraw(address,uint256)", OperationKind::Withdrawal),
    (
        "approvePendingWithdrawal(address,uint256)",
        OperationKind::PendingWithdrawalApproval,
    ),
    (
        "withdrawOrganizationFunds(address,uint256)",
        OperationKind::OrganizationFundWithdrawal,
    ),
    (
        "withdrawProjectFunds(address,uint256)",
        OperationKind::ProjectFundWithdrawal,
    ),
    ("transfer(address,uint256)", OperationKind::Transfer),
    ("invest(address,uint256)", OperationKind::Investment),
    (
        "approvePendingInvestment(address,uint256)",
        OperationKind::PendingInvestmentApproval,
    ),
    (
        "cancelInvestment(address,uint256)",
        OperationKind::InvestmentCancellation,
    ),
    (
        "addOrganizationMember(address)",
        OperationKind::OrganizationMembershipAdd,
    ),
    ("addProject(address)", OperationKind::ProjectAdd),
    (
        "activateOrganization(address)",
        OperationKind::OrganizationActivation,
    ),
];

/// Selector of a canonical signature: the first 4 bytes of its
/// Keccak-256 digest.
pub fn selector_of(signature: &str) -> Selector {
    let digest = keccak256(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&digest[..4]);
    selector
}

/// The selector → kind lookup table, built once at startup.
#[derive(Debug, Clone)]
pub struct SelectorTable {
    by_selector: HashMap<Selector, OperationKind>,
}

impl SelectorTable {
    /// Build the table for the platform's standard contract surface.
    pub fn standard() -> Self {
        let by_selector = SIGNATURES
            .iter()
            .map(|(signature, kind)| (selector_of(signature), *kind))
            .collect();
        Self { by_selector }
    }

    /// Classify a selector, failing with
    /// [`RelayError::UnknownOperation`] on a miss.
    pub fn classify(&self, selector: Selector) -> Result<OperationKind, RelayError> {
        self.by_selector
            .get(&selector)
            .copied()
            .ok_or(RelayError::UnknownOperation { selector })
    }

    /// Number of registered operations.
    pub fn len(&self) -> usize {
        self.by_selector.len()
    }

    /// Whether the table is empty (never, for the standard table).
    pub fn is_empty(&self) -> bool {
        self.by_selector.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_selector_matches_known_value() {
        // The one selector with a well-known published value; anchors the
        // Keccak derivation against an external constant.
        assert_eq!(
            hex::encode(selector_of("transfer(address,uint256)")),
            "a9059cbb"
        );
    }

    #[test]
    fn test_table_registers_every_kind_once() {
        let table = SelectorTable::standard();
        assert_eq!(table.len(), SIGNATURES.len());
        assert_eq!(table.len(), 14);
    }

    #[test]
    fn test_classify_every_registered_signature() {
        let table = SelectorTable::standard();
        for (signature, kind) in SIGNATURES {
            assert_eq!(table.classify(selector_of(signature)).unwrap(), *kind);
        }
    }

    #[test]
    fn test_unknown_selector_is_rejected() {
        let table = SelectorTable::standard();
        let result = table.classify([0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(
            result,
            Err(RelayError::UnknownOperation {
                selector: [0xde, 0xad, 0xbe, 0xef]
            })
        ));
    }
}
