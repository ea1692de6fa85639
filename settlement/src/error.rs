//! Error types for settlement

use pool_ledger::PlayerId;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] pool_ledger::Error),

    /// Total debt and total credit disagree beyond tolerance
    #[error("Settlement imbalance: total debt {total_debt} != total credit {total_credit}")]
    SettlementImbalance {
        /// Sum of absolute debtor balances
        total_debt: Decimal,
        /// Sum of creditor balances
        total_credit: Decimal,
    },

    /// Rounded transfers would leave a player beyond tolerance
    #[error("Unsettled residual of {remaining} for player {player}")]
    UnsettledResidual {
        /// Player with leftover balance
        player: PlayerId,
        /// Exact balance minus the net rounded transfers (signed)
        remaining: Decimal,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<pool_ledger::ValidationError> for Error {
    fn from(err: pool_ledger::ValidationError) -> Self {
        Error::Ledger(pool_ledger::Error::Validation(err))
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}
