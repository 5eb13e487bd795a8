use cosmwasm_std::StdError;
use cw_ownable::OwnershipError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    OwnershipError(#[from] OwnershipError),

    #[error("{0}")]
    PaymentError(#[from] cw_utils::PaymentError),

    #[error("Invalid swap request: {reason}")]
    InvalidRequest { reason: String },

    #[error("No exchange rate published for {denom}")]
    PriceUnavailable { denom: String },

    #[error("Swap amount is out of range: {details}")]
    Overflow { details: String },

    #[error("Ledger call failed: {reason}")]
    LedgerFault { reason: String },

    #[error("Invalid market params: {details}")]
    InvalidParams { details: String },

    #[error("Unknown reply id: {id}")]
    UnknownReplyId { id: u64 },

    #[error("Semver parsing error: {0}")]
    SemVer(String),

    #[error("Can't migrate from {storage_contract_name} to {contract_name}")]
    MigrationError {
        storage_contract_name: String,
        contract_name: String,
    },
}

impl ContractError {
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    pub fn overflow(details: impl ToString) -> Self {
        Self::Overflow {
            details: details.to_string(),
        }
    }
}

impl From<semver::Error> for ContractError {
    fn from(err: semver::Error) -> Self {
        Self::SemVer(err.to_string())
    }
}

pub type ContractResult<T> = Result<T, ContractError>;
