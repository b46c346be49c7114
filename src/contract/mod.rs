mod case;
mod error;
mod suite;

pub use case::{ContractCase, CredentialPolicy, SignalHeader};
pub use error::{AssertionFailure, ContractError, TransportError, error_chain_fmt};
pub use suite::{CaseOutcome, CaseReport, ContractTestSuite, SuiteReport};
