//! Restock transactor: validate-then-commit batches of material additions.

pub mod transactor;

pub use transactor::{
    BatchRejection, LineFailure, RestockError, RestockLine, RestockOutcome, RestockReceipt,
    RestockTransactor, RestockedLine,
};
