//! Sales transactor: expand products through their bill of materials and
//! apply the deductions as one validate-then-commit batch.

pub mod transactor;

pub use transactor::{
    MaterialDeduction, SaleLine, SaleLineFailure, SalesError, SalesReceipt, SalesRejection,
    SalesTransactor,
};
