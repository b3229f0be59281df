pub mod commands;
pub mod dates;
pub mod dedup;
pub mod errors;
pub mod loan;
pub mod loan_return;
pub mod user;
pub mod value_objects;

pub use commands::*;
pub use errors::*;
pub use loan::{Loan, LoanFingerprint};
pub use loan_return::{LoanReturn, ReturnFingerprint, compute_penalty, penalties_by_user};
pub use user::User;
pub use value_objects::*;
