pub mod errors;
pub mod loan_store;
pub mod report;
pub mod return_store;
pub mod user_store;

pub use errors::{LibraryError, Result};
pub use loan_store::LoanStore;
pub use report::{LoanStatistics, loan_statistics, penalty_report};
pub use return_store::ReturnStore;
pub use user_store::UserStore;
