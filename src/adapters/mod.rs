pub mod csv;
pub mod mock;
