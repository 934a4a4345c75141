pub mod autofill;
pub mod client;
