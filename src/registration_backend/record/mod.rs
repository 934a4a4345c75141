pub mod builder;
pub mod capture;
pub mod types;
