pub mod customers;
pub mod pool;
