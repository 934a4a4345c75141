pub mod dispatch;
pub mod lookup;
pub mod record;
pub mod sinks;
