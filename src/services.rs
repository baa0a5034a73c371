pub mod gateway;
pub mod prober;
pub mod scheduler;
pub mod sweep;
