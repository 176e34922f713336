//! Business logic behind the API routes

pub mod complaint;
pub mod shift;

pub use complaint::ComplaintTracker;
pub use shift::ShiftScheduler;
