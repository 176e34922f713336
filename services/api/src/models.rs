//! API models for request and response payloads

pub mod complaint;
pub mod shift;

pub use complaint::{
    Complaint, ComplaintQuery, ComplaintUpdate, CreateComplaintRequest, NewComplaint,
};
pub use shift::{
    CreateShiftRequest, DateRange, NewShift, Shift, ShiftQuery, ShiftType, UpdateShiftRequest,
};
