// Booking dialogue steps, in the order a renter goes through them
pub mod start_date;
pub mod end_date;
pub mod select_box;
pub mod renter_name;
pub mod renter_phone;

// Shared modules
pub mod types;

// Re-export task implementations
pub use start_date::StartDateTask;
pub use end_date::EndDateTask;
pub use select_box::SelectBoxTask;
pub use renter_name::RenterNameTask;
pub use renter_phone::RenterPhoneTask;

pub use types::{BookingDraft, BookingSession, BookingStep, current_step};
