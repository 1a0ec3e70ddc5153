pub mod calendar;
pub mod core;
pub mod modal;
pub mod records;
pub mod session;
