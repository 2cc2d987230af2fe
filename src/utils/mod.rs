//! Utility modules for the fixed header

pub mod single_flight;

pub use single_flight::SingleFlight;
