pub mod orders;
pub mod scheduling;
