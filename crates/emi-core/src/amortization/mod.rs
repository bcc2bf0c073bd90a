pub mod engine;
pub mod schedule;

pub use engine::{compute, AmortizationResult};
pub use schedule::{generate_schedule, AmortizationEntry};
