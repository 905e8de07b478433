//! Domain types for the delay registry.
//!
//! Values in this module are validated on construction, so code that
//! receives them can trust their invariants.

mod error;
mod registry;
mod report;
mod section;
mod service_type;
mod time;

pub use error::DomainError;
pub use registry::Registry;
pub use report::{DelayMinutes, DelayReport, DepartureStatus};
pub use section::{InvalidSection, Section};
pub use service_type::{InvalidServiceType, ServiceType};
pub use time::{ClockTime, TimeError};
