//! Business logic services (use cases).
//!
//! Services orchestrate repository calls and business rules. They depend on
//! traits (ports) -- never on concrete infrastructure implementations.

pub mod authority;
pub mod character;
pub mod hash;
pub mod ledger;
pub mod lock;
pub mod progression;
pub mod token;
