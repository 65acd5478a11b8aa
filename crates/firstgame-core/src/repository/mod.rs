//! Repository trait definitions (ports).
//!
//! The persistence layer is an opaque keyed collection as far as the core is
//! concerned: CRUD plus find-by-filter. firstgame-infra provides the SQLite
//! implementations.

pub mod character;
pub mod equipment;
