//! Business logic and repository trait definitions for firstgame.
//!
//! This crate defines the "ports" (repository, hashing and token traits) that
//! the infrastructure layer implements, plus the engines built on them:
//! permission authority, equipment ledger, progression and account
//! registration. It depends only on `firstgame-types` -- never on
//! `firstgame-infra` or any database/IO crate.

pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;
