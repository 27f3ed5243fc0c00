//! # Persistent Storage
//!
//! Disk-backed implementations of [`crate::space::AtomStore`].

mod redb_atoms;

pub use redb_atoms::RedbAtomSpace;
