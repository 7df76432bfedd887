//! Storage plumbing shared by the barkeep services: typed document keys,
//! the document store contract, and its postgres and in-memory backends.

pub mod documents;
pub mod keys;
pub mod memory;
pub mod persistence;
