//! Leaderboard contract between the game and the hosted document store.

pub use entry::*;
pub use error::*;
#[cfg(test)]
pub use memory::*;
pub use store::*;

pub mod auth;
mod entry;
mod error;
pub mod firestore;
#[cfg(test)]
mod memory;
mod store;
