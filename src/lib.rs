//! KeepGoing — routine tracker with an AI character generator.

pub mod character;
pub mod config;
pub mod error;
pub mod routines;
pub mod store;
