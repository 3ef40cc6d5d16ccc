//! AI character generation: persona text, avatar image, deterministic greeting.

pub mod generator;
pub mod hangul;
pub mod openai;
pub mod routes;

pub use generator::{CharacterGenerator, CharacterProfile};
pub use routes::{CharacterState, character_routes};
