// File: intermission-common/src/traits/mod.rs
pub mod generative_traits;

pub use generative_traits::{GenerativeBackend, ImageResult, DEFAULT_IMAGE_SIZE};
