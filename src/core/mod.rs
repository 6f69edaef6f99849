//! Pure building blocks of a batch: option resolution and rendering of the
//! solver's configuration header. Consumed by the high-level `api` module.
pub mod artifact;
pub mod params;
pub mod resolve;
