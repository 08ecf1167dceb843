//! Инфраструктурный слой вокруг движка:
//! - RNG-реализации для движка.

pub mod rng;

pub use rng::*;
