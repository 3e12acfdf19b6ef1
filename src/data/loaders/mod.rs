// mod.rs - Input file loaders

pub mod pairs;

pub use pairs::{load_pairs, parse_pairs};
