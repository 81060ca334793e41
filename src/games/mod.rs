//! Reference game definitions built on the engine.

pub mod garden;
