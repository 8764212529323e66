//! Integration tests for hue-rs crates.
//!
//! End-to-end runs of the colorizer: model acquisition from a local source,
//! PNG I/O and the two-pass reconstruction, with a stand-in engine.
