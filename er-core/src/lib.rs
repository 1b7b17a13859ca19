#![deny(
    clippy::nursery,
    clippy::pedantic,
    missing_docs,
)]
//! Shared plumbing for the evacuation router crates.

pub mod logging;
