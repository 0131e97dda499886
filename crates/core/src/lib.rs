//! Domain logic for the Vizier data-exploration backend.
//!
//! Pure, synchronous building blocks shared by the API server and its
//! collaborator crates: widget configuration types, row path resolution,
//! placeholder template parsing, and the hydration engine that turns a dry
//! widget config plus query rows into a renderer-ready wet config.
//!
//! Nothing in this crate performs I/O or depends on an async runtime.

pub mod error;
pub mod hydration;
pub mod path;
pub mod template;
pub mod widget;
