//! Mockup Framer
//!
//! Composites artwork onto scene templates: mat and frame borders,
//! aspect-preserving shrink-to-fit placement, and multi-size export crops.
//! The engine works on in-memory rasters; decoding, storage and HTTP live
//! at the edges.

pub mod config;
pub mod domain;
pub mod engine;
pub mod storage;
