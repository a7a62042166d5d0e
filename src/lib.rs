//! AssetScope - Terminal UI unused-asset finder for visual novel projects
//!
//! This crate scans a project's images directory and its script directory,
//! extracts every image reference from the script text, and reports the
//! images no script mentions. Deletion is a separate, explicit step that
//! only ever touches indexed files.

pub mod apply;
pub mod config;
pub mod export;
pub mod extract;
pub mod index;
pub mod normalize;
pub mod report;
pub mod resolve;
pub mod ui;
