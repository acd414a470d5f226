//! Incrementally push files modified by unpushed git commits to S3
//!
//! A marker ref (`refs/heads/s3-pushed`) records the last commit whose
//! changes were fully uploaded; each run walks the commit graph from HEAD
//! back to that marker, resolves the deduplicated set of changed paths,
//! uploads them, and advances the marker.

pub mod config;
pub mod filter;
pub mod git;
pub mod mime;
pub mod push;
pub mod s3;
