//! Profiles façade over the relational store and the avatar bucket.

pub mod repository;
pub mod service;

pub use service::{AssetUpload, ProfileService};
