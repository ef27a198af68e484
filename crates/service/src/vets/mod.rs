//! Vets façade. Reads go through the fallback policy and may be served from
//! the bundled dataset in [`bundled`].

pub mod bundled;
pub mod repository;
pub mod service;

pub use service::VetService;
