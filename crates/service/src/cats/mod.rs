//! Cats façade: repository over the `cats` collection and a read-only service.

pub mod repository;
pub mod service;

pub use service::CatService;
