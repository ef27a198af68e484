//! Data-access core for the adoption site.
//! - `backend` builds and caches one handle per hosted backend.
//! - `cats`, `vets`, `profiles` are per-entity façades over repository traits.
//! - `fallback` and `adapters` hold the pure policy and shape transforms.
//! - `contact`, `sitemap`, `geodata` cover the remaining integrations.

pub mod errors;
pub mod backend;
pub mod adapters;
pub mod fallback;
pub mod cats;
pub mod vets;
pub mod profiles;
pub mod contact;
pub mod sitemap;
pub mod geodata;
