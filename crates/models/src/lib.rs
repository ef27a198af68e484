//! Entity shapes shared by the service façades and the HTTP layer.
//!
//! `cat` and `vet` are public (UI-facing) shapes normalised from the document
//! store; `profile` additionally carries the SeaORM entity for the relational
//! `profiles` table.

pub mod errors;
pub mod db;
pub mod cat;
pub mod vet;
pub mod profile;
