use serde::{Deserialize, Serialize};

/// Veterinary clinic as shown to visitors.
///
/// `legacy_id` is set only on records that came from the bundled dataset; it
/// keeps that dataset's numeric identity while `id` follows the string shape
/// used by the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VetClinic {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<i64>,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: Option<String>,
    pub map_url: String,
    pub hours: String,
    pub district: String,
    pub rating: f64,
    pub review_count: u32,
    pub services: Vec<String>,
}
