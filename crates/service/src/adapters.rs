//! Pure transforms between backend-shaped records and UI-shaped records.

use indexmap::IndexMap;
use models::cat::{Cat, CatStatus, Gender};
use models::vet::VetClinic;
use serde::Serialize;

use crate::backend::document::{DocValue, Document};
use crate::backend::BackendError;

pub const PLACEHOLDER_IMAGE: &str = "/images/cat-placeholder.png";

/// Human-readable age from whole months.
///
/// # Examples
/// ```
/// use service::adapters::format_age;
/// assert_eq!(format_age(1), "1 Month");
/// assert_eq!(format_age(24), "2 Years");
/// assert_eq!(format_age(25), "2 Yr 1 Mo");
/// ```
pub fn format_age(months: u32) -> String {
    if months < 12 {
        return format!("{} {}", months, if months == 1 { "Month" } else { "Months" });
    }
    let years = months / 12;
    let rest = months % 12;
    if rest == 0 {
        format!("{} {}", years, if years == 1 { "Year" } else { "Years" })
    } else {
        format!("{} Yr {} Mo", years, rest)
    }
}

/// Truthy attribute names in stored order, camel case split into words.
pub fn format_attributes<V: Truthy>(attributes: &IndexMap<String, V>) -> Vec<String> {
    attributes
        .iter()
        .filter(|(_, v)| v.truthy())
        .map(|(k, _)| split_compound(k))
        .collect()
}

/// `isVaccinated` -> `is Vaccinated`; a space goes before every ASCII
/// uppercase letter and the result is trimmed.
pub fn split_compound(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out.trim().to_string()
}

pub fn primary_image(images: &[String]) -> &str {
    images.first().map(String::as_str).unwrap_or(PLACEHOLDER_IMAGE)
}

pub trait Truthy {
    fn truthy(&self) -> bool;
}

impl Truthy for bool {
    fn truthy(&self) -> bool {
        *self
    }
}

impl Truthy for DocValue {
    fn truthy(&self) -> bool {
        self.is_truthy()
    }
}

/// Listing card for a cat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatSummary {
    pub id: String,
    pub name: String,
    pub age: String,
    pub gender: Gender,
    pub breed: Option<String>,
    pub location: String,
    pub image: String,
    pub traits: Vec<String>,
    pub status: CatStatus,
}

impl From<&Cat> for CatSummary {
    fn from(cat: &Cat) -> Self {
        CatSummary {
            id: cat.id.clone(),
            name: cat.name.clone(),
            age: format_age(cat.age_months),
            gender: cat.gender,
            breed: cat.breed.clone(),
            location: cat.location.clone(),
            image: primary_image(&cat.images).to_string(),
            traits: format_attributes(&cat.attributes),
            status: cat.status.clone(),
        }
    }
}

struct Fields<'a> {
    doc: &'a Document,
}

impl<'a> Fields<'a> {
    fn missing(&self, field: &str) -> BackendError {
        BackendError::Decode(format!("document {} lacks field {}", self.doc.id(), field))
    }

    fn req_str(&self, field: &str) -> Result<String, BackendError> {
        self.opt_str(field).ok_or_else(|| self.missing(field))
    }

    fn opt_str(&self, field: &str) -> Option<String> {
        self.doc
            .get(field)
            .and_then(DocValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn str_or_empty(&self, field: &str) -> String {
        self.opt_str(field).unwrap_or_default()
    }

    fn strings(&self, field: &str) -> Vec<String> {
        self.doc
            .get(field)
            .and_then(DocValue::as_array)
            .map(|vs| vs.iter().filter_map(DocValue::as_str).map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn count(&self, field: &str) -> Option<u32> {
        self.doc
            .get(field)
            .and_then(DocValue::as_i64)
            .map(|n| n.clamp(0, u32::MAX as i64) as u32)
    }

    fn number(&self, field: &str) -> Option<f64> {
        self.doc.get(field).and_then(DocValue::as_f64)
    }
}

/// `cats` document -> [`Cat`]. `createdAt` falls back to the document's
/// creation time.
pub fn cat_from_document(doc: &Document) -> Result<Cat, BackendError> {
    let f = Fields { doc };
    let gender = f
        .req_str("gender")?
        .parse::<Gender>()
        .map_err(|e| BackendError::Decode(e.to_string()))?;
    let status = CatStatus::from(f.req_str("status")?);
    let attributes = doc
        .get("attributes")
        .and_then(DocValue::as_map)
        .map(|m| m.iter().map(|(k, v)| (k.clone(), v.is_truthy())).collect())
        .unwrap_or_default();

    Ok(Cat {
        id: doc.id().to_string(),
        name: f.req_str("name")?,
        age_months: f.count("age").ok_or_else(|| f.missing("age"))?,
        gender,
        breed: f.opt_str("breed"),
        location: f.str_or_empty("location"),
        images: f.strings("images"),
        description: f.str_or_empty("description"),
        attributes,
        status,
        created_at: doc.get("createdAt").and_then(DocValue::as_timestamp).or(doc.create_time),
    })
}

/// `vets` document -> [`VetClinic`]; only `name` is required.
pub fn vet_from_document(doc: &Document) -> Result<VetClinic, BackendError> {
    let f = Fields { doc };
    Ok(VetClinic {
        id: doc.id().to_string(),
        legacy_id: None,
        name: f.req_str("name")?,
        address: f.str_or_empty("address"),
        phone: f.str_or_empty("phone"),
        website: f.opt_str("website"),
        map_url: f.str_or_empty("mapUrl"),
        hours: f.str_or_empty("hours"),
        district: f.str_or_empty("district"),
        rating: f.number("rating").unwrap_or(0.0),
        review_count: f.count("reviewCount").unwrap_or(0),
        services: f.strings("services"),
    })
}
