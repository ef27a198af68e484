//! REST client for the document store (Firestore-compatible wire format).
//!
//! Every field value on the wire is a single-key object naming its type, so
//! values are decoded into the tagged [`DocValue`] enum instead of loose JSON.

use std::time::Duration;

use chrono::{DateTime, Utc};
use configs::DocumentStoreConfig;
use indexmap::IndexMap;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::BackendError;

pub const CATS_COLLECTION: &str = "cats";
pub const VETS_COLLECTION: &str = "vets";
pub const USERS_COLLECTION: &str = "users";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ArrayBody {
    #[serde(default)]
    pub values: Vec<DocValue>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MapBody {
    #[serde(default)]
    pub fields: IndexMap<String, DocValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocValue {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(#[serde(with = "int64_string")] i64),
    DoubleValue(f64),
    TimestampValue(DateTime<Utc>),
    StringValue(String),
    BytesValue(String),
    ReferenceValue(String),
    GeoPointValue(GeoPoint),
    ArrayValue(ArrayBody),
    MapValue(MapBody),
}

impl DocValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DocValue::StringValue(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DocValue::IntegerValue(n) => Some(*n),
            DocValue::DoubleValue(f) if f.is_finite() => Some(f.trunc() as i64),
            DocValue::StringValue(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            DocValue::DoubleValue(f) => Some(*f),
            DocValue::IntegerValue(n) => Some(*n as f64),
            DocValue::StringValue(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            DocValue::TimestampValue(t) => Some(*t),
            DocValue::StringValue(s) => DateTime::parse_from_rfc3339(s).ok().map(|t| t.with_timezone(&Utc)),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DocValue]> {
        match self {
            DocValue::ArrayValue(a) => Some(&a.values),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, DocValue>> {
        match self {
            DocValue::MapValue(m) => Some(&m.fields),
            _ => None,
        }
    }

    /// Truthiness as the site's scripts saw it: null, false, zero, NaN and
    /// the empty string are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            DocValue::NullValue(()) => false,
            DocValue::BooleanValue(b) => *b,
            DocValue::IntegerValue(n) => *n != 0,
            DocValue::DoubleValue(f) => *f != 0.0 && !f.is_nan(),
            DocValue::StringValue(s) => !s.is_empty(),
            _ => true,
        }
    }
}

mod int64_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &i64, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&v.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            Num(i64),
        }
        match Repr::deserialize(d)? {
            Repr::Str(s) => s.parse().map_err(de::Error::custom),
            Repr::Num(n) => Ok(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Full resource path; the last segment is the document id.
    pub name: String,
    #[serde(default)]
    pub fields: IndexMap<String, DocValue>,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub update_time: Option<DateTime<Utc>>,
}

impl Document {
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn get(&self, field: &str) -> Option<&DocValue> {
        self.fields.get(field)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
    #[serde(default)]
    next_page_token: Option<String>,
}

pub struct DocumentClient {
    base_url: String,
    project_id: String,
    api_key: String,
    page_size: u32,
    http: Client,
}

impl DocumentClient {
    pub fn new(cfg: &DocumentStoreConfig) -> Result<Self, BackendError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(cfg.request_timeout_secs.max(1)))
            .build()?;
        Ok(Self {
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            project_id: cfg.project_id.clone(),
            api_key: cfg.api_key.clone(),
            page_size: cfg.page_size.max(1),
            http,
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents/{}",
            self.base_url, self.project_id, collection
        )
    }

    /// Full scan of one collection in a single round trip.
    #[instrument(skip(self))]
    pub async fn list_documents(&self, collection: &str) -> Result<Vec<Document>, BackendError> {
        let resp = self
            .http
            .get(self.collection_url(collection))
            .query(&[("pageSize", self.page_size.to_string()), ("key", self.api_key.clone())])
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::Status { status: status.as_u16(), body });
        }
        let page: ListDocumentsResponse = resp
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        if page.next_page_token.is_some() {
            debug!(collection, page_size = self.page_size, "collection larger than one page; remainder not fetched");
        }
        debug!(collection, count = page.documents.len(), "documents_listed");
        Ok(page.documents)
    }
}
