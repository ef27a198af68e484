//! Veterinary clinic discovery through the public Overpass API.
//!
//! Offline data preparation only: the serving path never calls this.

use std::collections::HashMap;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::backend::BackendError;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Output record written to the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoVet {
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

/// Overpass QL for every `amenity=veterinary` node, way and relation inside
/// the administrative area called `area`.
pub fn build_query(area: &str, timeout_secs: u32) -> String {
    let area = area.replace('\\', "\\\\").replace('"', "\\\"");
    format!(
        "[out:json][timeout:{timeout_secs}];\n\
         area[\"name\"=\"{area}\"]->.searchArea;\n\
         (\n  \
         node[\"amenity\"=\"veterinary\"](area.searchArea);\n  \
         way[\"amenity\"=\"veterinary\"](area.searchArea);\n  \
         relation[\"amenity\"=\"veterinary\"](area.searchArea);\n\
         );\n\
         out center;"
    )
}

fn tag<'a>(tags: &'a HashMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .filter_map(|k| tags.get(*k))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

impl Element {
    /// `None` for elements without a usable `name` tag.
    pub fn to_geo_vet(&self) -> Option<GeoVet> {
        let name = tag(&self.tags, &["name", "name:en"])?.to_string();
        let street = [tag(&self.tags, &["addr:housenumber"]), tag(&self.tags, &["addr:street"])]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        let address = if street.is_empty() {
            tag(&self.tags, &["addr:full"]).map(str::to_string)
        } else {
            Some(street)
        };
        let (lat, lon) = match (&self.center, self.lat, self.lon) {
            (_, Some(lat), Some(lon)) => (Some(lat), Some(lon)),
            (Some(c), _, _) => (Some(c.lat), Some(c.lon)),
            _ => (None, None),
        };
        Some(GeoVet {
            name,
            phone: tag(&self.tags, &["phone", "contact:phone"]).map(str::to_string),
            address,
            city: tag(&self.tags, &["addr:city", "addr:province"]).map(str::to_string),
            lat,
            lon,
        })
    }
}

pub fn extract(resp: &OverpassResponse) -> Vec<GeoVet> {
    resp.elements.iter().filter_map(Element::to_geo_vet).collect()
}

#[instrument(skip(http))]
pub async fn fetch_vets(http: &Client, endpoint: &str, area: &str, timeout_secs: u32) -> Result<Vec<GeoVet>, BackendError> {
    let resp = http
        .post(endpoint)
        .form(&[("data", build_query(area, timeout_secs))])
        .send()
        .await?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(BackendError::Status { status: status.as_u16(), body });
    }
    let parsed: OverpassResponse = resp.json().await.map_err(|e| BackendError::Decode(e.to_string()))?;
    let vets = extract(&parsed);
    info!(elements = parsed.elements.len(), named = vets.len(), "overpass_results");
    Ok(vets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample() -> serde_json::Value {
        json!({
            "elements": [
                {"type": "node", "id": 1, "lat": 13.7, "lon": 100.5,
                 "tags": {"name": "Paws Clinic", "phone": "02 111 2222", "addr:housenumber": "9", "addr:street": "Sukhumvit", "addr:city": "Bangkok"}},
                {"type": "way", "id": 2, "center": {"lat": 13.8, "lon": 100.6},
                 "tags": {"contact:phone": "02 333 4444", "name": "Way Vet"}},
                {"type": "node", "id": 3, "lat": 1.0, "lon": 2.0, "tags": {"amenity": "veterinary"}},
                {"type": "node", "id": 4, "lat": 1.0, "lon": 2.0}
            ]
        })
    }

    #[test]
    fn query_is_templated_and_quoted() {
        let q = build_query("Chiang \"Mai\"", 30);
        assert!(q.starts_with("[out:json][timeout:30];"));
        assert!(q.contains("area[\"name\"=\"Chiang \\\"Mai\\\"\"]"));
        assert!(q.contains("way[\"amenity\"=\"veterinary\"]"));
        assert!(q.ends_with("out center;"));
    }

    #[test]
    fn unnamed_elements_are_dropped() {
        let resp: OverpassResponse = serde_json::from_value(sample()).unwrap();
        let vets = extract(&resp);
        assert_eq!(vets.len(), 2);
        assert_eq!(vets[0].address.as_deref(), Some("9 Sukhumvit"));
        assert_eq!(vets[0].city.as_deref(), Some("Bangkok"));
        assert_eq!(vets[1].phone.as_deref(), Some("02 333 4444"));
        assert_eq!((vets[1].lat, vets[1].lon), (Some(13.8), Some(100.6)));
        assert_eq!(vets[1].address, None);
    }

    #[test]
    fn output_shape() {
        let resp: OverpassResponse = serde_json::from_value(sample()).unwrap();
        let out = serde_json::to_value(&extract(&resp)[1]).unwrap();
        assert_eq!(out, json!({"name": "Way Vet", "phone": "02 333 4444", "address": null, "city": null, "lat": 13.8, "lon": 100.6}));
    }

    #[tokio::test]
    async fn fetch_posts_query_and_filters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("amenity"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sample()))
            .expect(1)
            .mount(&server)
            .await;
        let vets = fetch_vets(&Client::new(), &server.uri(), "Bangkok", 25).await.unwrap();
        assert_eq!(vets.len(), 2);
    }
}
