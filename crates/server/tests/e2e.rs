use std::net::SocketAddr;
use std::sync::Arc;

use configs::RelayConfig;
use indexmap::IndexMap;
use models::cat::{Cat, CatStatus, Gender};
use models::profile::{Profile, Role};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use server::routes;
use server::state::AppState;
use service::cats::repository::{mock::MockCatRepository, CatRepository};
use service::cats::CatService;
use service::contact::ContactRelay;
use service::fallback::FallbackPolicy;
use service::profiles::repository::mock::{MockAssetStore, MockProfileRepository};
use service::profiles::repository::{AssetStore, ProfileRepository};
use service::profiles::ProfileService;
use service::vets::repository::{mock::MockVetRepository, VetRepository};
use service::vets::VetService;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

struct TestApp {
    base_url: String,
    client: reqwest::Client,
    vets: Arc<MockVetRepository>,
    profiles: Arc<MockProfileRepository>,
    assets: Arc<MockAssetStore>,
}

fn cat(id: &str, status: CatStatus) -> Cat {
    let mut attributes = IndexMap::new();
    attributes.insert("isVaccinated".to_string(), true);
    attributes.insert("isNeutered".to_string(), false);
    Cat {
        id: id.into(),
        name: format!("Cat {id}"),
        age_months: 14,
        gender: Gender::Female,
        breed: None,
        location: "Riverside".into(),
        images: vec![],
        description: String::new(),
        attributes,
        status,
        created_at: None,
    }
}

async fn start_server() -> anyhow::Result<TestApp> {
    let cats = Arc::new(MockCatRepository::with_cats(vec![
        cat("c1", CatStatus::Available),
        cat("c2", CatStatus::Adopted),
    ]));
    let vets = Arc::new(MockVetRepository::with_vets(vec![]));
    let profiles = Arc::new(MockProfileRepository::with_profiles(vec![Profile {
        id: "u1".into(),
        full_name: Some("Ann".into()),
        avatar_url: None,
        phone: None,
        role: Role::User,
        updated_at: None,
    }]));
    let assets = Arc::new(MockAssetStore::default());

    let cat_repo: Arc<dyn CatRepository> = cats;
    let vet_repo: Arc<dyn VetRepository> = vets.clone();
    let profile_repo: Arc<dyn ProfileRepository> = profiles.clone();
    let asset_store: Arc<dyn AssetStore> = assets.clone();
    let state = AppState {
        cats: Arc::new(CatService::new(cat_repo)),
        vets: Arc::new(VetService::new(vet_repo, FallbackPolicy::default())),
        profiles: Arc::new(ProfileService::new(profile_repo, asset_store)),
        relay: Arc::new(ContactRelay::new(&RelayConfig::default())?),
        site_base_url: "https://cats.example.org/".into(),
    };

    let app = routes::build_router(state, CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url: format!("http://{}", addr), client: reqwest::Client::new(), vets, profiles, assets })
}

#[tokio::test]
async fn health_reports_ok() {
    let app = start_server().await.unwrap();
    let body: Value = app.client.get(format!("{}/health", app.base_url)).send().await.unwrap().json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn cat_listing_filters_by_status_and_formats_cards() {
    let app = start_server().await.unwrap();
    let url = format!("{}/api/cats?status=available", app.base_url);
    let body: Vec<Value> = app.client.get(url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body.len(), 1);
    assert_eq!(body[0]["id"], "c1");
    assert_eq!(body[0]["age"], "1 Yr 2 Mo");
    assert_eq!(body[0]["traits"], json!(["is Vaccinated"]));

    let bad = app.client.get(format!("{}/api/cats?status=lost", app.base_url)).send().await.unwrap();
    assert_eq!(bad.status(), HttpStatusCode::BAD_REQUEST);

    let missing = app.client.get(format!("{}/api/cats/nope", app.base_url)).send().await.unwrap();
    assert_eq!(missing.status(), HttpStatusCode::NOT_FOUND);
}

#[tokio::test]
async fn vets_fall_back_to_bundled_dataset() {
    let app = start_server().await.unwrap();
    app.vets.set_failing(true);
    let body: Value = app.client.get(format!("{}/api/vets", app.base_url)).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["source"], "fallback");
    let vets = body["vets"].as_array().unwrap();
    assert!(!vets.is_empty());
    assert!(vets.iter().all(|v| v["id"].as_str().unwrap().starts_with("static-")));

    let riverside: Value = app
        .client
        .get(format!("{}/api/vets?district=Riverside", app.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(riverside["source"], "fallback");
    let districts = riverside["vets"].as_array().unwrap();
    assert!(!districts.is_empty());
    assert!(districts.iter().all(|v| v["district"] == "Riverside"));

    let first_id = vets[0]["id"].as_str().unwrap().to_string();
    let one = app.client.get(format!("{}/api/vets/{}", app.base_url, first_id)).send().await.unwrap();
    assert_eq!(one.status(), HttpStatusCode::OK);
}

#[tokio::test]
async fn profile_read_absorbs_failures_but_update_surfaces_them() {
    let app = start_server().await.unwrap();
    let ok: Value = app.client.get(format!("{}/api/profiles/u1", app.base_url)).send().await.unwrap().json().await.unwrap();
    assert_eq!(ok["role"], "user");

    let renamed: Value = app
        .client
        .patch(format!("{}/api/profiles/u1", app.base_url))
        .json(&json!({"full_name": "Ploy"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(renamed["full_name"], "Ploy");

    app.profiles.set_failing(true);
    let read = app.client.get(format!("{}/api/profiles/u1", app.base_url)).send().await.unwrap();
    assert_eq!(read.status(), HttpStatusCode::NOT_FOUND);
    let write = app
        .client
        .patch(format!("{}/api/profiles/u1", app.base_url))
        .json(&json!({"phone": "555"}))
        .send()
        .await
        .unwrap();
    assert_eq!(write.status(), HttpStatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn avatar_upload_sets_profile_url() {
    let app = start_server().await.unwrap();
    let body: Value = app
        .client
        .post(format!("{}/api/profiles/u1/avatar?file_name=me.png", app.base_url))
        .header("content-type", "image/png")
        .body(vec![1u8, 2, 3])
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let url = body["avatar_url"].as_str().unwrap();
    assert!(url.starts_with("mock://avatars/"));
    assert!(url.ends_with(".png"));

    let empty = app
        .client
        .post(format!("{}/api/profiles/u1/avatar?file_name=me.png", app.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(empty.status(), HttpStatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn avatar_upload_for_unknown_profile_stores_nothing() {
    let app = start_server().await.unwrap();
    let resp = app
        .client
        .post(format!("{}/api/profiles/nobody/avatar?file_name=a.png", app.base_url))
        .header("content-type", "image/png")
        .body(vec![1u8, 2, 3])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), HttpStatusCode::NOT_FOUND);
    assert!(app.assets.object_names().is_empty());
}

#[tokio::test]
async fn contact_without_access_key_reports_failure() {
    let app = start_server().await.unwrap();
    let resp = app
        .client
        .post(format!("{}/api/contact", app.base_url))
        .json(&json!({"name": "Ann", "message": "hello"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), HttpStatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn sitemap_lists_static_pages_and_cats() {
    let app = start_server().await.unwrap();
    let resp = app.client.get(format!("{}/sitemap.xml", app.base_url)).send().await.unwrap();
    assert_eq!(resp.headers()["content-type"], "application/xml");
    let xml = resp.text().await.unwrap();
    assert!(xml.contains("<loc>https://cats.example.org/vets</loc>"));
    assert!(xml.contains("<loc>https://cats.example.org/adopt/c2</loc>"));
    assert!(!xml.contains("example.org//"));
}
