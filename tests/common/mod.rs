//! Helpers for integration tests.

#![allow(dead_code)]

use std::sync::Mutex;

use actix_web::dev::ServerHandle;
use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Map, Value, json};

/// In-memory state of the fake backend API.
pub struct BackendState {
    pub products: Value,
    pub links: Mutex<Map<String, Value>>,
    pub bulk_requests: Mutex<Vec<Value>>,
    pub fail_links: bool,
}

impl BackendState {
    pub fn new(products: Value, links: Value) -> Self {
        Self {
            products,
            links: Mutex::new(links.as_object().cloned().unwrap_or_default()),
            bulk_requests: Mutex::new(Vec::new()),
            fail_links: false,
        }
    }

    pub fn failing_links(mut self) -> Self {
        self.fail_links = true;
        self
    }
}

/// Backend API served in-process on an ephemeral port.
pub struct FakeBackend {
    pub base_url: String,
    pub state: web::Data<BackendState>,
    handle: ServerHandle,
}

impl FakeBackend {
    pub fn start(state: BackendState) -> Self {
        let state = web::Data::new(state);
        let app_state = state.clone();

        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .route("/api/shopify/products", web::get().to(list_products))
                .route("/api/platform-links", web::get().to(list_links))
                .route("/api/platform-links/bulk", web::post().to(bulk_update))
                .route("/api/platform-links/{id}", web::get().to(get_links))
                .route("/api/platform-links/{id}", web::post().to(update_links))
        })
        .workers(1)
        .shutdown_timeout(1)
        .disable_signals()
        .bind(("127.0.0.1", 0))
        .expect("Failed to bind fake backend");

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            base_url: format!("http://{addr}"),
            state,
            handle,
        }
    }

    pub fn stored_links(&self, id: &str) -> Option<Value> {
        self.state.links.lock().unwrap().get(id).cloned()
    }

    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

async fn list_products(state: web::Data<BackendState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.products)
}

async fn list_links(state: web::Data<BackendState>) -> HttpResponse {
    if state.fail_links {
        return HttpResponse::InternalServerError().finish();
    }
    let links = state.links.lock().unwrap().clone();
    HttpResponse::Ok().json(links)
}

async fn get_links(state: web::Data<BackendState>, id: web::Path<String>) -> HttpResponse {
    let record = state.links.lock().unwrap().get(id.as_str()).cloned();
    match record {
        Some(record) => HttpResponse::Ok().json(record),
        None => HttpResponse::NotFound().json(json!({ "error": "not found" })),
    }
}

async fn update_links(
    state: web::Data<BackendState>,
    id: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    state
        .links
        .lock()
        .unwrap()
        .insert(id.into_inner(), body.into_inner());
    HttpResponse::Ok().json(json!({ "success": true }))
}

async fn bulk_update(state: web::Data<BackendState>, body: web::Json<Value>) -> HttpResponse {
    let body = body.into_inner();
    let records = body["links"].as_object().cloned().unwrap_or_default();
    let count = records.len();

    let mut links = state.links.lock().unwrap();
    for (id, record) in records {
        links.insert(id, record);
    }
    state.bulk_requests.lock().unwrap().push(body);

    HttpResponse::Ok().json(json!({ "success": true, "updatedCount": count }))
}

/// Three lighting products, the second with two variants.
pub fn sample_products() -> Value {
    json!([
        {
            "id": 101,
            "title": "Modern Pendant Light",
            "description": "Chrome pendant",
            "images": [{ "src": "https://cdn.example.com/101.jpg" }],
            "variants": [
                { "id": 1011, "title": "Chrome", "price": "129.00", "sku": "PEND-001-CHR" }
            ],
            "category": "Pendant Lights",
            "collections": [{ "id": 7, "title": "Lighting", "handle": "lighting" }]
        },
        {
            "id": 102,
            "title": "Crystal Chandelier",
            "images": [],
            "variants": [
                { "id": 1021, "title": "Small", "price": "499.00", "sku": "CHAN-002-S" },
                { "id": 1022, "title": "Large", "price": "699.00", "sku": "CHAN-002-L" }
            ],
            "category": "Chandeliers"
        },
        {
            "id": 103,
            "title": "Brass Wall Sconce",
            "variants": [{ "title": "Default", "price": "89.00", "sku": null }],
            "category": "Wall Lights"
        }
    ])
}

/// Stored link records: one for product 101, plus one for a product the
/// catalog no longer lists.
pub fn sample_links() -> Value {
    json!({
        "101": { "amazon": "https://amazon.com/dp/101", "wayfair": null, "legacy": "https://old.example" },
        "999": { "amazon": "https://amazon.com/dp/999" }
    })
}
