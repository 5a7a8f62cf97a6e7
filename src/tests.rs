//! Integration tests for the Pokélist backend.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::catalog::tests::FakeImageStore;
use crate::catalog::{Catalog, CatalogReader};
use crate::config::{Config, LogFormat};
use crate::db::{init_database, open_read_only, Repository};
use crate::{create_router, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    images: Arc<FakeImageStore>,
    _temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_images(FakeImageStore::working()).await
    }

    async fn with_images(store: FakeImageStore) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let read_pool = open_read_only(&db_path)
            .await
            .expect("Failed to open read-only DB");

        let images = Arc::new(store);

        // Create config
        let config = Config {
            db_path,
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            log_format: LogFormat::Pretty,
            cloudinary: None,
            max_upload_bytes: 1024 * 1024,
        };

        let state = AppState {
            catalog: Arc::new(Catalog::new(Repository::new(pool), images.clone())),
            reader: Arc::new(CatalogReader::new(Repository::new(read_pool))),
            config: Arc::new(config),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            images,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn create_list(&self, name: &str) -> String {
        let resp = self
            .client
            .post(self.url("/api/lists"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"]["id"].as_str().unwrap().to_string()
    }

    async fn add_card(&self, list_id: &str, card: Value) -> Value {
        let resp = self
            .client
            .post(self.url(&format!("/api/lists/{}/cards", list_id)))
            .json(&card)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        body["data"].clone()
    }

    async fn card_names(&self, list_id: &str) -> Vec<String> {
        let resp = self
            .client
            .get(self.url(&format!("/api/lists/{}/cards", list_id)))
            .send()
            .await
            .unwrap();
        let body: Value = resp.json().await.unwrap();
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap().to_string())
            .collect()
    }
}

fn card_json(name: &str, number: &str) -> Value {
    json!({
        "photoUrl": format!("https://res.cloudinary.com/demo/image/upload/v1/pokelist/{}.jpg", number),
        "name": name,
        "cardNumber": number,
        "collectionTotal": 102,
        "language": "English",
        "condition": "NM",
        "owned": false
    })
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_list_crud() {
    let fixture = TestFixture::new().await;

    let id = fixture.create_list("Base Set").await;

    // Rename
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/lists/{}", id)))
        .json(&json!({ "name": "Base Set Unlimited" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Base Set Unlimited");

    // Summaries carry card counts
    fixture.add_card(&id, card_json("Pikachu", "58")).await;
    let resp = fixture
        .client
        .get(fixture.url("/api/lists"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"][0]["cardCount"], 1);

    // Delete removes the list and its cards
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/lists/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/lists/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let resp = fixture
        .client
        .get(fixture.url("/api/search"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_list_blank_name() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/lists"))
        .json(&json!({ "name": "  " }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_card_lifecycle() {
    let fixture = TestFixture::new().await;
    let list_id = fixture.create_list("Jungle").await;

    let card = fixture.add_card(&list_id, card_json("Snorlax", "11")).await;
    let card_id = card["id"].as_str().unwrap().to_string();
    assert_eq!(card["cardOrder"], 1);
    assert_eq!(card["cardType"], "Normal");
    assert_eq!(card["owned"], false);

    // Detail includes the list name
    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/cards/{}", card_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["listName"], "Jungle");

    // Edit
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/cards/{}", card_id)))
        .json(&json!({
            "name": "Snorlax",
            "cardNumber": "27",
            "language": "Japanese",
            "condition": "SP",
            "cardType": "Foil",
            "gradingNote": 9,
            "owned": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["cardNumber"], "27");
    assert_eq!(body["data"]["language"], "Japanese");
    assert_eq!(body["data"]["gradingNote"], 9);
    assert_eq!(body["data"]["photoUrl"], card["photoUrl"]);

    // Toggle owned back to wanted
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/cards/{}/toggle-owned", card_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["owned"], false);

    // Delete twice: both succeed
    for _ in 0..2 {
        let resp = fixture
            .client
            .delete(fixture.url(&format!("/api/cards/{}", card_id)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }
    assert!(fixture.card_names(&list_id).await.is_empty());
}

#[tokio::test]
async fn test_add_card_invalid_grade() {
    let fixture = TestFixture::new().await;
    let list_id = fixture.create_list("Graded").await;

    let mut card = card_json("Mewtwo", "10");
    card["gradingNote"] = json!(11);

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/lists/{}/cards", list_id)))
        .json(&card)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    assert!(fixture.card_names(&list_id).await.is_empty());
}

#[tokio::test]
async fn test_add_card_to_missing_list() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/lists/no-such-list/cards"))
        .json(&card_json("Pikachu", "58"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_card_not_found() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/cards/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = fixture
        .client
        .post(fixture.url("/api/cards/missing/toggle-owned"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = fixture
        .client
        .post(fixture.url("/api/cards/missing/move"))
        .json(&json!({ "direction": "up" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_move_card() {
    let fixture = TestFixture::new().await;
    let list_id = fixture.create_list("Fossil").await;

    fixture.add_card(&list_id, card_json("A", "1")).await;
    fixture.add_card(&list_id, card_json("B", "2")).await;
    let c = fixture.add_card(&list_id, card_json("C", "3")).await;
    let c_id = c["id"].as_str().unwrap();

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/cards/{}/move", c_id)))
        .json(&json!({ "direction": "up" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let orders: Vec<(String, i64)> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["name"].as_str().unwrap().to_string(),
                c["cardOrder"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        orders,
        vec![
            ("A".to_string(), 1),
            ("C".to_string(), 2),
            ("B".to_string(), 3)
        ]
    );

    // Moving the last card down changes nothing
    let b = &body["data"][2]["id"];
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/cards/{}/move", b.as_str().unwrap())))
        .json(&json!({ "direction": "down" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(fixture.card_names(&list_id).await, vec!["A", "C", "B"]);
}

#[tokio::test]
async fn test_search() {
    let fixture = TestFixture::new().await;
    let base = fixture.create_list("Base Set").await;
    let jungle = fixture.create_list("Jungle").await;

    let mut pikachu = card_json("Pikachu", "58");
    pikachu["owned"] = json!(true);
    pikachu["gradingNote"] = json!(8);
    fixture.add_card(&base, pikachu).await;
    fixture.add_card(&base, card_json("Raichu", "14")).await;

    let mut pikachu_ex = card_json("pikachu EX", "60");
    pikachu_ex["language"] = json!("Simplified Chinese");
    fixture.add_card(&jungle, pikachu_ex).await;

    // Case-insensitive substring
    let resp = fixture
        .client
        .get(fixture.url("/api/search"))
        .query(&[("nameContains", "PIKA")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["listName"], "Base Set");
    assert_eq!(results[1]["listName"], "Jungle");

    // Combined filters
    let resp = fixture
        .client
        .get(fixture.url("/api/search"))
        .query(&[("owned", "true"), ("gradingMin", "7")])
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let results = body["data"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Pikachu");

    // Multi-word language names
    let resp = fixture
        .client
        .get(fixture.url("/api/search"))
        .query(&[("language", "Simplified Chinese")])
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "pikachu EX");
}

#[tokio::test]
async fn test_search_inverted_grade_range() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/search"))
        .query(&[("gradingMin", "9"), ("gradingMax", "3")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upload_card_with_photo() {
    let fixture = TestFixture::new().await;
    let list_id = fixture.create_list("Team Rocket").await;

    let attrs = json!({
        "name": "Dark Charizard",
        "cardNumber": "4",
        "collectionTotal": 82,
        "language": "English",
        "condition": "GM",
        "cardType": "Foil"
    });
    let form = Form::new()
        .text("card", attrs.to_string())
        .part("photo", Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0]).file_name("charizard.jpg"));

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/lists/{}/cards/upload", list_id)))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Dark Charizard");
    assert_eq!(
        body["data"]["photoUrl"],
        "https://res.cloudinary.com/test/image/upload/v1/pokelist/1-4.jpg"
    );
    assert_eq!(fixture.images.uploads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_upload_card_malformed_json() {
    let fixture = TestFixture::new().await;
    let list_id = fixture.create_list("Neo Genesis").await;

    let form = Form::new()
        .text("card", "{not json")
        .part("photo", Part::bytes(vec![1, 2, 3]).file_name("card.jpg"));

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/lists/{}/cards/upload", list_id)))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(fixture.images.uploads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_upload_failure_writes_nothing() {
    let fixture = TestFixture::with_images(FakeImageStore::failing()).await;
    let list_id = fixture.create_list("Gym Heroes").await;

    let form = Form::new()
        .text("card", card_json("Misty's Psyduck", "67").to_string())
        .part("photo", Part::bytes(vec![1, 2, 3]).file_name("card.jpg"));

    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/lists/{}/cards/upload", list_id)))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 502);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "UPLOAD_ERROR");

    assert!(fixture.card_names(&list_id).await.is_empty());
}

#[tokio::test]
async fn test_upload_image() {
    let fixture = TestFixture::new().await;

    let form = Form::new().part("photo", Part::bytes(vec![9; 16]).file_name("scan.png"));
    let resp = fixture
        .client
        .post(fixture.url("/api/images"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["data"]["secureUrl"],
        "https://res.cloudinary.com/test/image/upload/v1/pokelist/1-16.jpg"
    );

    // No photo part
    let form = Form::new().text("other", "value");
    let resp = fixture
        .client
        .post(fixture.url("/api/images"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_view_routes() {
    let fixture = TestFixture::new().await;
    let list_id = fixture.create_list("Shared").await;
    let card = fixture.add_card(&list_id, card_json("Eevee", "51")).await;
    let card_id = card["id"].as_str().unwrap();

    let resp = fixture
        .client
        .get(fixture.url("/view/lists"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"][0]["name"], "Shared");

    let resp = fixture
        .client
        .get(fixture.url(&format!("/view/lists/{}/cards", list_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    let viewed = &body["data"][0];
    assert_eq!(viewed["name"], "Eevee");
    assert!(viewed["thumbnailUrl"]
        .as_str()
        .unwrap()
        .contains("/image/upload/f_auto,q_auto,c_fill,g_auto,w_80,h_80/"));

    let resp = fixture
        .client
        .get(fixture.url(&format!("/view/cards/{}", card_id)))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["listName"], "Shared");

    let resp = fixture
        .client
        .get(fixture.url("/view/search"))
        .query(&[("nameContains", "eev")])
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let resp = fixture
        .client
        .get(fixture.url("/view/lists/missing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_view_routes_reject_writes() {
    let fixture = TestFixture::new().await;
    let list_id = fixture.create_list("Locked").await;

    let resp = fixture
        .client
        .post(fixture.url("/view/lists"))
        .json(&json!({ "name": "Sneaky" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/view/lists/{}", list_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 405);

    let resp = fixture
        .client
        .get(fixture.url("/view/lists"))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_requests_use_error_envelope() {
    let fixture = TestFixture::new().await;
    let list_id = fixture.create_list("Envelope").await;

    // Unknown enum value in a JSON body
    let mut card = card_json("Mewtwo", "10");
    card["language"] = json!("Klingon");
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/lists/{}/cards", list_id)))
        .json(&card)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Unknown direction
    let card = fixture.add_card(&list_id, card_json("Mew", "8")).await;
    let resp = fixture
        .client
        .post(fixture.url(&format!("/api/cards/{}/move", card["id"].as_str().unwrap())))
        .json(&json!({ "direction": "sideways" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");

    // Unknown enum value in a query string, on both surfaces
    for path in ["/api/search", "/view/search"] {
        let resp = fixture
            .client
            .get(fixture.url(path))
            .query(&[("language", "Klingon")])
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400, "{}", path);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    // Not a multipart body
    let resp = fixture
        .client
        .post(fixture.url("/api/images"))
        .json(&json!({ "photo": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_search_form_blank_fields_are_ignored() {
    let fixture = TestFixture::new().await;
    let list_id = fixture.create_list("Forms").await;
    fixture.add_card(&list_id, card_json("Pikachu", "58")).await;
    fixture.add_card(&list_id, card_json("Raichu", "14")).await;

    for path in ["/api/search", "/view/search"] {
        let resp = fixture
            .client
            .get(fixture.url(&format!(
                "{}?nameContains=pika&language=&owned=&condition=&cardType=&gradingMin=&gradingMax=&sort=",
                path
            )))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "{}", path);
        let body: Value = resp.json().await.unwrap();
        let results = body["data"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["name"], "Pikachu");
    }
}

#[tokio::test]
async fn test_search_matches_accented_names() {
    let fixture = TestFixture::new().await;
    let list_id = fixture.create_list("Coffret").await;
    fixture.add_card(&list_id, card_json("ÉVOLI", "133")).await;

    let resp = fixture
        .client
        .get(fixture.url("/view/search"))
        .query(&[("nameContains", "évoli")])
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "ÉVOLI");
}
