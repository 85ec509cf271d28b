use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use parking_allocation::config::{EnvironmentConfig, StorageBackend};
use parking_allocation::repositories::InMemoryRepository;
use parking_allocation::routes::create_app;
use parking_allocation::state::AppState;

struct TestApp {
    router: Router,
}

struct TestResponse {
    status: StatusCode,
    total_count: Option<String>,
    body: Value,
}

impl TestApp {
    fn new() -> Self {
        let config = EnvironmentConfig {
            storage_backend: StorageBackend::Memory,
            ..EnvironmentConfig::default()
        };
        let state = AppState::in_memory(config, InMemoryRepository::new());
        Self {
            router: create_app(state),
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let total_count = response
            .headers()
            .get("x-total-count")
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        TestResponse { status, total_count, body }
    }

    async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::PUT, uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    async fn create_client(&self, document: &str) -> i64 {
        let response = self
            .post(
                "/api/clients",
                json!({
                    "first_name": "Ana",
                    "last_name": document,
                    "document_number": document,
                    "email": format!("{}@parking.test", document.to_lowercase())
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_i64().unwrap()
    }

    async fn create_car(&self, plate: &str, client_id: i64) -> i64 {
        let response = self
            .post(
                "/api/cars",
                json!({
                    "license_plate": plate,
                    "brand": "Seat",
                    "model": "Ibiza",
                    "year": 2020,
                    "client_id": client_id
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_i64().unwrap()
    }

    async fn create_space(&self, number: &str, zone: Option<&str>) -> i64 {
        let response = self
            .post("/api/parking-spaces", json!({ "space_number": number, "zone": zone }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"].as_i64().unwrap()
    }

    async fn assign(&self, client_id: i64, car_id: i64, space_id: i64) -> TestResponse {
        self.post(
            "/api/parking-assignments",
            json!({ "client_id": client_id, "car_id": car_id, "parking_space_id": space_id }),
        )
        .await
    }

    async fn space_available(&self, space_id: i64) -> bool {
        let response = self.get(&format!("/api/parking-spaces/{}", space_id)).await;
        assert_eq!(response.status, StatusCode::OK);
        response.body["is_available"].as_bool().unwrap()
    }
}

/// Cliente A con coche C1, cliente B con coche C2 y un espacio S1
async fn conflict_fixture(app: &TestApp) -> (i64, i64, i64, i64, i64) {
    let client_a = app.create_client("A0001").await;
    let client_b = app.create_client("B0002").await;
    let car_1 = app.create_car("C1-0001", client_a).await;
    let car_2 = app.create_car("C2-0002", client_b).await;
    let space_1 = app.create_space("S1", Some("A")).await;
    (client_a, client_b, car_1, car_2, space_1)
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let response = app.get("/health").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["storage"], "memory");
}

#[tokio::test]
async fn test_second_holder_is_rejected_until_revoked() {
    let app = TestApp::new();
    let (client_a, client_b, car_1, car_2, space_1) = conflict_fixture(&app).await;

    let first = app.assign(client_a, car_1, space_1).await;
    assert_eq!(first.status, StatusCode::CREATED);
    let first_id = first.body["data"]["id"].as_i64().unwrap();
    assert!(!app.space_available(space_1).await);

    let second = app.assign(client_b, car_2, space_1).await;
    assert_eq!(second.status, StatusCode::CONFLICT);
    assert_eq!(second.body["code"], "SPACE_CONFLICT");
    assert_eq!(second.body["details"]["holder_assignment_id"], first_id);

    let revoked = app
        .post(
            &format!("/api/parking-assignments/{}/revoke", first_id),
            json!({ "reason": "moved" }),
        )
        .await;
    assert_eq!(revoked.status, StatusCode::OK);
    assert!(app.space_available(space_1).await);

    let retry = app.assign(client_b, car_2, space_1).await;
    assert_eq!(retry.status, StatusCode::CREATED);
    assert!(!app.space_available(space_1).await);

    let prior = app.get(&format!("/api/parking-assignments/{}", first_id)).await;
    assert_eq!(prior.body["status"], "Cancelled");
    assert_eq!(prior.body["is_active"], false);
}

#[tokio::test]
async fn test_update_does_not_conflict_with_itself() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, space_1) = conflict_fixture(&app).await;

    let created = app.assign(client_a, car_1, space_1).await;
    let id = created.body["data"]["id"].as_i64().unwrap();

    let updated = app
        .put(
            &format!("/api/parking-assignments/{}", id),
            json!({
                "id": id,
                "client_id": client_a,
                "car_id": car_1,
                "parking_space_id": space_1,
                "notes": "Monthly pass"
            }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.body["data"]["notes"], "Monthly pass");
    assert!(!updated.body["data"]["modified_date"].is_null());
    assert!(!app.space_available(space_1).await);
}

#[tokio::test]
async fn test_update_with_mismatched_body_id() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, space_1) = conflict_fixture(&app).await;

    let created = app.assign(client_a, car_1, space_1).await;
    let id = created.body["data"]["id"].as_i64().unwrap();

    let response = app
        .put(
            &format!("/api/parking-assignments/{}", id),
            json!({
                "id": id + 100,
                "client_id": client_a,
                "car_id": car_1,
                "parking_space_id": space_1
            }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "IDENTIFIER_MISMATCH");
}

#[tokio::test]
async fn test_car_must_belong_to_client() {
    let app = TestApp::new();
    let (client_a, _, _, car_2, space_1) = conflict_fixture(&app).await;

    let response = app.assign(client_a, car_2, space_1).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "OWNERSHIP_MISMATCH");
    assert!(app.space_available(space_1).await);
}

#[tokio::test]
async fn test_unknown_references_are_rejected() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, _) = conflict_fixture(&app).await;

    let response = app.assign(client_a, car_1, 999).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "REFERENCE_NOT_FOUND");
}

#[tokio::test]
async fn test_revoke_appends_audit_note() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, space_1) = conflict_fixture(&app).await;

    let created = app
        .post(
            "/api/parking-assignments",
            json!({
                "client_id": client_a,
                "car_id": car_1,
                "parking_space_id": space_1,
                "notes": "Reserved for event"
            }),
        )
        .await;
    let id = created.body["data"]["id"].as_i64().unwrap();

    let revoked = app
        .post(
            &format!("/api/parking-assignments/{}/revoke", id),
            json!({ "reason": "no-show" }),
        )
        .await;
    assert_eq!(revoked.status, StatusCode::OK);
    let notes = revoked.body["data"]["notes"].as_str().unwrap();
    assert!(notes.starts_with("Reserved for event"));
    assert!(notes.ends_with("Revoked: no-show"));
    assert_eq!(revoked.body["data"]["state"], "Cancelled");
}

#[tokio::test]
async fn test_revoke_without_body() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, space_1) = conflict_fixture(&app).await;
    let id = app.assign(client_a, car_1, space_1).await.body["data"]["id"]
        .as_i64()
        .unwrap();

    let revoked = app
        .send(Method::POST, &format!("/api/parking-assignments/{}/revoke", id), None)
        .await;
    assert_eq!(revoked.status, StatusCode::OK);
    assert!(revoked.body["data"]["notes"].is_null());
}

#[tokio::test]
async fn test_delete_and_revoke_unknown_assignment() {
    let app = TestApp::new();

    let deleted = app.delete("/api/parking-assignments/42").await;
    assert_eq!(deleted.status, StatusCode::NOT_FOUND);

    let revoked = app
        .post("/api/parking-assignments/42/revoke", json!({ "reason": "x" }))
        .await;
    assert_eq!(revoked.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_soft_delete_guard_for_space_client_and_car() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, space_1) = conflict_fixture(&app).await;
    let id = app.assign(client_a, car_1, space_1).await.body["data"]["id"]
        .as_i64()
        .unwrap();

    for uri in [
        format!("/api/parking-spaces/{}", space_1),
        format!("/api/clients/{}", client_a),
        format!("/api/cars/{}", car_1),
    ] {
        let response = app.delete(&uri).await;
        assert_eq!(response.status, StatusCode::CONFLICT, "{}", uri);
        assert_eq!(response.body["code"], "ENTITY_IN_USE");
    }

    let deleted = app.delete(&format!("/api/parking-assignments/{}", id)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    for uri in [
        format!("/api/parking-spaces/{}", space_1),
        format!("/api/cars/{}", car_1),
        format!("/api/clients/{}", client_a),
    ] {
        let response = app.delete(&uri).await;
        assert_eq!(response.status, StatusCode::NO_CONTENT, "{}", uri);
    }

    let space = app.get(&format!("/api/parking-spaces/{}", space_1)).await;
    assert_eq!(space.body["is_active"], false);
}

#[tokio::test]
async fn test_recompute_is_idempotent() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, space_1) = conflict_fixture(&app).await;
    app.assign(client_a, car_1, space_1).await;

    let uri = format!("/api/parking-spaces/{}/recompute", space_1);
    let first = app.post(&uri, json!({})).await;
    let second = app.post(&uri, json!({})).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["is_available"], false);
    assert_eq!(second.body["data"]["is_available"], false);
    assert_eq!(second.body["message"], "Disponibilidad sin cambios");

    let report = app.post("/api/parking-spaces/reconcile", json!({})).await;
    assert_eq!(report.body["data"]["spaces_checked"], 1);
    assert_eq!(report.body["data"]["spaces_changed"], 0);
}

#[tokio::test]
async fn test_search_reports_total_count() {
    let app = TestApp::new();
    let client = app.create_client("P0001").await;
    let car = app.create_car("PAGE-01", client).await;
    for number in ["P1", "P2", "P3"] {
        let space = app.create_space(number, Some("P")).await;
        let response = app.assign(client, car, space).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let page = app
        .get(&format!("/api/parking-assignments?client_id={}&page=1&page_size=2", client))
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.total_count.as_deref(), Some("3"));
    assert_eq!(page.body.as_array().unwrap().len(), 2);

    let active = app.get("/api/parking-assignments/active").await;
    assert_eq!(active.body.as_array().unwrap().len(), 3);

    let by_client = app
        .get(&format!("/api/parking-assignments/by-client/{}", client))
        .await;
    assert_eq!(by_client.body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_available_spaces_listing() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, space_1) = conflict_fixture(&app).await;
    let free = app.create_space("S2", None).await;
    app.assign(client_a, car_1, space_1).await;

    let response = app.get("/api/parking-spaces/available").await;
    let ids: Vec<i64> = response
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|space| space["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![free]);
}

#[tokio::test]
async fn test_entity_uniqueness_and_validation() {
    let app = TestApp::new();
    let client = app.create_client("D0001").await;

    let duplicate = app
        .post(
            "/api/clients",
            json!({
                "first_name": "Otro",
                "last_name": "Cliente",
                "document_number": "D0001",
                "email": "otro@parking.test"
            }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let bad_email = app
        .post(
            "/api/clients",
            json!({
                "first_name": "Sin",
                "last_name": "Correo",
                "document_number": "D0002",
                "email": "not-an-email"
            }),
        )
        .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_email.body["code"], "VALIDATION_ERROR");

    let orphan_car = app
        .post(
            "/api/cars",
            json!({ "license_plate": "ORF-001", "brand": "Kia", "model": "Rio", "year": 2019, "client_id": 999 }),
        )
        .await;
    assert_eq!(orphan_car.status, StatusCode::BAD_REQUEST);
    assert_eq!(orphan_car.body["code"], "REFERENCE_NOT_FOUND");

    app.create_car("abc-123", client).await;
    let duplicate_plate = app
        .post(
            "/api/cars",
            json!({ "license_plate": "ABC-123", "brand": "Kia", "model": "Rio", "year": 2019, "client_id": client }),
        )
        .await;
    assert_eq!(duplicate_plate.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_car_cannot_change_owner() {
    let app = TestApp::new();
    let owner = app.create_client("O0001").await;
    let other = app.create_client("O0002").await;
    let car = app.create_car("OWN-001", owner).await;

    let transfer = app
        .put(&format!("/api/cars/{}", car), json!({ "client_id": other }))
        .await;
    assert_eq!(transfer.status, StatusCode::BAD_REQUEST);

    let repaint = app
        .put(&format!("/api/cars/{}", car), json!({ "client_id": owner, "color": "Rojo" }))
        .await;
    assert_eq!(repaint.status, StatusCode::OK);
    assert_eq!(repaint.body["data"]["color"], "Rojo");
    assert_eq!(repaint.body["data"]["client_id"], owner);
}

#[tokio::test]
async fn test_space_update_never_touches_availability() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, space_1) = conflict_fixture(&app).await;
    app.assign(client_a, car_1, space_1).await;

    let response = app
        .put(
            &format!("/api/parking-spaces/{}", space_1),
            json!({ "zone": "B", "is_available": true }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["zone"], "B");
    assert_eq!(response.body["data"]["is_available"], false);
}

#[tokio::test]
async fn test_update_without_body_id_is_rejected() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, space_1) = conflict_fixture(&app).await;
    let id = app.assign(client_a, car_1, space_1).await.body["data"]["id"]
        .as_i64()
        .unwrap();

    let response = app
        .put(
            &format!("/api/parking-assignments/{}", id),
            json!({ "client_id": client_a, "car_id": car_1, "parking_space_id": space_1, "notes": "sin id" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "IDENTIFIER_MISMATCH");
    assert_eq!(response.body["details"]["body_id"], 0);

    let stored = app.get(&format!("/api/parking-assignments/{}", id)).await;
    assert!(stored.body["notes"].is_null());
}

#[tokio::test]
async fn test_active_assignments_follow_zone_then_space_number() {
    let app = TestApp::new();
    let client = app.create_client("Z0001").await;
    let car = app.create_car("ZONE-01", client).await;

    let b1 = app.create_space("B1", Some("B")).await;
    let a2 = app.create_space("A2", Some("A")).await;
    let a1 = app.create_space("A1", Some("A")).await;
    let loose = app.create_space("X1", None).await;
    for space in [b1, a2, a1, loose] {
        assert_eq!(app.assign(client, car, space).await.status, StatusCode::CREATED);
    }

    let active = app.get("/api/parking-assignments/active").await;
    let spaces: Vec<i64> = active
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["parking_space_id"].as_i64().unwrap())
        .collect();
    assert_eq!(spaces, vec![loose, a1, a2, b1]);
}

#[tokio::test]
async fn test_client_assignments_newest_first() {
    let app = TestApp::new();
    let client = app.create_client("H0001").await;
    let car = app.create_car("HIST-01", client).await;

    let mut ids = Vec::new();
    for (number, assigned) in [
        ("H1", "2025-03-01T08:00:00Z"),
        ("H2", "2025-05-01T08:00:00Z"),
        ("H3", "2025-04-01T08:00:00Z"),
    ] {
        let space = app.create_space(number, Some("H")).await;
        let response = app
            .post(
                "/api/parking-assignments",
                json!({
                    "client_id": client,
                    "car_id": car,
                    "parking_space_id": space,
                    "assigned_date": assigned
                }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        ids.push(response.body["data"]["id"].as_i64().unwrap());
    }

    let history = app
        .get(&format!("/api/parking-assignments/by-client/{}", client))
        .await;
    let order: Vec<i64> = history
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_i64().unwrap())
        .collect();
    assert_eq!(order, vec![ids[1], ids[2], ids[0]]);
}

fn ids_of(body: &Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_free_text_search_on_assignments() {
    let app = TestApp::new();
    let (client_a, client_b, car_1, car_2, space_1) = conflict_fixture(&app).await;
    let space_2 = app.create_space("S2", Some("A")).await;

    let first = app.assign(client_a, car_1, space_1).await.body["data"]["id"]
        .as_i64()
        .unwrap();
    let second = app.assign(client_b, car_2, space_2).await.body["data"]["id"]
        .as_i64()
        .unwrap();

    let by_plate = app.get("/api/parking-assignments?search=c2-").await;
    assert_eq!(by_plate.total_count.as_deref(), Some("1"));
    assert_eq!(ids_of(&by_plate.body), vec![second]);

    // El apellido del cliente A es su documento en el fixture
    let by_name = app.get("/api/parking-assignments?search=a0001").await;
    assert_eq!(ids_of(&by_name.body), vec![first]);

    let by_space = app.get("/api/parking-assignments?search=S").await;
    assert_eq!(by_space.total_count.as_deref(), Some("2"));

    let none = app.get("/api/parking-assignments?search=zzz").await;
    assert_eq!(none.total_count.as_deref(), Some("0"));
}

#[tokio::test]
async fn test_free_text_search_on_entity_lists() {
    let app = TestApp::new();
    let lucia = app.create_client("L0001").await;
    let other = app.create_client("M0002").await;
    let ibiza = app.create_car("SRC-001", lucia).await;
    app.create_car("SRC-002", other).await;
    let north = app.create_space("N-01", Some("North")).await;
    app.create_space("S-01", Some("South")).await;

    let clients = app.get("/api/clients?search=l0001%40parking").await;
    assert_eq!(ids_of(&clients.body), vec![lucia]);

    let cars = app.get("/api/cars?search=src-001").await;
    assert_eq!(ids_of(&cars.body), vec![ibiza]);

    let spaces = app.get("/api/parking-spaces?search=nor").await;
    assert_eq!(ids_of(&spaces.body), vec![north]);

    let blank = app.get("/api/parking-spaces?search=").await;
    assert_eq!(blank.body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_space_zones_and_types() {
    let app = TestApp::new();
    app.create_space("B-01", Some("B")).await;
    app.create_space("A-01", Some("A")).await;
    app.create_space("A-02", Some("A")).await;
    app.create_space("X-01", None).await;
    let vip = app
        .post("/api/parking-spaces", json!({ "space_number": "V-01", "zone": "C", "space_type": "VIP" }))
        .await;
    assert_eq!(vip.status, StatusCode::CREATED);
    let vip_id = vip.body["data"]["id"].as_i64().unwrap();

    let zones = app.get("/api/parking-spaces/zones").await;
    assert_eq!(zones.body, json!(["A", "B", "C"]));

    let types = app.get("/api/parking-spaces/types").await;
    assert_eq!(types.body, json!(["Regular", "VIP"]));

    // Los espacios dados de baja no aportan zona ni tipo
    assert_eq!(
        app.delete(&format!("/api/parking-spaces/{}", vip_id)).await.status,
        StatusCode::NO_CONTENT
    );
    assert_eq!(app.get("/api/parking-spaces/zones").await.body, json!(["A", "B"]));
    assert_eq!(app.get("/api/parking-spaces/types").await.body, json!(["Regular"]));
}

#[tokio::test]
async fn test_client_update() {
    let app = TestApp::new();
    let client = app.create_client("U0001").await;
    app.create_client("U0002").await;

    let updated = app
        .put(
            &format!("/api/clients/{}", client),
            json!({ "phone": "600111222", "email": "Nuevo@Parking.test" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{}", updated.body);
    assert_eq!(updated.body["data"]["phone"], "600111222");
    assert_eq!(updated.body["data"]["email"], "nuevo@parking.test");
    assert_eq!(updated.body["data"]["document_number"], "U0001");

    let taken = app
        .put(&format!("/api/clients/{}", client), json!({ "email": "u0002@parking.test" }))
        .await;
    assert_eq!(taken.status, StatusCode::CONFLICT);

    let missing = app.put("/api/clients/999", json!({ "phone": "1" })).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_revoked_record_with_long_history_can_be_resubmitted() {
    let app = TestApp::new();
    let (client_a, _, car_1, _, space_1) = conflict_fixture(&app).await;
    let created = app
        .post(
            "/api/parking-assignments",
            json!({
                "client_id": client_a,
                "car_id": car_1,
                "parking_space_id": space_1,
                "notes": "x".repeat(495)
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["data"]["id"].as_i64().unwrap();

    let revoked = app
        .post(
            &format!("/api/parking-assignments/{}/revoke", id),
            json!({ "reason": "contrato finalizado" }),
        )
        .await;
    let notes = revoked.body["data"]["notes"].as_str().unwrap().to_string();
    assert!(notes.len() > 500);

    let resubmitted = app
        .put(
            &format!("/api/parking-assignments/{}", id),
            json!({
                "id": id,
                "client_id": client_a,
                "car_id": car_1,
                "parking_space_id": space_1,
                "status": "Cancelled",
                "notes": notes
            }),
        )
        .await;
    assert_eq!(resubmitted.status, StatusCode::OK, "{}", resubmitted.body);
    assert_eq!(resubmitted.body["data"]["notes"].as_str(), Some(notes.as_str()));
}
