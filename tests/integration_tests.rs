// Integration tests for Flatchat API
//
// Runs the full route table against the in-memory record store.

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use flatchat_api::config::FeedSettings;
use flatchat_api::models::Post;
use flatchat_api::routes::{configure_routes, cors, AppState};
use flatchat_api::services::{
    CacheManager, MemoryStore, RecordKey, RecordStore, Records, StoreError, Table,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Store whose every operation fails, standing in for a lost database
struct UnavailableStore;

impl UnavailableStore {
    fn error(table: Table) -> StoreError {
        StoreError::InvalidRecord {
            table,
            reason: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl RecordStore for UnavailableStore {
    async fn get(&self, table: Table, _key: &RecordKey) -> Result<Option<Value>, StoreError> {
        Err(Self::error(table))
    }

    async fn put(&self, table: Table, _key: &RecordKey, _item: Value) -> Result<(), StoreError> {
        Err(Self::error(table))
    }

    async fn delete(&self, table: Table, _key: &RecordKey) -> Result<Option<Value>, StoreError> {
        Err(Self::error(table))
    }

    async fn query(&self, table: Table, _partition: &str) -> Result<Vec<Value>, StoreError> {
        Err(Self::error(table))
    }

    async fn scan(&self, table: Table) -> Result<Vec<Value>, StoreError> {
        Err(Self::error(table))
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(false)
    }

    fn backend_name(&self) -> &'static str {
        "unavailable"
    }
}

fn test_state() -> AppState {
    AppState {
        records: Records::new(Arc::new(MemoryStore::new())),
        cache: Arc::new(CacheManager::local(100, 60)),
        feed: FeedSettings::default(),
    }
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

async fn seed(state: &AppState, table: Table, key: RecordKey, item: Value) {
    state.records.put(table, &key, &item).await.unwrap();
}

async fn seed_user(state: &AppState, user_id: &str, name: &str) {
    seed(
        state,
        Table::Users,
        RecordKey::new(user_id),
        json!({ "UserID": user_id, "Name": name }),
    )
    .await;
}

#[actix_web::test]
async fn test_health() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_feed_without_location_is_empty() {
    let state = test_state();
    seed(
        &state,
        Table::Posts,
        RecordKey::new("p1"),
        json!({"PostID": "p1", "Latitude": 0, "Longitude": 0, "GeofenceRadius": 1000}),
    )
    .await;
    let app = init_app!(state);

    for uri in ["/api/v1/posts", "/api/v1/posts?Latitude=0", "/api/v1/posts?Latitude=abc&Longitude=0"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Posts fetched successfully");
        assert_eq!(body["posts"], json!([]));
    }
}

#[actix_web::test]
async fn test_feed_filters_orders_and_resolves_authors() {
    let state = test_state();
    seed_user(&state, "u1", "Aoife").await;

    let posts = [
        json!({"PostID": "old", "UserID": "u1", "Latitude": 0, "Longitude": 0,
               "GeofenceRadius": 1000, "CreatedAt": "2024-01-01T00:00:00Z"}),
        json!({"PostID": "new", "UserID": "ghost", "Latitude": "0", "Longitude": "0.001",
               "GeofenceRadius": "500", "CreatedAt": "2024-06-01T00:00:00Z"}),
        json!({"PostID": "named", "UserID": "u1", "Author": "Custom", "Latitude": 0,
               "Longitude": 0, "GeofenceRadius": 10, "CreatedAt": "2024-03-01T00:00:00Z"}),
        json!({"PostID": "far", "UserID": "u1", "Latitude": 1, "Longitude": 1,
               "GeofenceRadius": 1000, "CreatedAt": "2024-07-01T00:00:00Z"}),
        json!({"PostID": "broken", "Latitude": "north", "Longitude": 0, "GeofenceRadius": 1000}),
    ];
    for post in posts {
        let id = post["PostID"].as_str().unwrap().to_string();
        seed(&state, Table::Posts, RecordKey::new(id), post).await;
    }
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?Latitude=0&Longitude=0")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let posts: Vec<Post> = serde_json::from_value(body["posts"].clone()).unwrap();
    let ids: Vec<&str> = posts.iter().map(|p| p.post_id.as_str()).collect();
    assert_eq!(ids, vec!["new", "named", "old"]);

    assert_eq!(posts[0].author.as_deref(), Some("Unknown User"));
    assert_eq!(posts[1].author.as_deref(), Some("Custom"));
    assert_eq!(posts[2].author.as_deref(), Some("Aoife"));

    // Stored numeric text comes back unchanged
    assert_eq!(body["posts"][0]["GeofenceRadius"], json!("500"));
}

#[actix_web::test]
async fn test_create_get_and_delete_post() {
    let state = test_state();
    let app = init_app!(state);

    let new_post = json!({
        "UserID": "u1",
        "Content": "Anyone up for pizza?",
        "Latitude": 53.3498,
        "Longitude": -6.2603,
        "Tags": ["food"]
    });

    // Unknown author
    let req = test::TestRequest::post().uri("/api/v1/posts").set_json(&new_post).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    seed_user(&state, "u1", "Aoife").await;

    let req = test::TestRequest::post().uri("/api/v1/posts").set_json(&new_post).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let post_id = body["PostID"].as_str().unwrap().to_string();

    let req = test::TestRequest::get().uri(&format!("/api/v1/posts/{}", post_id)).to_request();
    let post: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(post["UserName"], "Aoife");
    assert_eq!(post["GeofenceRadius"], json!(500));
    assert_eq!(post["GeofenceID"], format!("post-{}", post_id));
    assert_eq!(post["Likes"], 0);

    // Someone else can't delete it
    let req = test::TestRequest::delete()
        .uri("/api/v1/posts")
        .set_json(json!({"PostID": post_id, "UserID": "u2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri("/api/v1/posts")
        .set_json(json!({"PostID": post_id, "UserID": "u1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri(&format!("/api/v1/posts/{}", post_id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_create_post_missing_fields() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts")
        .set_json(json!({"UserID": "u1", "Content": "hi"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Missing required fields");
    assert_eq!(body["status_code"], 400);
}

#[actix_web::test]
async fn test_like_post() {
    let state = test_state();
    seed(&state, Table::Posts, RecordKey::new("p1"), json!({"PostID": "p1", "Likes": 2})).await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/like")
        .set_json(json!({"PostID": "p1"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["UpdatedLikes"], 3);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/like")
        .set_json(json!({"PostID": "missing"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_comments_are_listed_per_post() {
    let state = test_state();
    let app = init_app!(state);

    for (post, content) in [("p1", "first"), ("p1", "second"), ("p2", "elsewhere")] {
        let req = test::TestRequest::post()
            .uri("/api/v1/comments")
            .set_json(json!({"PostID": post, "UserID": "u1", "Content": content}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/v1/posts/p1/comments").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["Content"], "first");
    assert_eq!(comments[1]["Content"], "second");
}

#[actix_web::test]
async fn test_user_lifecycle() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/users")
        .set_json(json!({"sub": "u1", "name": "Aoife", "custom:College": "UCD"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"]["UserID"], "u1");
    assert_eq!(body["user"]["Email"], "Unknown");

    // Unknown fields are rejected
    let req = test::TestRequest::put()
        .uri("/api/v1/users")
        .set_json(json!({"UserID": "u1", "IsAdmin": true}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri("/api/v1/users")
        .set_json(json!({"UserID": "u1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "No fields provided to update");

    let req = test::TestRequest::put()
        .uri("/api/v1/users")
        .set_json(json!({"UserID": "u1", "Bio": "Final year", "DoNotDisturb": true}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["UpdatedItem"]["Bio"], "Final year");
    assert_eq!(body["UpdatedItem"]["College"], "UCD");

    let req = test::TestRequest::get().uri("/api/v1/users/u1").to_request();
    let user: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(user["DoNotDisturb"], true);

    let req = test::TestRequest::delete().uri("/api/v1/users/u1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/v1/users/u1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_renamed_author_shows_in_feed() {
    let state = test_state();
    seed_user(&state, "u1", "Aoife").await;
    seed(
        &state,
        Table::Posts,
        RecordKey::new("p1"),
        json!({"PostID": "p1", "UserID": "u1", "Latitude": 0, "Longitude": 0, "GeofenceRadius": 100}),
    )
    .await;
    let app = init_app!(state);

    let feed = || test::TestRequest::get().uri("/api/v1/posts?Latitude=0&Longitude=0").to_request();

    let body: Value = test::call_and_read_body_json(&app, feed()).await;
    assert_eq!(body["posts"][0]["Author"], "Aoife");

    let req = test::TestRequest::put()
        .uri("/api/v1/users")
        .set_json(json!({"UserID": "u1", "Name": "Aoife M"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::call_and_read_body_json(&app, feed()).await;
    assert_eq!(body["posts"][0]["Author"], "Aoife M");
}

#[actix_web::test]
async fn test_household_and_tasks() {
    let state = test_state();
    seed_user(&state, "u1", "Aoife").await;
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/households")
        .set_json(json!({"HouseholdName": "Flat 4", "UserID": "u1"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let household_id = body["HouseholdID"].as_str().unwrap().to_string();
    assert_eq!(body["JoinCode"].as_str().unwrap().len(), 6);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/households/users?HouseholdID={}", household_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["users"][0]["UserID"], "u1");

    // No tasks yet
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tasks?HouseholdID={}", household_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .set_json(json!({"HouseholdID": household_id, "Title": "Bins", "AssignedTo": "u1"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let task_id = body["task"]["TaskID"].as_str().unwrap().to_string();
    assert_eq!(body["task"]["Completed"], false);

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/tasks/{}", task_id))
        .set_json(json!({"HouseholdID": household_id, "Title": "Bins", "Completed": true}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["tasks"][0]["Completed"], true);

    let req = test::TestRequest::put()
        .uri("/api/v1/tasks/nope")
        .set_json(json!({"HouseholdID": household_id, "Title": "Bins"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/tasks/{}?HouseholdID={}", task_id, household_id))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["tasks"], json!([]));
}

#[actix_web::test]
async fn test_task_for_missing_household() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/tasks")
        .set_json(json!({"HouseholdID": "nope", "Title": "Bins"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_shopping_lists() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/shopping-lists?HouseholdID=h1")
        .set_json(json!({"Title": "Weekly", "Products": [{"Name": "Milk"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let list: Value = test::read_body_json(resp).await;
    let list_id = list["ListID"].as_str().unwrap().to_string();
    assert!(list["Products"][0]["ProductID"].is_string());

    let req = test::TestRequest::get().uri("/api/v1/shopping-lists?HouseholdID=h1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["shoppingLists"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::get().uri("/api/v1/shopping-lists").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/shopping-lists/{}?HouseholdID=h1", list_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/shopping-lists/{}?HouseholdID=h1", list_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_bill_splits() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/bills")
        .set_json(json!({
            "HouseholdID": "h1",
            "Title": "Electricity",
            "TotalAmount": "100",
            "Members": ["a", "b", "c"],
            "PaidMembers": ["a"]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bill: Value = test::read_body_json(resp).await;
    let bill_id = bill["BillID"].as_str().unwrap().to_string();

    let splits = bill["Splits"].as_array().unwrap();
    assert_eq!(splits.len(), 3);
    assert_eq!(splits[0]["Share"], json!(33.33));
    assert_eq!(splits[0]["Paid"], true);
    assert_eq!(splits[1]["Paid"], false);

    // Membership survives an update that omits it
    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/bills/{}?HouseholdID=h1", bill_id))
        .set_json(json!({"Title": "Electricity (Jan)", "TotalAmount": 100}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["Members"], json!(["a", "b", "c"]));
    assert_eq!(body["PaidMembers"], json!(["a"]));

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/bills/{}?HouseholdID=h1", bill_id))
        .set_json(json!({"Splits": [{"UserID": "a", "Share": "lots"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid Share value in splits");

    let req = test::TestRequest::post()
        .uri("/api/v1/bills?HouseholdID=h1")
        .set_json(json!({"TotalAmount": "a hundred"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_notices() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/notices")
        .set_json(json!({"HouseholdID": "h1", "Title": "Party", "Content": "Saturday"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let notice: Value = test::read_body_json(resp).await;
    let notice_id = notice["NoticeID"].as_str().unwrap().to_string();
    let created_at = notice["CreatedAt"].as_str().unwrap().to_string();
    assert!(created_at.ends_with('Z'));

    let req = test::TestRequest::put()
        .uri(&format!("/api/v1/notices/{}?HouseholdID=h1", notice_id))
        .set_json(json!({"Title": "Party moved", "Content": "Sunday"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["CreatedAt"], created_at);

    let req = test::TestRequest::put()
        .uri("/api/v1/notices/missing?HouseholdID=h1")
        .set_json(json!({"Title": "?"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/notices/{}?HouseholdID=h1", notice_id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::get().uri("/api/v1/notices?HouseholdID=h1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["notices"], json!([]));
}

#[actix_web::test]
async fn test_reservation_ownership_and_approval() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/reservations?HouseholdID=h1")
        .set_json(json!({"SpaceName": "Living room", "ReservedBy": "u1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let reservation: Value = test::read_body_json(resp).await;
    let id = reservation["ReservationID"].as_str().unwrap().to_string();
    assert_eq!(reservation["ApprovalStatus"], "Pending");
    assert_eq!(reservation["Approvers"], json!([]));

    let uri = format!("/api/v1/reservations/{}?HouseholdID=h1", id);

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({"SpaceName": "Kitchen", "ReservedBy": "u1"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({"RequestUserID": "u2", "SpaceName": "Kitchen"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    for reviewer in ["u2", "u2", "u3"] {
        let req = test::TestRequest::patch()
            .uri(&format!("/api/v1/reservations/{}/approve?HouseholdID=h1", id))
            .set_json(json!({"Action": "Approve", "UserID": reviewer}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/reservations/{}/approve?HouseholdID=h1", id))
        .set_json(json!({"Action": "Maybe", "UserID": "u2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Owner edit keeps the approval state
    let req = test::TestRequest::put()
        .uri(&uri)
        .set_json(json!({"RequestUserID": "u1", "SpaceName": "Kitchen", "ReservedBy": "u1"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["ApprovalStatus"], "Approved");
    assert_eq!(body["Approvers"], json!(["u2", "u3"]));
    assert!(body.get("RequestUserID").is_none());

    let req = test::TestRequest::delete()
        .uri(&format!("{}&UserID=u2", uri))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("{}&UserID=u1", uri))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_malformed_json_is_a_json_error() {
    let state = test_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/v1/comments")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_json");
}

#[actix_web::test]
async fn test_feed_keeps_posts_with_odd_optional_attributes() {
    let state = test_state();
    let posts = [
        json!({"PostID": "ok", "Latitude": 0, "Longitude": 0, "GeofenceRadius": 100}),
        json!({"PostID": "nulltags", "Latitude": 0, "Longitude": 0, "GeofenceRadius": 100,
               "Tags": null}),
        json!({"PostID": "floatlikes", "Latitude": 0, "Longitude": 0, "GeofenceRadius": 100,
               "Likes": 2.0}),
    ];
    for post in posts {
        let id = post["PostID"].as_str().unwrap().to_string();
        seed(&state, Table::Posts, RecordKey::new(id), post).await;
    }
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?Latitude=0&Longitude=0")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let mut ids: Vec<&str> = body["posts"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["PostID"].as_str().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["floatlikes", "nulltags", "ok"]);

    let req = test::TestRequest::post()
        .uri("/api/v1/posts/like")
        .set_json(json!({"PostID": "floatlikes"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["UpdatedLikes"], 3);
}

#[actix_web::test]
async fn test_feed_with_infinite_radius() {
    let state = test_state();
    seed(
        &state,
        Table::Posts,
        RecordKey::new("everywhere"),
        json!({"PostID": "everywhere", "Latitude": 0, "Longitude": 0, "GeofenceRadius": "Infinity"}),
    )
    .await;
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?Latitude=10&Longitude=10")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["posts"][0]["PostID"], "everywhere");
}

#[actix_web::test]
async fn test_huge_exponent_amount_is_rejected_quickly() {
    let state = test_state();
    let app = init_app!(state);
    let started = Instant::now();

    let req = test::TestRequest::post()
        .uri("/api/v1/bills")
        .set_json(json!({"HouseholdID": "h1", "TotalAmount": "1e2000000000", "Members": ["a"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::post()
        .uri("/api/v1/bills")
        .set_json(json!({"HouseholdID": "h1", "TotalAmount": "0e2000000000", "Members": ["a"]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bill: Value = test::read_body_json(resp).await;
    assert!(bill.get("Splits").map_or(true, Value::is_null));

    assert!(started.elapsed() < Duration::from_secs(1));
}

#[actix_web::test]
async fn test_delete_user_with_odd_attribute_types() {
    let state = test_state();
    seed(
        &state,
        Table::Users,
        RecordKey::new("u9"),
        json!({"UserID": "u9", "Name": 42, "DoNotDisturb": "yes"}),
    )
    .await;
    let app = init_app!(state);

    let req = test::TestRequest::delete().uri("/api/v1/users/u9").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["DeletedItem"]["Name"], 42);

    let remaining: Option<Value> = state.records.get(Table::Users, &RecordKey::new("u9")).await.unwrap();
    assert!(remaining.is_none());
}

#[actix_web::test]
async fn test_store_failure_is_internal_error() {
    let state = AppState {
        records: Records::new(Arc::new(UnavailableStore)),
        ..test_state()
    };
    let app = init_app!(state);

    let req = test::TestRequest::get()
        .uri("/api/v1/posts?Latitude=0&Longitude=0")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Error fetching posts");
    assert_eq!(body["status_code"], 500);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("connection refused")));
}

#[actix_web::test]
async fn test_cors_allows_any_origin() {
    let state = test_state();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(cors())
            .configure(configure_routes),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/health")
        .insert_header(("Origin", "https://flat.example"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
