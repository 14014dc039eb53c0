mod common;

use common::TestApp;
use http::StatusCode;
use serde_json::json;
use shared::models::Role;

async fn seed_catalog(app: &TestApp) {
    app.seed("mentors", "m1", json!({"name": "Guru Anand", "title": "Lead"})).await;
    app.seed(
        "courses",
        "c1",
        json!({"title": "Pranayama", "students": 40, "level": 1, "mentorId": "m1",
               "startDate": "2025-03-01T00:00:00.000Z", "endDate": "2025-06-01T00:00:00.000Z"}),
    )
    .await;
    app.seed(
        "courses",
        "c2",
        json!({"title": "Asana Basics", "students": 90, "level": 1,
               "startDate": "2025-02-01T00:00:00.000Z", "endDate": "2025-05-01T00:00:00.000Z"}),
    )
    .await;
    app.seed(
        "courses",
        "c3",
        json!({"title": "Advanced Flow", "students": 5, "level": 3,
               "startDate": "2025-01-01T00:00:00.000Z"}),
    )
    .await;
}

#[tokio::test]
async fn test_popular_orders_by_students() {
    let app = TestApp::new();
    seed_catalog(&app).await;

    let (status, res) = app.get("/api/courses/popular", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = res["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["c2", "c1", "c3"]);
    assert_eq!(res["data"][1]["mentor"]["name"], "Guru Anand");
}

#[tokio::test]
async fn test_by_level() {
    let app = TestApp::new();
    seed_catalog(&app).await;

    let (status, res) = app.get("/api/courses/by-level?level=1", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = res["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], "c2");

    for uri in ["/api/courses/by-level", "/api/courses/by-level?level=4"] {
        let (status, res) = app.get(uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(res["error"], "Valid level (1, 2, or 3) is required");
    }
}

#[tokio::test]
async fn test_course_detail_and_aliases() {
    let app = TestApp::new();
    seed_catalog(&app).await;

    let (status, res) = app.get("/api/courses/c1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["data"]["title"], "Pranayama");
    assert_eq!(res["data"]["trainerName"], "Guru Anand");

    let (status, res) = app.get("/api/course/c2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["data"]["title"], "Asana Basics");

    let (status, res) = app.get("/api/courses/missing", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(res["error"], "Course not found");
}

#[tokio::test]
async fn test_lessons_and_reviews() {
    let app = TestApp::new();
    app.seed("lessons", "l2", json!({"courseId": "c1", "title": "Two", "order": 2})).await;
    app.seed("lessons", "l1", json!({"courseId": "c1", "title": "One", "order": 1})).await;
    app.seed("lessons", "lx", json!({"courseId": "c9", "title": "Other", "order": 0})).await;
    app.seed(
        "reviews",
        "r1",
        json!({"courseId": "c1", "userId": "u1", "rating": 5, "createdAt": "2025-01-02T00:00:00.000Z"}),
    )
    .await;

    let (_, res) = app.get("/api/courses/c1/lessons", None).await;
    let titles: Vec<&str> = res["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["One", "Two"]);

    let (_, res) = app.get("/api/courses/c1/reviews", None).await;
    assert_eq!(res["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_catalog_listings() {
    let app = TestApp::new();
    app.seed("categories", "k2", json!({"name": "Yoga"})).await;
    app.seed("categories", "k1", json!({"name": "Ayurveda"})).await;
    app.seed("promotes", "p1", json!({"title": "Live", "isActive": true, "expiryDate": "2025-12-01"})).await;
    app.seed("promotes", "p2", json!({"title": "Old", "isActive": false, "expiryDate": "2024-12-01"})).await;

    let (status, res) = app.get("/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["data"][0]["name"], "Ayurveda");

    let (_, res) = app.get("/api/promote", None).await;
    let data = res["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], "p1");

    let (status, res) = app.get("/api/mentors", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(res["data"], json!([]));
}

#[tokio::test]
async fn test_create_course_requires_admin() {
    let app = TestApp::new();
    let student = app.sign_in("s1", Role::Student).await;
    let admin = app.sign_in("a1", Role::Admin).await;
    let body = json!({
        "title": "Meditation",
        "description": "Daily practice",
        "level": 2,
        "price": 499.0,
        "duration": 30,
        "startDate": "2025-04-01T00:00:00.000Z",
        "endDate": "2025-05-01T00:00:00.000Z",
    });

    let (status, _) = app.post("/api/courses/create", None, body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, res) = app.post("/api/courses/create", Some(&student), body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(res["error"], "Only admins can create courses");

    let (status, res) = app.post("/api/courses/create", Some(&admin), body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(res["message"], json!(["Course created successfully"]));
    assert_eq!(res["data"]["level"], 2);
    assert_eq!(res["data"]["adminId"], "a1");

    let (status, res) = app
        .post("/api/courses/create", Some(&admin), json!({"title": "Half"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["error"], "Missing required fields");
}

#[tokio::test]
async fn test_enroll_creates_room_and_rejects_duplicates() {
    let app = TestApp::new();
    seed_catalog(&app).await;
    let token = app.sign_in("s1", Role::Student).await;

    let (status, res) = app
        .post("/api/courses/enroll", Some(&token), json!({"courseId": "c1"}))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(res["message"], json!(["Enrolled successfully"]));
    assert_eq!(res["data"]["paymentStatus"], "pending");
    assert_eq!(res["data"]["status"], "active");
    let room_id = res["data"]["chatRoomId"].as_str().unwrap().to_string();
    assert!(room_id.starts_with("chat_c1_"));
    assert_eq!(app.store.count("chatRooms").await, 1);

    let (status, res) = app
        .post("/api/courses/enroll", Some(&token), json!({"courseId": "c1"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["error"], "User is already enrolled in this course");

    let (status, res) = app
        .post("/api/courses/enroll", Some(&token), json!({"courseId": "nope"}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["error"], "Course not found");

    let (status, res) = app.post("/api/courses/enroll", Some(&token), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["error"], "Course ID is required");
}

#[tokio::test]
async fn test_malformed_json_body() {
    let app = TestApp::new();
    let token = app.sign_in("s1", Role::Student).await;
    let request = http::Request::builder()
        .method("POST")
        .uri("/api/courses/enroll")
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let (status, res) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(res["error"], "Invalid request body. Expected JSON.");
}
