// ABOUTME: HTTP tests for measurements, workouts, meals, progress photos, and health probes
// ABOUTME: Exercises CRUD, aggregation endpoints, and multipart uploads end to end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 EvoFit Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use async_trait::async_trait;
use axum::http::StatusCode;
use axum::Router;
use common::{access_token, create_test_resources, create_test_user, test_router};
use evofit_server::errors::AppResult;
use evofit_server::models::PhotoType;
use evofit_server::resources::ServerResources;
use evofit_server::services::photo_storage::{PhotoStorage, PhotoUpload, StoredPhoto};
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

async fn setup(email: &str) -> (Router, String) {
    let resources = create_test_resources().await.unwrap();
    let user = create_test_user(&resources.database, email).await.unwrap();
    let token = access_token(&resources, &user);
    (test_router(&resources), token)
}

async fn post_json(app: &Router, token: &str, uri: &str, body: &Value) -> Value {
    AxumTestRequest::post(uri)
        .bearer(token)
        .json(body)
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json()
}

async fn get_json(app: &Router, token: &str, uri: &str) -> Value {
    AxumTestRequest::get(uri)
        .bearer(token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let resources = create_test_resources().await.unwrap();
    let app = test_router(&resources);

    let root: Value = AxumTestRequest::get("/")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(root["health"], "/health");

    let health: Value = AxumTestRequest::get("/health")
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(health["status"], "healthy");

    let ready: Value = AxumTestRequest::get("/ready")
        .send(app)
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(ready["status"], "ready");
}

// ============================================================================
// Measurements
// ============================================================================

#[tokio::test]
async fn test_measurement_lifecycle() {
    let (app, token) = setup("measure@example.com").await;

    let missing: Value = AxumTestRequest::get("/v1/measurements/latest")
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND)
        .json();
    assert_eq!(missing["error"]["message"], "Measurement not found");

    let first = post_json(
        &app,
        &token,
        "/v1/measurements",
        &json!({ "measurement_date": "2024-05-01", "weight_kg": 81.0, "waist_cm": 86.5 }),
    )
    .await;
    assert_eq!(first["bmi"], 25.0);
    assert_eq!(first["waist_cm"], 86.5);

    post_json(
        &app,
        &token,
        "/v1/measurements",
        &json!({ "measurement_date": "2024-05-20", "weight_kg": 80.2, "body_fat_percentage": 18.5 }),
    )
    .await;

    let latest = get_json(&app, &token, "/v1/measurements/latest").await;
    assert_eq!(latest["measurement_date"], "2024-05-20");

    let listed = get_json(&app, &token, "/v1/measurements?start_date=2024-05-10").await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let id = first["id"].as_str().unwrap();
    let updated: Value = AxumTestRequest::put(&format!("/v1/measurements/{id}"))
        .bearer(&token)
        .json(&json!({ "notes": "morning, fasted" }))
        .send(app.clone())
        .await
        .assert_status(StatusCode::OK)
        .json();
    assert_eq!(updated["notes"], "morning, fasted");
    assert_eq!(updated["weight_kg"], 81.0);

    AxumTestRequest::delete(&format!("/v1/measurements/{id}"))
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    AxumTestRequest::get(&format!("/v1/measurements/{id}"))
        .bearer(&token)
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_measurement_out_of_range_rejected() {
    let (app, token) = setup("range@example.com").await;

    AxumTestRequest::post("/v1/measurements")
        .bearer(&token)
        .json(&json!({ "measurement_date": "2024-05-01", "weight_kg": 5.0 }))
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

// ============================================================================
// Workouts
// ============================================================================

#[tokio::test]
async fn test_workout_with_exercises_and_stats() {
    let (app, token) = setup("lift@example.com").await;

    let workout = post_json(
        &app,
        &token,
        "/v1/workouts",
        &json!({
            "workout_date": "2024-06-01",
            "workout_type": "strength",
            "duration_minutes": 60,
            "calories_burned": 400,
            "intensity": "high",
            "exercises": [
                { "exercise_name": "Deadlift", "sets": 3, "reps": 5, "weight_kg": 140.0, "order_index": 2 },
                { "exercise_name": "Squat", "exercise_type": "compound", "sets": 5, "reps": 5, "order_index": 1 }
            ]
        }),
    )
    .await;
    let exercises = workout["exercises"].as_array().unwrap();
    assert_eq!(exercises.len(), 2);
    assert_eq!(exercises[0]["exercise_name"], "Squat");

    post_json(
        &app,
        &token,
        "/v1/workouts",
        &json!({ "workout_date": "2024-06-03", "workout_type": "cardio", "duration_minutes": 30 }),
    )
    .await;

    let id = workout["id"].as_str().unwrap();
    let fetched = get_json(&app, &token, &format!("/v1/workouts/{id}")).await;
    assert_eq!(fetched["exercises"][1]["exercise_name"], "Deadlift");

    let stats = get_json(&app, &token, "/v1/workouts/stats").await;
    assert_eq!(stats["total_workouts"], 2);
    assert_eq!(stats["total_duration_minutes"], 90);
    assert_eq!(stats["total_calories_burned"], 400);
    assert_eq!(stats["workout_types"]["strength"], 1);
    assert_eq!(stats["average_duration"], 45.0);

    let windowed = get_json(&app, &token, "/v1/workouts/stats?start_date=2024-06-02").await;
    assert_eq!(windowed["total_workouts"], 1);

    AxumTestRequest::get("/v1/workouts/stats?start_date=2024-06-05&end_date=2024-06-01")
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    AxumTestRequest::delete(&format!("/v1/workouts/{id}"))
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let remaining = get_json(&app, &token, "/v1/workouts").await;
    assert_eq!(remaining.as_array().unwrap().len(), 1);
}

// ============================================================================
// Meals
// ============================================================================

#[tokio::test]
async fn test_meal_daily_and_stats() {
    let (app, token) = setup("eat@example.com").await;

    for body in [
        json!({ "meal_date": "2024-06-10", "meal_type": "breakfast", "meal_time": "07:30:00", "calories": 450, "protein_g": 30.0 }),
        json!({ "meal_date": "2024-06-10", "meal_type": "lunch", "meal_time": "12:30:00", "calories": 700, "protein_g": 45.5 }),
        json!({ "meal_date": "2024-06-11", "meal_type": "dinner", "calories": 850, "protein_g": 50.0 }),
    ] {
        post_json(&app, &token, "/v1/meals", &body).await;
    }

    let daily = get_json(&app, &token, "/v1/meals/daily/2024-06-10").await;
    assert_eq!(daily["total_calories"], 1150);
    assert_eq!(daily["total_protein_g"], 75.5);
    assert_eq!(daily["total_meals"], 2);
    assert_eq!(daily["meal_breakdown"]["lunch"], 700);

    let empty = get_json(&app, &token, "/v1/meals/daily/2024-01-01").await;
    assert_eq!(empty["total_meals"], 0);

    AxumTestRequest::get("/v1/meals/daily/june-tenth")
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let stats = get_json(
        &app,
        &token,
        "/v1/meals/stats?start_date=2024-06-10&end_date=2024-06-13",
    )
    .await;
    assert_eq!(stats["period"]["num_days"], 4);
    assert_eq!(stats["totals"]["total_calories"], 2000);
    assert_eq!(stats["averages"]["avg_calories_per_day"], 500.0);
    assert_eq!(stats["averages"]["avg_meals_per_day"], 0.75);

    AxumTestRequest::get("/v1/meals/stats?start_date=2024-06-13&end_date=2024-06-10")
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let lunches = get_json(&app, &token, "/v1/meals?meal_type=lunch").await;
    assert_eq!(lunches.as_array().unwrap().len(), 1);
}

// ============================================================================
// Progress photos
// ============================================================================

async fn upload_photo(app: &Router, token: &str, photo_date: &str, photo_type: &str) -> Value {
    AxumTestRequest::post("/v1/progress-photos")
        .bearer(token)
        .multipart(
            &[
                ("photo_date", photo_date),
                ("photo_type", photo_type),
                ("weight_at_photo_kg", "82"),
            ],
            Some(("front.png", "image/png", PNG_BYTES)),
        )
        .send(app.clone())
        .await
        .assert_status(StatusCode::CREATED)
        .json()
}

#[tokio::test]
async fn test_photo_upload_and_comparison() {
    let (app, token) = setup("photo@example.com").await;

    let first = upload_photo(&app, &token, "2024-01-05", "front").await;
    assert!(first["photo_url"].as_str().unwrap().ends_with(".png"));
    assert_eq!(first["weight_at_photo_kg"], 82);
    upload_photo(&app, &token, "2024-03-05", "front").await;
    upload_photo(&app, &token, "2024-05-05", "front").await;
    upload_photo(&app, &token, "2024-04-01", "side").await;

    let comparison = get_json(
        &app,
        &token,
        "/v1/progress-photos/comparison?start_date=2024-01-01&end_date=2024-04-30",
    )
    .await;
    assert_eq!(comparison["photo_type"], "front");
    assert_eq!(comparison["before"]["photo_date"], "2024-01-05");
    assert_eq!(comparison["after"]["photo_date"], "2024-03-05");
    assert_eq!(comparison["period"]["end_date"], "2024-04-30");

    let none = get_json(
        &app,
        &token,
        "/v1/progress-photos/comparison?start_date=2023-01-01&end_date=2023-12-31&photo_type=back",
    )
    .await;
    assert!(none["before"].is_null());
    assert!(none["after"].is_null());

    let sides = get_json(&app, &token, "/v1/progress-photos?photo_type=side").await;
    assert_eq!(sides.as_array().unwrap().len(), 1);

    let id = first["id"].as_str().unwrap();
    AxumTestRequest::delete(&format!("/v1/progress-photos/{id}"))
        .bearer(&token)
        .send(app.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);
    AxumTestRequest::get(&format!("/v1/progress-photos/{id}"))
        .bearer(&token)
        .send(app)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_photo_upload_rejections() {
    let (app, token) = setup("reject@example.com").await;

    let wrong_type: Value = AxumTestRequest::post("/v1/progress-photos")
        .bearer(&token)
        .multipart(
            &[("photo_date", "2024-01-05"), ("photo_type", "front")],
            Some(("notes.pdf", "application/pdf", b"%PDF-1.4")),
        )
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(
        wrong_type["error"]["message"],
        "Invalid file type. Allowed: image/jpeg, image/jpg, image/png, image/webp"
    );

    let no_file: Value = AxumTestRequest::post("/v1/progress-photos")
        .bearer(&token)
        .multipart(&[("photo_date", "2024-01-05"), ("photo_type", "front")], None)
        .send(app.clone())
        .await
        .assert_status(StatusCode::BAD_REQUEST)
        .json();
    assert_eq!(no_file["error"]["message"], "file is required");

    AxumTestRequest::post("/v1/progress-photos")
        .bearer(&token)
        .multipart(
            &[("photo_date", "2024-01-05"), ("photo_type", "sideways")],
            Some(("a.png", "image/png", PNG_BYTES)),
        )
        .send(app)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

/// Backend that produces thumbnails, standing in for a real media store
struct ThumbnailingStorage;

#[async_trait]
impl PhotoStorage for ThumbnailingStorage {
    async fn store(
        &self,
        user_id: Uuid,
        photo_type: PhotoType,
        upload: PhotoUpload,
    ) -> AppResult<StoredPhoto> {
        Ok(StoredPhoto {
            photo_url: format!("https://media.test/{user_id}/{photo_type}/{}", upload.data.len()),
            thumbnail_url: Some(format!("https://media.test/{user_id}/{photo_type}/thumb")),
        })
    }
}

#[tokio::test]
async fn test_photo_storage_backend_is_pluggable() {
    let base = create_test_resources().await.unwrap();
    let resources = Arc::new(
        ServerResources::clone(&base).with_photo_storage(Arc::new(ThumbnailingStorage)),
    );
    let user = create_test_user(&resources.database, "media@example.com")
        .await
        .unwrap();
    let token = access_token(&resources, &user);

    let photo = upload_photo(&test_router(&resources), &token, "2024-02-02", "back").await;
    assert_eq!(
        photo["photo_url"],
        format!("https://media.test/{}/back/{}", user.id, PNG_BYTES.len())
    );
    assert_eq!(
        photo["thumbnail_url"],
        format!("https://media.test/{}/back/thumb", user.id)
    );
}
