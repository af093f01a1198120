use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use jobmatch::{router, sample_jobs, AppState, ArtifactBundle, DEFAULT_MAX_FEATURES, DEFAULT_TOP_K};

fn ready_app() -> Router {
    let bundle = ArtifactBundle::build(sample_jobs(), DEFAULT_MAX_FEATURES).expect("build");
    router(AppState::ready(bundle, DEFAULT_TOP_K))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("router response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn post_recommend(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/recommend")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).expect("request")
}

fn job_ids(body: &Value) -> Vec<String> {
    body["recommendations"]
        .as_array()
        .expect("recommendations array")
        .iter()
        .map(|rec| rec["job_id"].as_str().expect("job_id").to_string())
        .collect()
}

#[tokio::test]
async fn status_reports_model_presence() {
    let (code, body) = send(ready_app(), get("/")).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body, json!({"status": "jobmatch recommend api", "has_model": true}));

    let (_, body) = send(router(AppState::unready(DEFAULT_TOP_K)), get("/")).await;
    assert_eq!(body["has_model"], json!(false));
}

#[tokio::test]
async fn healthz_is_ok() {
    let (code, _) = send(ready_app(), get("/healthz")).await;
    assert_eq!(code, StatusCode::OK);
}

#[tokio::test]
async fn python_django_profile_ranks_backend_first() {
    let (code, body) = send(
        ready_app(),
        post_recommend(json!({"skills": ["python", "django"]})),
    )
    .await;
    assert_eq!(code, StatusCode::OK);
    let recs = body["recommendations"].as_array().expect("array");
    assert_eq!(recs.len(), 5);
    assert_eq!(recs[0]["job_id"], json!("j1"));
    assert_eq!(recs[0]["title"], json!("Backend Developer"));
    assert_eq!(recs[0]["skills_required"], json!(["python", "django", "rest"]));
    assert!(recs[0]["score"].as_f64().expect("score") > 0.0);
}

#[tokio::test]
async fn out_of_vocabulary_profile_keeps_stored_order() {
    let (_, body) = send(
        ready_app(),
        post_recommend(json!({"skills": ["xyznonexistentterm"]})),
    )
    .await;
    assert_eq!(job_ids(&body), ["j1", "j2", "j3", "j4", "j5"]);
    let all_zero = body["recommendations"]
        .as_array()
        .expect("array")
        .iter()
        .all(|rec| rec["score"].as_f64() == Some(0.0));
    assert!(all_zero);
}

#[tokio::test]
async fn empty_body_object_uses_defaults() {
    let (code, body) = send(ready_app(), post_recommend(json!({}))).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(job_ids(&body).len(), 5);
}

#[tokio::test]
async fn unready_service_returns_error_payload() {
    let app = router(AppState::unready(DEFAULT_TOP_K));
    let (code, body) = send(app, post_recommend(json!({"skills": ["python"]}))).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(body, json!({"error": "Model not prepared. Run model_builder."}));
}

#[tokio::test]
async fn negative_experience_is_rejected() {
    let (code, body) = send(
        ready_app(),
        post_recommend(json!({"skills": ["python"], "experience_years": -2})),
    )
    .await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().expect("message").contains("experience_years"));
}

#[tokio::test]
async fn wrong_field_type_is_rejected() {
    let (code, _) = send(
        ready_app(),
        post_recommend(json!({"skills": "python"})),
    )
    .await;
    assert!(code.is_client_error());
}

#[tokio::test]
async fn reloaded_bundle_gives_identical_results() {
    let dir = TempDir::new().expect("tempdir");
    let bundle = ArtifactBundle::build(sample_jobs(), DEFAULT_MAX_FEATURES).expect("build");
    bundle.save(dir.path()).expect("save");

    let profile = json!({
        "skills": ["react", "node"],
        "education": "BSc Computer Science",
        "experience_years": 4,
        "location": "Remote"
    });
    let (_, fresh) = send(ready_app(), post_recommend(profile.clone())).await;
    let reloaded = router(AppState::load(dir.path(), DEFAULT_TOP_K));
    let (_, loaded) = send(reloaded, post_recommend(profile)).await;
    assert_eq!(fresh, loaded);
}

#[tokio::test]
async fn missing_model_dir_loads_unready() {
    let dir = TempDir::new().expect("tempdir");
    let state = AppState::load(&dir.path().join("absent"), DEFAULT_TOP_K);
    assert!(!state.has_model());
}

#[tokio::test]
async fn concurrent_requests_match_sequential_results() {
    let app = ready_app();
    let profiles = [
        json!({"skills": ["python", "django"]}),
        json!({"skills": ["docker", "kubernetes"], "location": "aws"}),
        json!({"skills": ["react"], "education": "javascript"}),
        json!({"skills": ["nlp", "ml"]}),
    ];

    let mut expected = Vec::new();
    for profile in &profiles {
        let (_, body) = send(app.clone(), post_recommend(profile.clone())).await;
        expected.push(body);
    }

    let handles: Vec<_> = profiles
        .iter()
        .cycle()
        .take(profiles.len() * 4)
        .cloned()
        .map(|profile| {
            let app = app.clone();
            tokio::spawn(async move { send(app, post_recommend(profile)).await.1 })
        })
        .collect();
    for (idx, handle) in handles.into_iter().enumerate() {
        let body = handle.await.expect("task joined");
        assert_eq!(body, expected[idx % profiles.len()]);
    }
}

#[tokio::test]
async fn zero_top_k_still_returns_best_match() {
    let bundle = ArtifactBundle::build(sample_jobs(), DEFAULT_MAX_FEATURES).expect("build");
    let app = router(AppState::ready(bundle, 0));
    let (code, body) = send(app, post_recommend(json!({"skills": ["python", "django"]}))).await;
    assert_eq!(code, StatusCode::OK);
    assert_eq!(job_ids(&body), vec!["j1".to_string()]);
}
