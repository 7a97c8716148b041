// Integration tests for Cofounder Algo

use actix_web::{http::StatusCode, test, web, App};
use cofounder_algo::core::Matcher;
use cofounder_algo::models::{MatchReport, RawProfile, WeightConfig};
use cofounder_algo::routes::{self, matches::AppState};
use cofounder_algo::services::{InMemoryProfiles, MatchDefaults, MatchOutcome, MatchService};
use serde_json::{json, Value};
use std::sync::Arc;

fn create_raw_profile(
    id: &str,
    skills: &str,
    interests: &str,
    industries: &str,
    goals: &str,
    level: &str,
) -> RawProfile {
    RawProfile {
        id: id.to_string(),
        name: Some(format!("User {}", id)),
        skills: json!(skills),
        skill_categories: json!(r#"{"Technical": ["Python"]}"#),
        interests: json!(interests),
        startup_industries: json!(industries),
        startup_goals: json!(goals),
        experience_level: Some(level.to_string()),
    }
}

/// Three founders; the expected scores follow from the five-factor formula.
fn create_population() -> Vec<RawProfile> {
    vec![
        create_raw_profile(
            "1",
            "Python, Marketing",
            "AI, VR",
            "FinTech",
            "Secure Series A Funding, Achieve $1M ARR",
            "Senior",
        ),
        create_raw_profile("2", "Sales, Design", "AI", "FinTech, SaaS", "Secure Series A Funding", "Mid-level"),
        create_raw_profile("3", "Python, Marketing", "Gaming", "EdTech", "", ""),
    ]
}

fn create_service() -> MatchService<InMemoryProfiles> {
    MatchService::new(
        InMemoryProfiles::new(create_population()),
        Matcher::default(),
        MatchDefaults::default(),
    )
}

fn expect_report(outcome: MatchOutcome) -> MatchReport {
    match outcome {
        MatchOutcome::Found(report) => report,
        MatchOutcome::NotFound { target_id } => panic!("target {} not found", target_id),
    }
}

#[::core::prelude::v1::test]
fn test_integration_end_to_end_matching() {
    let service = create_service();

    let report = expect_report(tokio_test::block_on(service.compute_matches("1", None, None)).unwrap());

    // Candidate 2:
    //   skills (4 - 0) / 4 = 1.0          * 0.30 = 0.30
    //   interests 1 / 2 = 0.5             * 0.20 = 0.10
    //   industries 1 / 2 = 0.5            * 0.15 = 0.075
    //   goals 1 / ((2 + 1) / 2) = 2/3     * 0.25 = 0.1667
    //   experience 1 - 1/2 = 0.5          * 0.10 = 0.05
    // Candidate 3: identical skills, nothing shared, unknown level = 0
    let expected_2 = 0.30 + 0.10 + 0.075 + 0.25 * (2.0 / 3.0) + 0.05;

    assert_eq!(report.target.id, "1");
    assert_eq!(report.population_size, 3);
    assert!(report.complete);
    assert_eq!(report.matches.len(), 2);
    assert_eq!(report.matches[0].id, "2");
    assert!((report.matches[0].score - expected_2).abs() < 1e-9);
    assert_eq!(report.matches[1].id, "3");
    assert_eq!(report.matches[1].score, 0.0);
}

#[::core::prelude::v1::test]
fn test_custom_weights_change_ranking() {
    let service = create_service();
    // Only experience counts
    let weights = WeightConfig {
        skill_complementarity: 0.0,
        shared_interests: 0.0,
        shared_industries: 0.0,
        goal_alignment: 0.0,
        experience_compatibility: 1.0,
    };

    let report = expect_report(tokio_test::block_on(service.compute_matches("2", Some(weights), None)).unwrap());

    // From 2 (Mid-level): 1 is Senior (0.5), 3 is unknown (0.0)
    assert_eq!(report.matches[0].id, "1");
    assert_eq!(report.matches[0].score, 0.5);
    assert_eq!(report.matches[1].score, 0.0);
}

#[::core::prelude::v1::test]
fn test_zero_top_n_still_resolves_target() {
    let service = create_service();

    let report = expect_report(tokio_test::block_on(service.compute_matches("3", None, Some(0))).unwrap());

    assert!(report.matches.is_empty());
    assert_eq!(report.target.name, "User 3");
    assert_eq!(report.target.experience_level.rank(), 0);
}

fn create_app_state() -> AppState<InMemoryProfiles> {
    AppState {
        service: Arc::new(create_service()),
    }
}

#[actix_web::test]
async fn test_route_compute_matches() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_app_state()))
            .configure(routes::configure_routes::<InMemoryProfiles>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/compute")
        .set_json(json!({"userId": "1", "topN": 1, "includeBreakdown": true}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["target"]["id"], "1");
    assert_eq!(body["target"]["experienceLevel"], "Senior");
    assert_eq!(body["target"]["skillCategories"], json!(["Technical"]));
    assert_eq!(body["matches"].as_array().unwrap().len(), 1);
    assert_eq!(body["matches"][0]["id"], "2");
    assert_eq!(body["matches"][0]["factors"]["skillComplementarity"], 1.0);
}

#[actix_web::test]
async fn test_route_get_matches_without_breakdown() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_app_state()))
            .configure(routes::configure_routes::<InMemoryProfiles>),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/matches/2?topN=5").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert!(matches[0].get("factors").is_none());
    assert!(matches[0]["score"].as_f64().unwrap() >= matches[1]["score"].as_f64().unwrap());
}

#[actix_web::test]
async fn test_route_target_not_found() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_app_state()))
            .configure(routes::configure_routes::<InMemoryProfiles>),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/matches/999").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "target not found");
}

#[actix_web::test]
async fn test_route_rejects_invalid_requests() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_app_state()))
            .configure(routes::configure_routes::<InMemoryProfiles>),
    )
    .await;

    let empty_id = test::TestRequest::post()
        .uri("/api/v1/matches/compute")
        .set_json(json!({"userId": ""}))
        .to_request();
    assert_eq!(test::call_service(&app, empty_id).await.status(), StatusCode::BAD_REQUEST);

    let negative_weight = test::TestRequest::post()
        .uri("/api/v1/matches/compute")
        .set_json(json!({"userId": "1", "weights": {"goal_alignment": -0.5}}))
        .to_request();
    assert_eq!(test::call_service(&app, negative_weight).await.status(), StatusCode::BAD_REQUEST);

    let unknown_factor = test::TestRequest::post()
        .uri("/api/v1/matches/compute")
        .set_json(json!({"userId": "1", "weights": {"distance": 0.5}}))
        .to_request();
    assert_eq!(test::call_service(&app, unknown_factor).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_route_partial_weights_keep_configured_defaults() {
    let configured = MatchDefaults {
        weights: WeightConfig {
            skill_complementarity: 0.0,
            shared_interests: 0.0,
            shared_industries: 0.0,
            goal_alignment: 0.0,
            experience_compatibility: 1.0,
        },
        ..MatchDefaults::default()
    };
    let state = AppState {
        service: Arc::new(MatchService::new(
            InMemoryProfiles::new(create_population()),
            Matcher::default(),
            configured,
        )),
    };
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(routes::configure_routes::<InMemoryProfiles>),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/matches/compute")
        .set_json(json!({"userId": "2", "weights": {"shared_industries": 0.0}}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    // Only the configured experience weight applies: Mid-level vs Senior
    assert_eq!(body["matches"][0]["id"], "1");
    assert_eq!(body["matches"][0]["score"], 0.5);
    assert_eq!(body["matches"][1]["score"], 0.0);
}

#[actix_web::test]
async fn test_route_health() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(create_app_state()))
            .configure(routes::configure_routes::<InMemoryProfiles>),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}
