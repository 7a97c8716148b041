use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ComputeMatchesRequest, ErrorResponse, HealthResponse, MatchesQuery, WeightConfig};
use crate::services::{strip_breakdown, MatchOutcome, MatchService, ProfileSource};
use std::sync::Arc;

/// Application state shared across all handlers
pub struct AppState<S> {
    pub service: Arc<MatchService<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Configure all match-related routes
pub fn configure<S: ProfileSource + 'static>(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check::<S>))
        .route("/matches/compute", web::post().to(compute_matches::<S>))
        .route("/matches/{user_id}", web::get().to(get_matches::<S>));
}

/// Health check endpoint
async fn health_check<S: ProfileSource>(state: web::Data<AppState<S>>) -> impl Responder {
    let store_healthy = match state.service.source().health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Profile store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Compute matches endpoint
///
/// POST /api/v1/matches/compute
///
/// `weights` is a partial override applied on top of `scoring.weights`.
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "weights": { "goal_alignment": 0.4 },
///   "topN": 10,
///   "includeBreakdown": false
/// }
/// ```
async fn compute_matches<S: ProfileSource>(
    state: web::Data<AppState<S>>,
    req: web::Json<ComputeMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for compute_matches request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let req = req.into_inner();
    // Omitted factors keep the configured weights
    let weights = req.weights.map(|overrides| overrides.apply(&state.service.defaults().weights));
    run_matching(&state, &req.user_id, weights, req.top_n, req.include_breakdown).await
}

/// Matches with the configured weights
///
/// GET /api/v1/matches/{user_id}?topN=10&includeBreakdown=true
async fn get_matches<S: ProfileSource>(
    state: web::Data<AppState<S>>,
    path: web::Path<String>,
    query: web::Query<MatchesQuery>,
) -> impl Responder {
    let user_id = path.into_inner();
    run_matching(&state, &user_id, None, query.top_n, query.include_breakdown).await
}

async fn run_matching<S: ProfileSource>(
    state: &AppState<S>,
    user_id: &str,
    weights: Option<WeightConfig>,
    top_n: Option<usize>,
    include_breakdown: bool,
) -> HttpResponse {
    match state.service.compute_matches(user_id, weights, top_n).await {
        Ok(MatchOutcome::Found(mut report)) => {
            if !include_breakdown {
                strip_breakdown(&mut report);
            }
            HttpResponse::Ok().json(report)
        }
        Ok(MatchOutcome::NotFound { target_id }) => HttpResponse::NotFound().json(ErrorResponse {
            error: "target not found".to_string(),
            message: format!("No active profile with id {}", target_id),
            status_code: 404,
        }),
        Err(e) => {
            tracing::error!("Failed to compute matches for {}: {}", user_id, e);
            HttpResponse::BadGateway().json(ErrorResponse {
                error: "Failed to fetch profiles".to_string(),
                message: e.to_string(),
                status_code: 502,
            })
        }
    }
}
