//! Route Calculation Routes
//!
//! - POST /api/calculate-route - Simulated route options with eco scores

use axum::Json;

use crate::api::dto::{RouteDto, RouteRequest, RouteResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::dashboard::routing::route_options;

/// POST /api/calculate-route
pub async fn calculate_route(Json(req): Json<RouteRequest>) -> ApiResult<Json<RouteResponse>> {
    if req.origin.trim().is_empty() || req.destination.trim().is_empty() {
        return Err(ApiError::Validation(
            "Please enter both starting point and destination".to_string(),
        ));
    }

    let routes = route_options()
        .into_iter()
        .zip(1..)
        .map(|(route, id)| RouteDto {
            id,
            eco_score: route.eco_score(),
            route,
        })
        .collect();

    Ok(Json(RouteResponse {
        status: "success".to_string(),
        origin: req.origin,
        destination: req.destination,
        routes,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scores_follow_pollution() {
        let Json(response) = calculate_route(Json(RouteRequest {
            origin: "Home".to_string(),
            destination: "Office".to_string(),
        }))
        .await
        .unwrap();

        let scores: Vec<u8> = response.routes.iter().map(|r| r.eco_score).collect();
        assert_eq!(scores, vec![90, 75, 60]);
        assert_eq!(response.routes[0].id, 1);
    }

    #[tokio::test]
    async fn test_empty_origin_rejected() {
        let result = calculate_route(Json(RouteRequest {
            origin: String::new(),
            destination: "Office".to_string(),
        }))
        .await;
        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
