//! Place search and reverse geocoding handlers.
//!
//! ```text
//! GET /api/v1/geocode/search?q=harbour%20road
//! GET /api/v1/geocode/reverse?lat=51.5&lng=-0.12
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Coordinates, PlaceQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::PlaceDto;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::geo_error;

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchParams {
    /// Free-text place query.
    pub q: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReverseParams {
    /// Latitude in degrees, -90 to 90.
    pub lat: f64,
    /// Longitude in degrees, -180 to 180.
    pub lng: f64,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReverseDto {
    /// Place name, or `"<lat>, <lng>"` with six decimals when none is known.
    #[schema(example = "51.500000, -0.127600")]
    pub label: String,
}

/// Places matching free text.
#[utoipa::path(
    get,
    path = "/api/v1/geocode/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching places", body = [PlaceDto]),
        (status = 400, description = "Blank query", body = ErrorSchema),
        (status = 502, description = "Unusable provider answer", body = ErrorSchema),
        (status = 503, description = "Provider unavailable", body = ErrorSchema)
    ),
    tags = ["geocoding"],
    operation_id = "searchPlaces",
    security([])
)]
#[get("/geocode/search")]
pub async fn search(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<PlaceDto>>> {
    let query = PlaceQuery::new(&params.q).map_err(|err| geo_error(&err))?;
    let places = state.geocoding.search(query).await?;
    Ok(web::Json(places.iter().map(PlaceDto::from).collect()))
}

/// A label for a point. Never fails once the coordinates are valid.
#[utoipa::path(
    get,
    path = "/api/v1/geocode/reverse",
    params(ReverseParams),
    responses(
        (status = 200, description = "Place label", body = ReverseDto),
        (status = 400, description = "Coordinates out of range", body = ErrorSchema)
    ),
    tags = ["geocoding"],
    operation_id = "reverseGeocode",
    security([])
)]
#[get("/geocode/reverse")]
pub async fn reverse(
    state: web::Data<HttpState>,
    params: web::Query<ReverseParams>,
) -> ApiResult<web::Json<ReverseDto>> {
    let point = Coordinates::new(params.lat, params.lng).map_err(|err| geo_error(&err))?;
    let label = state.geocoding.reverse(point).await;
    Ok(web::Json(ReverseDto { label }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, Place};
    use crate::inbound::http::test_utils::{MockPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn read_json(response: actix_web::dev::ServiceResponse) -> Value {
        let body = actix_test::read_body(response).await;
        serde_json::from_slice(&body).expect("response JSON")
    }

    #[actix_web::test]
    async fn search_returns_places() {
        let mut ports = MockPorts::default();
        ports
            .geocoding
            .expect_search()
            .withf(|query: &PlaceQuery| query.as_ref() == "harbour road")
            .times(1)
            .returning(|_| {
                Ok(vec![Place {
                    name: "Harbour Road, Bristol".to_owned(),
                    coordinates: Coordinates::new(51.45, -2.6).expect("point"),
                }])
            });
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/geocode/search?q=%20harbour%20road%20")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!([{"name": "Harbour Road, Bristol", "latitude": 51.45, "longitude": -2.6}])
        );
    }

    #[actix_web::test]
    async fn blank_search_is_rejected() {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/geocode/search?q=%20")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["details"]["field"], "q");
    }

    #[actix_web::test]
    async fn search_outage_is_service_unavailable() {
        let mut ports = MockPorts::default();
        ports
            .geocoding
            .expect_search()
            .returning(|_| Err(Error::service_unavailable("geocoder timed out")));
        let app = actix_test::init_service(test_app(ports)).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/geocode/search?q=park")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[actix_web::test]
    async fn reverse_returns_label() {
        let mut ports = MockPorts::default();
        ports
            .geocoding
            .expect_reverse()
            .times(1)
            .returning(|point| point.fallback_label());
        let app = actix_test::init_service(test_app(ports)).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/geocode/reverse?lat=51.5&lng=-0.1276")
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            json!({"label": "51.500000, -0.127600"})
        );
    }

    #[rstest]
    #[case::latitude("lat=95&lng=0", "lat")]
    #[case::longitude("lat=0&lng=-181", "lng")]
    #[actix_web::test]
    async fn reverse_rejects_out_of_range(#[case] query: &str, #[case] field: &str) {
        let app = actix_test::init_service(test_app(MockPorts::default())).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/geocode/reverse?{query}"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["details"]["field"], field);
    }
}
