use poem_openapi::payload::{Json, PlainText};
use poem_openapi::ApiResponse;

use crate::geocode::GeocodeError;
use crate::types::{CoordinatesJson, ErrorResponse};

#[derive(ApiResponse)]
pub enum GeocodeResponse {
    #[oai(status = 200)]
    Found(Json<CoordinatesJson>),
    /// The geocoding service failed or could not be reached
    #[oai(status = 502)]
    BadGateway(Json<ErrorResponse>),
    /// The settings store failed
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl GeocodeResponse {
    pub fn from_error(error: &GeocodeError) -> Self {
        let details = ErrorResponse::from_geocode_error(error);
        match error {
            GeocodeError::Settings(_) => GeocodeResponse::InternalError(Json(details)),
            _ => GeocodeResponse::BadGateway(Json(details)),
        }
    }
}

#[derive(ApiResponse)]
pub enum MapResponse {
    #[oai(status = 200, content_type = "text/html; charset=utf-8")]
    Html(PlainText<String>),
    /// Nothing to show: no location given or it could not be geocoded
    #[oai(status = 204)]
    Empty,
}
