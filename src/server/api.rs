use std::sync::Arc;

use anyhow::Result;
use poem::middleware::Cors;
use poem::{
    listener::TcpListener, middleware::Tracing, EndpointExt, Error as PoemError, Route, Server,
};
use poem_openapi::{
    param::Query,
    payload::{Json, PlainText},
    OpenApi, OpenApiService,
};
use tracing::{error, info};

use crate::geocode::GeocodeResolver;
use crate::map::{MapArgs, MapRenderer};
use crate::server::response::{GeocodeResponse, MapResponse};
use crate::types::{CacheInfo, ErrorResponse};

pub struct Api {
    resolver: Arc<GeocodeResolver>,
    renderer: Arc<MapRenderer>,
    api_key: String,
}

#[OpenApi]
impl Api {
    pub fn new(resolver: Arc<GeocodeResolver>, api_key: &str) -> Result<Self> {
        let renderer = MapRenderer::new(resolver.clone(), api_key)?;
        Ok(Self {
            resolver,
            renderer: Arc::new(renderer),
            api_key: api_key.to_string(),
        })
    }

    /// Coordinates for an address, from the cache when known
    #[oai(path = "/geocode", method = "get")]
    async fn geocode(&self, Query(address): Query<String>) -> GeocodeResponse {
        match self.resolver.resolve(&address, &self.api_key).await {
            Ok(coordinates) => GeocodeResponse::Found(Json(coordinates.into())),
            Err(e) => {
                error!("Geocoding failed address={}: {}", address, e);
                GeocodeResponse::from_error(&e)
            }
        }
    }

    /// Map placeholder markup for an address or a coordinate pair
    #[oai(path = "/map", method = "get")]
    async fn map(
        &self,
        Query(address): Query<Option<String>>,
        Query(maps_address): Query<Option<String>>,
        Query(latitude): Query<Option<f64>>,
        Query(longitude): Query<Option<f64>>,
        Query(marker): Query<Option<String>>,
        Query(marker_width): Query<Option<u32>>,
        Query(marker_height): Query<Option<u32>>,
        Query(class): Query<Option<String>>,
        Query(height): Query<Option<u32>>,
        Query(zoom): Query<Option<u8>>,
        Query(saturation): Query<Option<i32>>,
        Query(lightness): Query<Option<i32>>,
        Query(hue): Query<Option<String>>,
    ) -> Result<MapResponse, PoemError> {
        let args = MapArgs {
            maps_address,
            human_address: address,
            latitude,
            longitude,
            marker,
            marker_width,
            marker_height,
            class,
            height,
            zoom,
            saturation,
            lightness,
            hue,
        };

        let rendered = self.renderer.render(&args).await.map_err(|e| {
            PoemError::from_string(e.to_string(), poem::http::StatusCode::INTERNAL_SERVER_ERROR)
        })?;

        match rendered {
            Some(html) => Ok(MapResponse::Html(PlainText(html))),
            None => Ok(MapResponse::Empty),
        }
    }

    /// Size of the coordinate cache
    #[oai(path = "/cache", method = "get")]
    async fn cache_info(&self) -> Result<Json<CacheInfo>, PoemError> {
        let cache = self.resolver.load_cache().await.map_err(|e| {
            let details = ErrorResponse::from_geocode_error(&e);
            PoemError::from_string(details.details, poem::http::StatusCode::INTERNAL_SERVER_ERROR)
        })?;
        Ok(Json(CacheInfo {
            option_key: self.resolver.option_key().to_string(),
            count: cache.len() as u64,
        }))
    }
}

pub fn app(api: Api) -> impl poem::Endpoint {
    let api_service =
        OpenApiService::new(api, "Mapcache", env!("CARGO_PKG_VERSION")).server("/api/v1");

    let cors = Cors::new()
        .allow_methods(vec!["GET", "OPTIONS"])
        .allow_headers(vec!["content-type"]);
    let docs = api_service.swagger_ui();
    Route::new()
        .nest("api/v1", api_service)
        .nest("/docs", docs)
        .with(Tracing)
        .with(cors)
}

pub async fn start(listen: &str, api: Api) -> Result<()> {
    info!("Listening on {}", listen);
    let listener = TcpListener::bind(listen);
    Server::new(listener).run(app(api)).await?;

    Ok(())
}
