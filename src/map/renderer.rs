// (C) Coralbits SL 2025
// This file is part of Mapcache and is licensed under the
// GNU Affero General Public License v3.0.
// A commercial license on request is also available;
// contact info@coralbits.com for details.

use std::sync::Arc;

use minijinja::{context, Environment};
use tracing::{debug, instrument, warn};

use crate::geocode::{Coordinates, GeocodeResolver};
use crate::map::types::MapArgs;

const MAP_TEMPLATE_NAME: &str = "map.html";

// Falsy values (none, 0, "") drop their attribute.
const MAP_TEMPLATE: &str = concat!(
    r#"<div class="wplook-google-map{% if class %} {{ class }}{% endif %}""#,
    r#"{% if latitude %} data-latitude="{{ latitude }}"{% endif %}"#,
    r#"{% if longitude %} data-longitude="{{ longitude }}"{% endif %}"#,
    r#"{% if marker %} data-marker-image="{{ marker }}"{% endif %}"#,
    r#"{% if marker_width %} data-marker-width="{{ marker_width }}"{% endif %}"#,
    r#"{% if marker_height %} data-marker-height="{{ marker_height }}"{% endif %}"#,
    r#"{% if height %} style="height: {{ height }}px;"{% endif %}"#,
    r#"{% if zoom %} data-zoom="{{ zoom }}"{% endif %}"#,
    r#"{% if saturation %} data-saturation="{{ saturation }}"{% endif %}"#,
    r#"{% if lightness %} data-lightness="{{ lightness }}"{% endif %}"#,
    r#"{% if hue %} data-hue="{{ hue }}"{% endif %}"#,
    r#"></div>"#,
);

/// Renders the placeholder element the front-end map script turns into a map.
pub struct MapRenderer {
    resolver: Arc<GeocodeResolver>,
    api_key: String,
    env: Environment<'static>,
}

impl std::fmt::Debug for MapRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MapRenderer")
    }
}

impl MapRenderer {
    pub fn new(resolver: Arc<GeocodeResolver>, api_key: &str) -> anyhow::Result<Self> {
        let mut env = Environment::new();
        env.add_template(MAP_TEMPLATE_NAME, MAP_TEMPLATE)?;
        Ok(Self {
            resolver,
            api_key: api_key.to_string(),
            env,
        })
    }

    /// Where the map should point, or None when there is nothing to show.
    /// Geocoding failures are logged and treated as "nothing to show".
    pub async fn coordinates(&self, args: &MapArgs) -> Option<Coordinates> {
        if let Some(address) = args.address() {
            return match self.resolver.resolve(address, &self.api_key).await {
                Ok(coordinates) => Some(coordinates),
                Err(e) => {
                    warn!("No map for address={}: {}", address, e);
                    None
                }
            };
        }
        // a zero coordinate counts as missing
        match (args.latitude, args.longitude) {
            (Some(latitude), Some(longitude)) if latitude != 0.0 && longitude != 0.0 => {
                Some(Coordinates::new(latitude, longitude))
            }
            _ => {
                debug!("No address or coordinates given, skipping map");
                None
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn render(&self, args: &MapArgs) -> anyhow::Result<Option<String>> {
        let Some(coordinates) = self.coordinates(args).await else {
            return Ok(None);
        };
        self.render_at(args, coordinates).map(Some)
    }

    pub fn render_at(&self, args: &MapArgs, coordinates: Coordinates) -> anyhow::Result<String> {
        let ctx = context! {
            class => &args.class,
            latitude => coordinates.latitude,
            longitude => coordinates.longitude,
            marker => &args.marker,
            marker_width => &args.marker_width,
            marker_height => &args.marker_height,
            height => &args.height,
            zoom => &args.zoom,
            saturation => &args.saturation,
            lightness => &args.lightness,
            hue => &args.hue,
        };
        let html = self.env.get_template(MAP_TEMPLATE_NAME)?.render(ctx)?;
        Ok(html)
    }
}
