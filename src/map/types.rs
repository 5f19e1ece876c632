use serde::{Deserialize, Serialize};

/// Options for one map placeholder. Coordinates come from `maps_address`,
/// then `human_address`, then the explicit `latitude`/`longitude` pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct MapArgs {
    /// Address sent to the geocoder, when it differs from the displayed one
    #[arg(long)]
    #[serde(default)]
    pub maps_address: Option<String>,
    /// Address as shown to visitors
    #[arg(long = "address")]
    #[serde(default)]
    pub human_address: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Marker image URL
    #[arg(long)]
    #[serde(default)]
    pub marker: Option<String>,
    #[arg(long)]
    #[serde(default)]
    pub marker_width: Option<u32>,
    #[arg(long)]
    #[serde(default)]
    pub marker_height: Option<u32>,
    /// Extra CSS class for the map element
    #[arg(long)]
    #[serde(default)]
    pub class: Option<String>,
    /// Height in pixels
    #[arg(long)]
    #[serde(default)]
    pub height: Option<u32>,
    #[arg(long)]
    #[serde(default)]
    pub zoom: Option<u8>,
    #[arg(long, allow_hyphen_values = true)]
    #[serde(default)]
    pub saturation: Option<i32>,
    #[arg(long, allow_hyphen_values = true)]
    #[serde(default)]
    pub lightness: Option<i32>,
    /// Map tint, e.g. "#ff0000"
    #[arg(long)]
    #[serde(default)]
    pub hue: Option<String>,
}

impl MapArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_address(mut self, address: &str) -> Self {
        self.human_address = Some(address.to_string());
        self
    }

    pub fn with_maps_address(mut self, address: &str) -> Self {
        self.maps_address = Some(address.to_string());
        self
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_marker(mut self, url: &str, width: Option<u32>, height: Option<u32>) -> Self {
        self.marker = Some(url.to_string());
        self.marker_width = width;
        self.marker_height = height;
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_zoom(mut self, zoom: u8) -> Self {
        self.zoom = Some(zoom);
        self
    }

    pub fn with_style(mut self, saturation: i32, lightness: i32, hue: &str) -> Self {
        self.saturation = Some(saturation);
        self.lightness = Some(lightness);
        self.hue = Some(hue.to_string());
        self
    }

    /// The address to geocode, if any. Empty strings count as absent.
    pub fn address(&self) -> Option<&str> {
        [&self.maps_address, &self.human_address]
            .into_iter()
            .flatten()
            .map(|a| a.as_str())
            .find(|a| !a.trim().is_empty())
    }
}
