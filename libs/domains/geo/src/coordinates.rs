use serde::{Deserialize, Serialize};

/// A `(longitude, latitude)` pair in WGS-84 degrees.
///
/// Accepted on input either as a `[lon, lat]` array or as a
/// `{"lat": .., "lon": ..}` object, and always emitted as `[lon, lat]`
/// (the GeoJSON position order MongoDB indexes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "CoordinatesRepr", into = "[f64; 2]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CoordinatesRepr {
    Pair([f64; 2]),
    Object { lat: f64, lon: f64 },
}

impl From<CoordinatesRepr> for Coordinates {
    fn from(repr: CoordinatesRepr) -> Self {
        match repr {
            CoordinatesRepr::Pair([longitude, latitude]) => Self::new(longitude, latitude),
            CoordinatesRepr::Object { lat, lon } => Self::new(lon, lat),
        }
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(coordinates: Coordinates) -> Self {
        [coordinates.longitude, coordinates.latitude]
    }
}

impl Coordinates {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Both components are finite and inside [-180, 180] x [-90, 90].
    pub fn is_valid(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && (-180.0..=180.0).contains(&self.longitude)
            && (-90.0..=90.0).contains(&self.latitude)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.longitude, self.latitude)
    }
}
