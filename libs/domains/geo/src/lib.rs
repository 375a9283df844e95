//! Geo Domain Kernel
//!
//! Shared building blocks for the users and regions domains:
//!
//! - [`error`]: the classified error every domain operation returns
//! - [`confirmation`]: the `{deleted: true}` body of delete operations
//! - [`coordinates`]: `(longitude, latitude)` pairs and their wire forms
//! - [`geometry`]: GeoJSON polygons, point-in-polygon and spherical distance
//! - [`geocoding`]: the address <-> coordinates bridge (trait + Nominatim client)
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐   ┌────────────────┐
//! │ domain_users  │   │ domain_regions │
//! └──────┬────────┘   └───────┬────────┘
//!        │                    │
//! ┌──────▼────────────────────▼──────┐
//! │            domain_geo            │  ← errors, geometry, geocoding
//! └──────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust
//! use domain_geo::{Coordinates, Polygon};
//!
//! let florida = Polygon::from_ring(vec![
//!     Coordinates::new(-80.87, 24.54),
//!     Coordinates::new(-87.63, 24.54),
//!     Coordinates::new(-87.63, 31.0),
//!     Coordinates::new(-80.87, 31.0),
//!     Coordinates::new(-80.87, 24.54),
//! ]);
//!
//! assert!(florida.contains(Coordinates::new(-81.3792, 28.5383)));
//! ```

pub mod confirmation;
pub mod coordinates;
pub mod error;
pub mod geocoding;
pub mod geometry;

// Re-export commonly used types
pub use confirmation::DeleteConfirmation;
pub use coordinates::Coordinates;
pub use error::{ClassifiedError, ClassifiedResult, ErrorKind};
pub use geocoding::{Geocoder, GeocoderConfig, NominatimGeocoder, ResolutionError};
pub use geometry::{EARTH_RADIUS_METERS, GeometryType, Polygon, haversine_distance};
