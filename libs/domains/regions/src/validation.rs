//! Input checks run before any persistence side effect.

use domain_geo::{ClassifiedError, ClassifiedResult, Coordinates, Polygon};
use serde_json::Value;
use uuid::Uuid;

use crate::models::{CreateRegion, GeometryInput, NearQuery, PointQuery, UpdateRegion};

pub const NAME_REQUIRED: &str = "Name is required";

/// A validated `near` query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityQuery {
    pub point: Coordinates,
    /// Meters
    pub max_distance: f64,
    pub owner_id: Uuid,
}

/// Validated fields of an update patch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionPatch {
    pub name: Option<String>,
    /// Still unresolved: existence is checked by the service
    pub owner: Option<String>,
    pub geometry: Option<Polygon>,
}

fn bad_request(message: impl Into<String>) -> ClassifiedError {
    ClassifiedError::bad_request(message)
}

fn position(value: &Value) -> ClassifiedResult<Coordinates> {
    match value.as_array().map(Vec::as_slice) {
        Some([lon, lat]) => match (lon.as_f64(), lat.as_f64()) {
            (Some(lon), Some(lat)) => Ok(Coordinates::new(lon, lat)),
            _ => Err(bad_request("Polygon positions must be numeric")),
        },
        _ => Err(bad_request(
            "Polygon positions must be [longitude, latitude] pairs",
        )),
    }
}

fn ring(value: &Value) -> ClassifiedResult<Vec<Coordinates>> {
    value
        .as_array()
        .ok_or_else(|| bad_request("Polygon rings must be arrays of positions"))?
        .iter()
        .map(position)
        .collect()
}

/// Parse and check client geometry, returning the polygon to persist.
pub fn parse_geometry(geometry: &GeometryInput) -> ClassifiedResult<Polygon> {
    if let Some(kind) = &geometry.kind {
        if kind != "Polygon" {
            return Err(bad_request("Geometry type must be Polygon"));
        }
    }

    let coordinates = geometry
        .coordinates
        .as_ref()
        .filter(|value| !value.is_null())
        .ok_or_else(|| bad_request("Geometry coordinates are required"))?;

    let rings = coordinates
        .as_array()
        .ok_or_else(|| bad_request("Geometry coordinates must be an array of rings"))?
        .iter()
        .map(ring)
        .collect::<ClassifiedResult<Vec<_>>>()?;

    Polygon::try_from_rings(rings)
}

/// Name, owner and geometry are required; geometry must be a well-formed polygon.
pub fn validate_region_create(input: &CreateRegion, owner: &str) -> ClassifiedResult<Polygon> {
    if input.name.trim().is_empty() {
        return Err(bad_request(NAME_REQUIRED));
    }
    if owner.trim().is_empty() {
        return Err(bad_request("Owner is required"));
    }

    let geometry = input
        .geometry
        .as_ref()
        .ok_or_else(|| bad_request("Geometry coordinates are required"))?;
    parse_geometry(geometry)
}

/// Same checks as create, applied only to fields present in the patch.
pub fn validate_region_update(patch: &UpdateRegion) -> ClassifiedResult<RegionPatch> {
    let name = match &patch.name {
        Some(name) if name.trim().is_empty() => return Err(bad_request(NAME_REQUIRED)),
        Some(name) => Some(name.trim().to_string()),
        None => None,
    };
    let owner = match &patch.user {
        Some(user) if user.trim().is_empty() => return Err(bad_request("Owner is required")),
        Some(user) => Some(user.trim().to_string()),
        None => None,
    };
    let geometry = patch.geometry.as_ref().map(parse_geometry).transpose()?;

    Ok(RegionPatch {
        name,
        owner,
        geometry,
    })
}

fn parse_number(value: Option<&str>, field: &str) -> ClassifiedResult<f64> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| bad_request(format!("{field} is required")))?;

    raw.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| bad_request(format!("{field} must be a number")))
}

fn parse_point(longitude: Option<&str>, latitude: Option<&str>) -> ClassifiedResult<Coordinates> {
    let point = Coordinates::new(
        parse_number(longitude, "longitude")?,
        parse_number(latitude, "latitude")?,
    );
    if !point.is_valid() {
        return Err(bad_request(
            "longitude must be within [-180, 180] and latitude within [-90, 90]",
        ));
    }
    Ok(point)
}

pub fn validate_coordinate_query(query: &PointQuery) -> ClassifiedResult<Coordinates> {
    parse_point(query.longitude.as_deref(), query.latitude.as_deref())
}

pub fn validate_proximity_query(query: &NearQuery) -> ClassifiedResult<ProximityQuery> {
    let point = parse_point(query.longitude.as_deref(), query.latitude.as_deref())?;

    let max_distance = parse_number(query.max_distance.as_deref(), "maxDistance")?;
    if max_distance < 0.0 {
        return Err(bad_request("maxDistance must not be negative"));
    }

    let user_id = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| bad_request("userId is required"))?;
    let owner_id = Uuid::parse_str(user_id).map_err(|_| bad_request("userId is not a valid id"))?;

    Ok(ProximityQuery {
        point,
        max_distance,
        owner_id,
    })
}
