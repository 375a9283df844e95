use chrono::{DateTime, Utc};
use domain_geo::Polygon;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Region entity as stored in MongoDB
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    /// Unique identifier (stored as _id in MongoDB)
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: String,
    /// Owning user
    #[serde(rename = "user")]
    pub owner_id: Uuid,
    /// GeoJSON polygon covered by the `2dsphere` index
    pub geometry: Polygon,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Region {
    pub fn new(name: String, owner_id: Uuid, geometry: Polygon) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name,
            owner_id,
            geometry,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge validated patch values
    pub fn apply_update(
        &mut self,
        name: Option<String>,
        owner_id: Option<Uuid>,
        geometry: Option<Polygon>,
    ) {
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(owner_id) = owner_id {
            self.owner_id = owner_id;
        }
        if let Some(geometry) = geometry {
            self.geometry = geometry;
        }
        self.updated_at = Utc::now();
    }
}

/// Region as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegionResponse {
    pub id: Uuid,
    #[schema(example = "Florida")]
    pub name: String,
    /// Owning user id
    pub user: Uuid,
    pub geometry: Polygon,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Region> for RegionResponse {
    fn from(region: Region) -> Self {
        Self {
            id: region.id,
            name: region.name,
            user: region.owner_id,
            geometry: region.geometry,
            created_at: region.created_at,
            updated_at: region.updated_at,
        }
    }
}

/// A proximity query result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RegionWithDistance {
    #[serde(flatten)]
    pub region: RegionResponse,
    /// Meters from the query point; 0 when the point lies inside the region
    #[schema(example = 1520.4)]
    pub distance: f64,
}

/// Geometry as submitted by clients, checked by the validation layer
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
pub struct GeometryInput {
    /// Must be `Polygon` when given
    #[serde(rename = "type")]
    #[schema(example = "Polygon")]
    pub kind: Option<String>,
    /// Rings of `[longitude, latitude]` positions
    #[schema(value_type = Option<Vec<Vec<Vec<f64>>>>, example = json!([[[-80.87, 24.54], [-87.63, 24.54], [-87.63, 31.0], [-80.87, 31.0], [-80.87, 24.54]]]))]
    pub coordinates: Option<serde_json::Value>,
}

/// DTO for creating a region. The owner is the authenticated caller.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateRegion {
    #[serde(default)]
    #[validate(length(max = 200))]
    #[schema(example = "Florida")]
    pub name: String,
    pub geometry: Option<GeometryInput>,
}

/// DTO for updating a region. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateRegion {
    #[validate(length(max = 200))]
    pub name: Option<String>,
    /// New owner id; the user must exist
    pub user: Option<String>,
    pub geometry: Option<GeometryInput>,
}

/// `GET /regions/containing` query, parsed as text and validated by the service
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PointQuery {
    /// Degrees, [-180, 180]
    #[param(example = "-81.3792")]
    pub longitude: Option<String>,
    /// Degrees, [-90, 90]
    #[param(example = "28.5383")]
    pub latitude: Option<String>,
}

/// `GET /regions/near` query, parsed as text and validated by the service
#[derive(Debug, Clone, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct NearQuery {
    pub longitude: Option<String>,
    pub latitude: Option<String>,
    /// Meters
    pub max_distance: Option<String>,
    /// Only regions owned by this user are considered
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_geo::Coordinates;
    use serde_json::json;

    fn square() -> Polygon {
        Polygon::from_ring(vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(1.0, 0.0),
            Coordinates::new(1.0, 1.0),
            Coordinates::new(0.0, 1.0),
            Coordinates::new(0.0, 0.0),
        ])
    }

    #[test]
    fn test_stored_owner_field_is_user() {
        let owner = Uuid::now_v7();
        let region = Region::new("Square".to_string(), owner, square());
        let stored = serde_json::to_value(&region).unwrap();

        assert_eq!(stored["user"], json!(owner));
        assert_eq!(stored["geometry"]["type"], "Polygon");
        assert!(stored.get("_id").is_some());
    }

    #[test]
    fn test_with_distance_is_flat() {
        let region = Region::new("Square".to_string(), Uuid::now_v7(), square());
        let body = serde_json::to_value(RegionWithDistance {
            region: region.clone().into(),
            distance: 12.5,
        })
        .unwrap();

        assert_eq!(body["id"], json!(region.id));
        assert_eq!(body["name"], "Square");
        assert_eq!(body["distance"], 12.5);
    }

    #[test]
    fn test_near_query_uses_camel_case() {
        let query: NearQuery = serde_json::from_value(json!({
            "longitude": "1",
            "latitude": "2",
            "maxDistance": "300",
            "userId": "abc"
        }))
        .unwrap();

        assert_eq!(query.max_distance.as_deref(), Some("300"));
        assert_eq!(query.user_id.as_deref(), Some("abc"));
    }
}
