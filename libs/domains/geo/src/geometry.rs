//! GeoJSON polygons and the spherical math the in-memory adapters use to
//! answer the same questions MongoDB's `2dsphere` index answers.
//!
//! Containment is a planar ray cast over `(longitude, latitude)` with the
//! boundary counted as inside. Distances are great-circle meters on a
//! sphere of [`EARTH_RADIUS_METERS`], the radius MongoDB uses for
//! `$geoNear` with `spherical: true`.

use crate::coordinates::Coordinates;
use crate::error::{ClassifiedError, ClassifiedResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Earth radius in meters used by MongoDB spherical queries.
pub const EARTH_RADIUS_METERS: f64 = 6_378_100.0;

/// Tolerance (in degrees) for boundary tests.
const EPSILON: f64 = 1e-9;

/// Minimum positions in a closed linear ring.
const MIN_RING_POSITIONS: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum GeometryType {
    #[default]
    Polygon,
}

/// A GeoJSON `Polygon`: the first ring is the exterior, any further rings are holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Polygon {
    #[serde(rename = "type")]
    pub kind: GeometryType,
    /// Rings of `[longitude, latitude]` positions; each ring closes on its first position
    #[schema(value_type = Vec<Vec<Vec<f64>>>, example = json!([[[-80.87, 24.54], [-87.63, 24.54], [-87.63, 31.0], [-80.87, 31.0], [-80.87, 24.54]]]))]
    pub coordinates: Vec<Vec<Coordinates>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RingPosition {
    Inside,
    Boundary,
    Outside,
}

impl Polygon {
    /// Polygon with a single exterior ring and no holes.
    pub fn from_ring(ring: Vec<Coordinates>) -> Self {
        Self {
            kind: GeometryType::Polygon,
            coordinates: vec![ring],
        }
    }

    /// Build a polygon, checking that every ring is closed, has at least
    /// four positions and only holds in-range coordinates.
    pub fn try_from_rings(rings: Vec<Vec<Coordinates>>) -> ClassifiedResult<Self> {
        if rings.is_empty() {
            return Err(ClassifiedError::bad_request(
                "Polygon must have at least one ring",
            ));
        }

        for ring in &rings {
            if ring.len() < MIN_RING_POSITIONS {
                return Err(ClassifiedError::bad_request(format!(
                    "Polygon rings must have at least {MIN_RING_POSITIONS} positions"
                )));
            }
            if let Some(position) = ring.iter().find(|position| !position.is_valid()) {
                return Err(ClassifiedError::bad_request(format!(
                    "Invalid polygon position {position}"
                )));
            }
            if ring.first() != ring.last() {
                return Err(ClassifiedError::bad_request(
                    "Polygon rings must be closed (first and last positions equal)",
                ));
            }
            check_ring_shape(ring)?;
        }

        Ok(Self {
            kind: GeometryType::Polygon,
            coordinates: rings,
        })
    }

    pub fn exterior(&self) -> &[Coordinates] {
        self.coordinates.first().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn holes(&self) -> &[Vec<Coordinates>] {
        self.coordinates.get(1..).unwrap_or(&[])
    }

    /// Whether the point lies inside or on the boundary of the polygon.
    ///
    /// Points strictly inside a hole are outside; points on a hole's edge
    /// are on the boundary and therefore inside.
    pub fn contains(&self, point: Coordinates) -> bool {
        if locate_in_ring(self.exterior(), point) == RingPosition::Outside {
            return false;
        }

        self.holes()
            .iter()
            .all(|hole| locate_in_ring(hole, point) != RingPosition::Inside)
    }

    /// Meters from the point to the closest part of the polygon, `0.0` when
    /// the polygon contains it.
    pub fn distance_to(&self, point: Coordinates) -> f64 {
        if self.contains(point) {
            return 0.0;
        }

        self.coordinates
            .iter()
            .flat_map(|ring| ring_edges(ring))
            .map(|(a, b)| distance_to_segment(point, a, b))
            .fold(f64::INFINITY, f64::min)
    }
}

/// Great-circle distance in meters between two positions.
pub fn haversine_distance(from: Coordinates, to: Coordinates) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlat = (to.latitude - from.latitude).to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

fn ring_edges(ring: &[Coordinates]) -> impl Iterator<Item = (Coordinates, Coordinates)> + '_ {
    let closing = match (ring.first(), ring.last()) {
        (Some(first), Some(last)) if first != last => Some((*last, *first)),
        _ => None,
    };

    ring.windows(2).map(|pair| (pair[0], pair[1])).chain(closing)
}

fn locate_in_ring(ring: &[Coordinates], point: Coordinates) -> RingPosition {
    let mut inside = false;

    for (a, b) in ring_edges(ring) {
        if on_segment(point, a, b) {
            return RingPosition::Boundary;
        }

        if (a.latitude > point.latitude) != (b.latitude > point.latitude) {
            let crossing = a.longitude
                + (point.latitude - a.latitude) * (b.longitude - a.longitude)
                    / (b.latitude - a.latitude);
            if point.longitude < crossing {
                inside = !inside;
            }
        }
    }

    if inside {
        RingPosition::Inside
    } else {
        RingPosition::Outside
    }
}

/// Distinct vertices of a closed ring, with consecutive repeats and the
/// closing position removed.
fn ring_vertices(ring: &[Coordinates]) -> Vec<Coordinates> {
    let mut vertices = ring.to_vec();
    vertices.dedup();
    while vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    vertices
}

/// Rejects rings a `2dsphere` index cannot store: fewer than three distinct
/// vertices, spikes, self-intersections and zero area.
fn check_ring_shape(ring: &[Coordinates]) -> ClassifiedResult<()> {
    let vertices = ring_vertices(ring);
    let n = vertices.len();

    if n < 3 {
        return Err(ClassifiedError::bad_request(
            "Polygon rings must have at least 3 distinct positions",
        ));
    }

    for i in 0..n {
        let prev = vertices[(i + n - 1) % n];
        let vertex = vertices[i];
        let next = vertices[(i + 1) % n];
        if is_spike(prev, vertex, next) {
            return Err(ClassifiedError::bad_request(format!(
                "Polygon ring folds back on itself at {vertex}"
            )));
        }
    }

    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue;
            }
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            let (c, d) = (vertices[j], vertices[(j + 1) % n]);
            if segments_intersect(a, b, c, d) {
                return Err(ClassifiedError::bad_request(
                    "Polygon rings must not self-intersect",
                ));
            }
        }
    }

    if signed_area(&vertices).abs() <= EPSILON {
        return Err(ClassifiedError::bad_request(
            "Polygon rings must enclose an area",
        ));
    }

    Ok(())
}

fn orientation(a: Coordinates, b: Coordinates, c: Coordinates) -> f64 {
    (b.longitude - a.longitude) * (c.latitude - a.latitude)
        - (b.latitude - a.latitude) * (c.longitude - a.longitude)
}

/// Both edges at `vertex` leave in the same direction.
fn is_spike(prev: Coordinates, vertex: Coordinates, next: Coordinates) -> bool {
    let dot = (prev.longitude - vertex.longitude) * (next.longitude - vertex.longitude)
        + (prev.latitude - vertex.latitude) * (next.latitude - vertex.latitude);
    orientation(vertex, prev, next).abs() <= EPSILON && dot > 0.0
}

fn segments_intersect(a: Coordinates, b: Coordinates, c: Coordinates, d: Coordinates) -> bool {
    let d1 = orientation(c, d, a);
    let d2 = orientation(c, d, b);
    let d3 = orientation(a, b, c);
    let d4 = orientation(a, b, d);

    let straddles = |x: f64, y: f64| (x > EPSILON && y < -EPSILON) || (x < -EPSILON && y > EPSILON);
    if straddles(d1, d2) && straddles(d3, d4) {
        return true;
    }

    on_segment(a, c, d) || on_segment(b, c, d) || on_segment(c, a, b) || on_segment(d, a, b)
}

/// Shoelace area in square degrees; the sign gives the winding.
fn signed_area(vertices: &[Coordinates]) -> f64 {
    let n = vertices.len();
    (0..n)
        .map(|i| {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            a.longitude * b.latitude - b.longitude * a.latitude
        })
        .sum::<f64>()
        / 2.0
}

fn on_segment(point: Coordinates, a: Coordinates, b: Coordinates) -> bool {
    let cross = (b.longitude - a.longitude) * (point.latitude - a.latitude)
        - (b.latitude - a.latitude) * (point.longitude - a.longitude);
    if cross.abs() > EPSILON {
        return false;
    }

    point.longitude >= a.longitude.min(b.longitude) - EPSILON
        && point.longitude <= a.longitude.max(b.longitude) + EPSILON
        && point.latitude >= a.latitude.min(b.latitude) - EPSILON
        && point.latitude <= a.latitude.max(b.latitude) + EPSILON
}

/// Closest point on the edge is found in an equirectangular projection
/// centred on `point`, then measured with haversine.
fn distance_to_segment(point: Coordinates, a: Coordinates, b: Coordinates) -> f64 {
    let cos_lat = point.latitude.to_radians().cos();

    let ax = wrap_longitude(a.longitude - point.longitude) * cos_lat;
    let ay = a.latitude - point.latitude;
    let dlon = wrap_longitude(b.longitude - a.longitude);
    let dx = dlon * cos_lat;
    let dy = b.latitude - a.latitude;

    let length_sq = dx * dx + dy * dy;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (-(ax * dx + ay * dy) / length_sq).clamp(0.0, 1.0)
    };

    let closest = Coordinates::new(
        wrap_longitude(a.longitude + t * dlon),
        a.latitude + t * dy,
    );

    haversine_distance(point, closest)
}

fn wrap_longitude(degrees: f64) -> f64 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && degrees > 0.0 {
        180.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn florida() -> Polygon {
        Polygon::from_ring(vec![
            Coordinates::new(-80.87, 24.54),
            Coordinates::new(-87.63, 24.54),
            Coordinates::new(-87.63, 31.0),
            Coordinates::new(-80.87, 31.0),
            Coordinates::new(-80.87, 24.54),
        ])
    }

    fn square(min: f64, max: f64) -> Vec<Coordinates> {
        vec![
            Coordinates::new(min, min),
            Coordinates::new(max, min),
            Coordinates::new(max, max),
            Coordinates::new(min, max),
            Coordinates::new(min, min),
        ]
    }

    #[test]
    fn test_contains_interior_point() {
        let orlando = Coordinates::new(-81.3792, 28.5383);
        assert!(florida().contains(orlando));
    }

    #[test]
    fn test_does_not_contain_far_point() {
        let tokyo = Coordinates::new(139.6917, 35.6895);
        assert!(!florida().contains(tokyo));
    }

    #[test]
    fn test_boundary_counts_as_inside() {
        let polygon = florida();
        assert!(polygon.contains(Coordinates::new(-80.87, 24.54)));
        assert!(polygon.contains(Coordinates::new(-84.0, 24.54)));
        assert!(polygon.contains(Coordinates::new(-87.63, 28.0)));
    }

    #[test]
    fn test_holes_exclude_interior_but_not_edges() {
        let polygon = Polygon::try_from_rings(vec![square(0.0, 10.0), square(4.0, 6.0)]).unwrap();

        assert!(polygon.contains(Coordinates::new(2.0, 2.0)));
        assert!(!polygon.contains(Coordinates::new(5.0, 5.0)));
        assert!(polygon.contains(Coordinates::new(4.0, 5.0)));
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        let expected = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;
        let distance = haversine_distance(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 1.0));
        assert!((distance - expected).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_same_point_is_zero() {
        let point = Coordinates::new(-49.27, -25.43);
        assert_eq!(haversine_distance(point, point), 0.0);
    }

    #[test]
    fn test_distance_is_zero_inside() {
        assert_eq!(florida().distance_to(Coordinates::new(-81.3792, 28.5383)), 0.0);
    }

    #[test]
    fn test_distance_to_nearest_edge() {
        let point = Coordinates::new(-80.0, 28.0);
        let expected = haversine_distance(point, Coordinates::new(-80.87, 28.0));
        let distance = florida().distance_to(point);

        assert!((distance - expected).abs() < 1e-6);
        assert!(distance > 80_000.0 && distance < 90_000.0);
    }

    #[test]
    fn test_distance_to_nearest_vertex() {
        let point = Coordinates::new(-80.0, 32.0);
        let expected = haversine_distance(point, Coordinates::new(-80.87, 31.0));
        let distance = florida().distance_to(point);

        assert!(distance <= expected + 1.0);
    }

    #[test]
    fn test_try_from_rings_rejects_open_ring() {
        let mut ring = square(0.0, 1.0);
        ring.pop();
        ring.push(Coordinates::new(0.5, 0.5));

        let err = Polygon::try_from_rings(vec![ring]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_try_from_rings_rejects_short_ring() {
        let ring = vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(1.0, 0.0),
            Coordinates::new(0.0, 0.0),
        ];

        assert!(Polygon::try_from_rings(vec![ring]).is_err());
        assert!(Polygon::try_from_rings(vec![]).is_err());
    }

    #[test]
    fn test_try_from_rings_rejects_out_of_range() {
        let ring = vec![
            Coordinates::new(0.0, 0.0),
            Coordinates::new(200.0, 0.0),
            Coordinates::new(0.0, 1.0),
            Coordinates::new(0.0, 0.0),
        ];

        assert!(Polygon::try_from_rings(vec![ring]).is_err());
    }

    fn message(rings: Vec<Vec<Coordinates>>) -> String {
        let err = Polygon::try_from_rings(rings).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        err.message().to_string()
    }

    fn ring(points: &[(f64, f64)]) -> Vec<Coordinates> {
        points
            .iter()
            .map(|&(lon, lat)| Coordinates::new(lon, lat))
            .collect()
    }

    #[test]
    fn test_try_from_rings_rejects_bowtie() {
        let bowtie = ring(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0), (0.0, 0.0)]);
        assert_eq!(message(vec![bowtie]), "Polygon rings must not self-intersect");
    }

    #[test]
    fn test_try_from_rings_rejects_repeated_vertices() {
        let repeated = ring(&[(0.0, 0.0), (1.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        assert_eq!(
            message(vec![repeated]),
            "Polygon rings must have at least 3 distinct positions"
        );
    }

    #[test]
    fn test_try_from_rings_rejects_collinear_ring() {
        let collinear = ring(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (0.0, 0.0)]);
        assert!(message(vec![collinear]).starts_with("Polygon ring folds back"));
    }

    #[test]
    fn test_try_from_rings_rejects_pinched_ring() {
        let pinched = ring(&[
            (0.0, 0.0),
            (2.0, 0.0),
            (1.0, 1.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (1.0, 1.0),
            (0.0, 0.0),
        ]);
        assert_eq!(message(vec![pinched]), "Polygon rings must not self-intersect");
    }

    #[test]
    fn test_try_from_rings_accepts_straight_runs_and_duplicates() {
        let with_midpoint = ring(&[
            (0.0, 0.0),
            (1.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (2.0, 2.0),
            (0.0, 2.0),
            (0.0, 0.0),
        ]);
        let polygon = Polygon::try_from_rings(vec![with_midpoint]).unwrap();
        assert!(polygon.contains(Coordinates::new(1.0, 1.0)));
    }

    #[test]
    fn test_serializes_as_geojson() {
        let value = serde_json::to_value(florida()).unwrap();
        assert_eq!(value["type"], "Polygon");
        assert_eq!(value["coordinates"][0][0], serde_json::json!([-80.87, 24.54]));
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(190.0), -170.0);
        assert_eq!(wrap_longitude(-190.0), 170.0);
        assert_eq!(wrap_longitude(180.0), 180.0);
        assert_eq!(wrap_longitude(45.0), 45.0);
    }
}
