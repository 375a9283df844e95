use async_trait::async_trait;
use domain_geo::{ClassifiedError, ClassifiedResult, Coordinates};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::Region;

pub(crate) fn region_not_found(id: Uuid) -> ClassifiedError {
    ClassifiedError::not_found(format!("Region with id '{}' not found", id))
}

/// Repository trait for Region persistence
///
/// Implementations answer the two geospatial predicates with the same
/// semantics: boundary points are contained, and distances are spherical
/// meters that are zero inside the polygon.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegionRepository: Send + Sync {
    async fn create(&self, region: Region) -> ClassifiedResult<Region>;

    /// All regions, oldest first
    async fn list(&self) -> ClassifiedResult<Vec<Region>>;

    async fn get_by_id(&self, id: Uuid) -> ClassifiedResult<Option<Region>>;

    /// Replace a stored region. Fails `NotFound` if it no longer exists.
    async fn update(&self, region: Region) -> ClassifiedResult<Region>;

    /// `false` when nothing matched
    async fn delete(&self, id: Uuid) -> ClassifiedResult<bool>;

    /// Regions whose polygon contains or touches `point`
    async fn containing(&self, point: Coordinates) -> ClassifiedResult<Vec<Region>>;

    /// `owner`'s regions within `max_distance` meters of `point`, nearest
    /// first, each paired with its distance
    async fn near(
        &self,
        point: Coordinates,
        max_distance: f64,
        owner: Uuid,
    ) -> ClassifiedResult<Vec<(Region, f64)>>;

    /// Remove every region owned by `owner`, returning how many were removed
    async fn delete_by_owner(&self, owner: Uuid) -> ClassifiedResult<u64>;
}

/// In-memory implementation of RegionRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryRegionRepository {
    regions: Arc<RwLock<HashMap<Uuid, Region>>>,
}

impl InMemoryRegionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegionRepository for InMemoryRegionRepository {
    async fn create(&self, region: Region) -> ClassifiedResult<Region> {
        self.regions.write().await.insert(region.id, region.clone());

        tracing::info!(region_id = %region.id, "Region created successfully");
        Ok(region)
    }

    async fn list(&self) -> ClassifiedResult<Vec<Region>> {
        let regions = self.regions.read().await;
        let mut result: Vec<Region> = regions.values().cloned().collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn get_by_id(&self, id: Uuid) -> ClassifiedResult<Option<Region>> {
        Ok(self.regions.read().await.get(&id).cloned())
    }

    async fn update(&self, region: Region) -> ClassifiedResult<Region> {
        let mut regions = self.regions.write().await;

        match regions.get_mut(&region.id) {
            Some(stored) => *stored = region.clone(),
            None => return Err(region_not_found(region.id)),
        }

        tracing::info!(region_id = %region.id, "Region updated successfully");
        Ok(region)
    }

    async fn delete(&self, id: Uuid) -> ClassifiedResult<bool> {
        let removed = self.regions.write().await.remove(&id).is_some();
        if removed {
            tracing::info!(region_id = %id, "Region deleted successfully");
        }
        Ok(removed)
    }

    async fn containing(&self, point: Coordinates) -> ClassifiedResult<Vec<Region>> {
        let mut result: Vec<Region> = self
            .regions
            .read()
            .await
            .values()
            .filter(|region| region.geometry.contains(point))
            .cloned()
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn near(
        &self,
        point: Coordinates,
        max_distance: f64,
        owner: Uuid,
    ) -> ClassifiedResult<Vec<(Region, f64)>> {
        let mut result: Vec<(Region, f64)> = self
            .regions
            .read()
            .await
            .values()
            .filter(|region| region.owner_id == owner)
            .map(|region| (region.clone(), region.geometry.distance_to(point)))
            .filter(|(_, distance)| *distance <= max_distance)
            .collect();
        result.sort_by(|(a, da), (b, db)| da.total_cmp(db).then(a.id.cmp(&b.id)));
        Ok(result)
    }

    async fn delete_by_owner(&self, owner: Uuid) -> ClassifiedResult<u64> {
        let mut regions = self.regions.write().await;
        let before = regions.len();
        regions.retain(|_, region| region.owner_id != owner);
        let removed = (before - regions.len()) as u64;

        tracing::info!(owner_id = %owner, removed, "Regions removed for owner");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_geo::Polygon;

    fn square(name: &str, owner: Uuid, lon: f64, lat: f64) -> Region {
        Region::new(
            name.to_string(),
            owner,
            Polygon::from_ring(vec![
                Coordinates::new(lon, lat),
                Coordinates::new(lon + 1.0, lat),
                Coordinates::new(lon + 1.0, lat + 1.0),
                Coordinates::new(lon, lat + 1.0),
                Coordinates::new(lon, lat),
            ]),
        )
    }

    #[tokio::test]
    async fn test_containing_includes_boundary() {
        let repo = InMemoryRegionRepository::new();
        let owner = Uuid::now_v7();
        let a = repo.create(square("a", owner, 0.0, 0.0)).await.unwrap();
        repo.create(square("b", owner, 10.0, 10.0)).await.unwrap();

        let inside = repo.containing(Coordinates::new(0.5, 0.5)).await.unwrap();
        assert_eq!(inside, vec![a.clone()]);

        let edge = repo.containing(Coordinates::new(1.0, 0.5)).await.unwrap();
        assert_eq!(edge, vec![a]);

        assert!(repo.containing(Coordinates::new(50.0, 50.0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_near_orders_by_distance_and_filters_owner() {
        let repo = InMemoryRegionRepository::new();
        let owner = Uuid::now_v7();
        let other = Uuid::now_v7();
        let far = repo.create(square("far", owner, 3.0, 0.0)).await.unwrap();
        let close = repo.create(square("close", owner, 0.0, 0.0)).await.unwrap();
        repo.create(square("other", other, 0.0, 0.0)).await.unwrap();

        let found = repo
            .near(Coordinates::new(0.5, 0.5), 1_000_000.0, owner)
            .await
            .unwrap();

        let ids: Vec<Uuid> = found.iter().map(|(r, _)| r.id).collect();
        assert_eq!(ids, vec![close.id, far.id]);
        assert_eq!(found[0].1, 0.0);
        assert!(found[1].1 > 200_000.0);
    }

    #[tokio::test]
    async fn test_near_respects_max_distance() {
        let repo = InMemoryRegionRepository::new();
        let owner = Uuid::now_v7();
        repo.create(square("far", owner, 3.0, 0.0)).await.unwrap();

        let found = repo
            .near(Coordinates::new(0.5, 0.5), 1_000.0, owner)
            .await
            .unwrap();
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_delete_by_owner() {
        let repo = InMemoryRegionRepository::new();
        let owner = Uuid::now_v7();
        let keep = repo
            .create(square("keep", Uuid::now_v7(), 0.0, 0.0))
            .await
            .unwrap();
        repo.create(square("a", owner, 0.0, 0.0)).await.unwrap();
        repo.create(square("b", owner, 5.0, 5.0)).await.unwrap();

        assert_eq!(repo.delete_by_owner(owner).await.unwrap(), 2);
        assert_eq!(repo.list().await.unwrap(), vec![keep]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryRegionRepository::new();
        let err = repo
            .update(square("ghost", Uuid::now_v7(), 0.0, 0.0))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), domain_geo::ErrorKind::NotFound);
    }
}
