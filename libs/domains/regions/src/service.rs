use async_trait::async_trait;
use domain_geo::{ClassifiedError, ClassifiedResult, DeleteConfirmation};
use domain_users::{UserDependents, UserRepository, service::parse_user_id};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::models::{
    CreateRegion, NearQuery, PointQuery, Region, RegionResponse, RegionWithDistance, UpdateRegion,
};
use crate::repository::{RegionRepository, region_not_found};
use crate::validation::{
    validate_coordinate_query, validate_proximity_query, validate_region_create,
    validate_region_update,
};

fn parse_region_id(id: &str) -> ClassifiedResult<Uuid> {
    Uuid::parse_str(id.trim())
        .map_err(|_| ClassifiedError::not_found(format!("Region with id '{}' not found", id)))
}

/// Service layer for Region business logic
pub struct RegionService<R: RegionRepository> {
    repository: Arc<R>,
    owners: Arc<dyn UserRepository>,
}

impl<R: RegionRepository> Clone for RegionService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            owners: Arc::clone(&self.owners),
        }
    }
}

impl<R: RegionRepository> RegionService<R> {
    pub fn new(repository: R, owners: Arc<dyn UserRepository>) -> Self {
        Self::from_shared(Arc::new(repository), owners)
    }

    pub fn from_shared(repository: Arc<R>, owners: Arc<dyn UserRepository>) -> Self {
        Self { repository, owners }
    }

    /// Resolve an owner reference to an existing user id
    async fn existing_owner(&self, owner: &str) -> ClassifiedResult<Uuid> {
        let owner_id = parse_user_id(owner)?;
        if !self.owners.exists(owner_id).await? {
            return Err(ClassifiedError::not_found(format!(
                "User with id '{}' not found",
                owner_id
            )));
        }
        Ok(owner_id)
    }

    /// Create a region owned by the authenticated caller
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_region(
        &self,
        input: CreateRegion,
        caller: &str,
    ) -> ClassifiedResult<RegionResponse> {
        let geometry = validate_region_create(&input, caller)?;
        let owner_id = self.existing_owner(caller).await?;

        let region = Region::new(input.name.trim().to_string(), owner_id, geometry);
        let created = self.repository.create(region).await?;

        tracing::info!(region_id = %created.id, owner_id = %owner_id, "Region created");
        Ok(created.into())
    }

    #[instrument(skip(self))]
    pub async fn get_all_regions(&self) -> ClassifiedResult<Vec<RegionResponse>> {
        let regions = self.repository.list().await?;
        Ok(regions.into_iter().map(RegionResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_region_by_id(&self, id: &str) -> ClassifiedResult<RegionResponse> {
        let region_id = parse_region_id(id)?;
        self.repository
            .get_by_id(region_id)
            .await?
            .map(RegionResponse::from)
            .ok_or_else(|| region_not_found(region_id))
    }

    /// Apply a partial update; a new owner must be an existing user
    #[instrument(skip(self, patch))]
    pub async fn update_region(
        &self,
        id: &str,
        patch: UpdateRegion,
    ) -> ClassifiedResult<RegionResponse> {
        let patch = validate_region_update(&patch)?;
        let region_id = parse_region_id(id)?;

        let mut region = self
            .repository
            .get_by_id(region_id)
            .await?
            .ok_or_else(|| region_not_found(region_id))?;

        let owner_id = match patch.owner.as_deref() {
            Some(owner) => Some(self.existing_owner(owner).await?),
            None => None,
        };

        region.apply_update(patch.name, owner_id, patch.geometry);
        let updated = self.repository.update(region).await?;
        Ok(updated.into())
    }

    #[instrument(skip(self))]
    pub async fn delete_region(&self, id: &str) -> ClassifiedResult<DeleteConfirmation> {
        if id.trim().is_empty() {
            return Err(ClassifiedError::bad_request("Region id is required"));
        }
        let region_id = parse_region_id(id)?;

        if !self.repository.delete(region_id).await? {
            return Err(region_not_found(region_id));
        }
        Ok(DeleteConfirmation::deleted())
    }

    /// Regions whose polygon contains the point, boundary included
    #[instrument(skip(self))]
    pub async fn get_regions_containing(
        &self,
        query: PointQuery,
    ) -> ClassifiedResult<Vec<RegionResponse>> {
        let point = validate_coordinate_query(&query)?;

        let regions = self.repository.containing(point).await?;
        if regions.is_empty() {
            return Err(ClassifiedError::not_found(
                "No region contains the given point",
            ));
        }
        Ok(regions.into_iter().map(RegionResponse::from).collect())
    }

    /// An owner's regions within `maxDistance` meters, nearest first
    #[instrument(skip(self))]
    pub async fn get_regions_near(
        &self,
        query: NearQuery,
    ) -> ClassifiedResult<Vec<RegionWithDistance>> {
        let query = validate_proximity_query(&query)?;

        let found = self
            .repository
            .near(query.point, query.max_distance, query.owner_id)
            .await?;
        if found.is_empty() {
            return Err(ClassifiedError::not_found(
                "No region of this user is within the given distance",
            ));
        }

        Ok(found
            .into_iter()
            .map(|(region, distance)| RegionWithDistance {
                region: region.into(),
                distance,
            })
            .collect())
    }
}

#[async_trait]
impl<R: RegionRepository + 'static> UserDependents for RegionService<R> {
    async fn remove_user_dependents(&self, user_id: Uuid) -> ClassifiedResult<u64> {
        self.repository.delete_by_owner(user_id).await
    }
}
