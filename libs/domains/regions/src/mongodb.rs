//! MongoDB implementation of RegionRepository
//!
//! Geospatial predicates run server-side against a `2dsphere` index on
//! `geometry`: containment with `$geoIntersects`, proximity with a
//! `$geoNear` aggregation stage (spherical, distances in meters).

use async_trait::async_trait;
use domain_geo::{ClassifiedError, ClassifiedResult, Coordinates};
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Binary, Bson, Document, doc, from_document, spec::BinarySubtype},
    options::IndexOptions,
};
use tracing::instrument;
use uuid::Uuid;

use crate::models::Region;
use crate::repository::{RegionRepository, region_not_found};

pub const REGIONS_COLLECTION: &str = "regions";

/// Field `$geoNear` writes the computed distance into
const DISTANCE_FIELD: &str = "distance";

/// MongoDB implementation of the RegionRepository
#[derive(Clone)]
pub struct MongoRegionRepository {
    collection: Collection<Region>,
}

impl MongoRegionRepository {
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, REGIONS_COLLECTION)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<Region>(collection_name),
        }
    }

    /// `2dsphere` on `geometry` (required by `$geoNear`) and an owner index
    #[instrument(skip(self))]
    pub async fn ensure_indexes(&self) -> ClassifiedResult<()> {
        let geometry = IndexModel::builder()
            .keys(doc! { "geometry": "2dsphere" })
            .options(
                IndexOptions::builder()
                    .name("geometry_2dsphere".to_string())
                    .build(),
            )
            .build();
        let owner = IndexModel::builder()
            .keys(doc! { "user": 1 })
            .options(IndexOptions::builder().name("user".to_string()).build())
            .build();

        self.collection.create_indexes([geometry, owner]).await?;
        tracing::info!(collection = %self.collection.name(), "Region indexes ensured");
        Ok(())
    }

    /// UUIDs as the driver stores them on insert (generic binary)
    fn uuid_bson(id: Uuid) -> Bson {
        Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: id.as_bytes().to_vec(),
        })
    }

    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": Self::uuid_bson(id) }
    }

    fn owner_filter(owner: Uuid) -> Document {
        doc! { "user": Self::uuid_bson(owner) }
    }

    fn geo_point(point: Coordinates) -> Document {
        doc! {
            "type": "Point",
            "coordinates": [point.longitude, point.latitude],
        }
    }

    fn containing_filter(point: Coordinates) -> Document {
        doc! {
            "geometry": {
                "$geoIntersects": { "$geometry": Self::geo_point(point) }
            }
        }
    }

    fn near_pipeline(point: Coordinates, max_distance: f64, owner: Uuid) -> Vec<Document> {
        vec![doc! {
            "$geoNear": {
                "near": Self::geo_point(point),
                "key": "geometry",
                "distanceField": DISTANCE_FIELD,
                "maxDistance": max_distance,
                "spherical": true,
                "query": Self::owner_filter(owner),
            }
        }]
    }

    /// Split a `$geoNear` output document into the region and its distance
    fn region_with_distance(mut document: Document) -> ClassifiedResult<(Region, f64)> {
        let distance = document
            .remove(DISTANCE_FIELD)
            .and_then(|value| value.as_f64())
            .ok_or_else(|| ClassifiedError::internal("$geoNear result without distance"))?;
        let region = from_document::<Region>(document)?;
        Ok((region, distance))
    }
}

#[async_trait]
impl RegionRepository for MongoRegionRepository {
    #[instrument(skip(self, region), fields(region_id = %region.id))]
    async fn create(&self, region: Region) -> ClassifiedResult<Region> {
        self.collection.insert_one(&region).await?;

        tracing::info!(region_id = %region.id, "Region created successfully");
        Ok(region)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> ClassifiedResult<Vec<Region>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> ClassifiedResult<Option<Region>> {
        Ok(self.collection.find_one(Self::id_filter(id)).await?)
    }

    #[instrument(skip(self, region), fields(region_id = %region.id))]
    async fn update(&self, region: Region) -> ClassifiedResult<Region> {
        let result = self
            .collection
            .replace_one(Self::id_filter(region.id), &region)
            .await?;

        if result.matched_count == 0 {
            return Err(region_not_found(region.id));
        }

        tracing::info!(region_id = %region.id, "Region updated successfully");
        Ok(region)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> ClassifiedResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(region_id = %id, "Region deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn containing(&self, point: Coordinates) -> ClassifiedResult<Vec<Region>> {
        let cursor = self
            .collection
            .find(Self::containing_filter(point))
            .sort(doc! { "created_at": 1, "_id": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    #[instrument(skip(self))]
    async fn near(
        &self,
        point: Coordinates,
        max_distance: f64,
        owner: Uuid,
    ) -> ClassifiedResult<Vec<(Region, f64)>> {
        let documents: Vec<Document> = self
            .collection
            .aggregate(Self::near_pipeline(point, max_distance, owner))
            .await?
            .try_collect()
            .await?;

        documents
            .into_iter()
            .map(Self::region_with_distance)
            .collect()
    }

    #[instrument(skip(self))]
    async fn delete_by_owner(&self, owner: Uuid) -> ClassifiedResult<u64> {
        let result = self
            .collection
            .delete_many(Self::owner_filter(owner))
            .await?;

        tracing::info!(owner_id = %owner, removed = result.deleted_count, "Regions removed for owner");
        Ok(result.deleted_count)
    }
}
