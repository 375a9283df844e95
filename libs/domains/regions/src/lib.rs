//! Regions Domain
//!
//! Named polygons owned by a user, with two geospatial queries: which
//! regions contain a point, and which of a user's regions lie within a
//! distance of a point.
//!
//! Region writes are authenticated; the owner of a new region is always the
//! caller. [`RegionService`] also implements [`domain_users::UserDependents`]
//! so deleting a user removes the regions they own.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_regions::{handlers, InMemoryRegionRepository, RegionService};
//! use domain_users::InMemoryUserRepository;
//!
//! let owners = Arc::new(InMemoryUserRepository::new());
//! let service = RegionService::new(InMemoryRegionRepository::new(), owners);
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-that-is-at-least-32-characters"));
//! let router = handlers::router(service, auth);
//! ```

pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod validation;

// Re-export commonly used types
pub use handlers::ApiDoc;
pub use models::{
    CreateRegion, GeometryInput, NearQuery, PointQuery, Region, RegionResponse,
    RegionWithDistance, UpdateRegion,
};
pub use self::mongodb::MongoRegionRepository;
pub use repository::{InMemoryRegionRepository, RegionRepository};
pub use service::RegionService;
