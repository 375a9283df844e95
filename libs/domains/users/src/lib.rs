//! Users Domain
//!
//! Accounts whose address and coordinates are kept consistent through the
//! geocoder, plus the login operation that issues bearer tokens.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /users and /sessions endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  Services   │  ← UserService (geocoding, hashing), SessionService (tokens)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← trait + in-memory and MongoDB implementations
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use domain_geo::{GeocoderConfig, NominatimGeocoder};
//! use domain_users::{handlers, InMemoryUserRepository, UserService};
//!
//! let geocoder = NominatimGeocoder::new(&GeocoderConfig::default()).unwrap();
//! let service = UserService::new(InMemoryUserRepository::new(), Arc::new(geocoder));
//! let router = handlers::router(service);
//! ```

pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod password;
pub mod repository;
pub mod service;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use handlers::{ApiDoc, SessionsApiDoc};
pub use models::{CreateUser, LoginRequest, SessionToken, UpdateUser, User, UserResponse};
pub use self::mongodb::MongoUserRepository;
pub use repository::{InMemoryUserRepository, UserDependents, UserRepository};
pub use service::UserService;
pub use session::SessionService;
pub use validation::Location;
