//! Input checks run before any geocoding or persistence side effect.

use domain_geo::{ClassifiedError, ClassifiedResult, Coordinates};

use crate::models::{CreateUser, LoginRequest, UpdateUser};

pub const LOCATION_EXCLUSIVE: &str = "Only one of address or coordinates should be passed!";
pub const ADDRESS_BLANK: &str = "Address cannot be empty";
pub const INVALID_COORDINATES: &str =
    "Coordinates must be [longitude, latitude] within WGS-84 bounds";

/// The caller-supplied, authoritative half of a user's location
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Address(String),
    Coordinates(Coordinates),
}

fn require(value: &str, message: &str) -> ClassifiedResult<()> {
    if value.trim().is_empty() {
        return Err(ClassifiedError::bad_request(message));
    }
    Ok(())
}

/// Only an absent or empty address counts as not given.
fn present_address(address: Option<&str>) -> Option<&str> {
    address.filter(|a| !a.is_empty())
}

fn location(
    address: Option<&str>,
    coordinates: Option<Coordinates>,
) -> ClassifiedResult<Option<Location>> {
    match (present_address(address), coordinates) {
        (Some(_), Some(_)) => Err(ClassifiedError::bad_request(LOCATION_EXCLUSIVE)),
        (Some(address), None) if address.trim().is_empty() => {
            Err(ClassifiedError::bad_request(ADDRESS_BLANK))
        }
        (Some(address), None) => Ok(Some(Location::Address(address.trim().to_string()))),
        (None, Some(coordinates)) if !coordinates.is_valid() => {
            Err(ClassifiedError::bad_request(INVALID_COORDINATES))
        }
        (None, Some(coordinates)) => Ok(Some(Location::Coordinates(coordinates))),
        (None, None) => Ok(None),
    }
}

/// Required fields plus exactly one of address/coordinates.
pub fn validate_user_create(input: &CreateUser) -> ClassifiedResult<Location> {
    require(&input.name, "Name is required")?;
    require(&input.email, "Email is required")?;
    require(&input.password, "Password is required")?;

    location(input.address.as_deref(), input.coordinates)?
        .ok_or_else(|| ClassifiedError::bad_request(LOCATION_EXCLUSIVE))
}

/// Checks only the fields present in the patch. `None` leaves location as is.
pub fn validate_user_update(patch: &UpdateUser) -> ClassifiedResult<Option<Location>> {
    if let Some(name) = &patch.name {
        require(name, "Name cannot be empty")?;
    }
    if let Some(email) = &patch.email {
        require(email, "Email cannot be empty")?;
    }
    if let Some(password) = &patch.password {
        require(password, "Password cannot be empty")?;
    }
    if patch.address.as_deref().is_some_and(|a| a.trim().is_empty()) {
        return Err(ClassifiedError::bad_request(ADDRESS_BLANK));
    }

    location(patch.address.as_deref(), patch.coordinates)
}

pub fn validate_login(input: &LoginRequest) -> ClassifiedResult<()> {
    require(&input.email, "Email is required")?;
    require(&input.password, "Password is required")
}
