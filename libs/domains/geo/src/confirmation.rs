use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned by delete operations in place of the removed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeleteConfirmation {
    #[schema(example = true)]
    pub deleted: bool,
}

impl DeleteConfirmation {
    pub const fn deleted() -> Self {
        Self { deleted: true }
    }
}
