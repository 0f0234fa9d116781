//! Data Transfer Objects for REST request/response serialization.
//!
//! Domain types that already have the right wire shape (gate decisions,
//! profiles, billing payloads) are returned as-is; the types here cover
//! request bodies and the views that differ from the domain model.

pub mod billing_dto;
pub mod common_dto;
pub mod onboarding_dto;
pub mod prediction_dto;
pub mod profile_dto;

pub use billing_dto::*;
pub use common_dto::*;
pub use onboarding_dto::*;
pub use prediction_dto::*;
pub use profile_dto::*;
