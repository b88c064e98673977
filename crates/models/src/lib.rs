//! SeaORM entities for the scheduling tenants and their bookable catalog.
//!
//! Field validation lives next to each entity; orchestration (existence
//! checks, transactions, cascades) belongs to the `service` crate.

pub mod errors;
pub mod db;
pub mod enums;
pub mod validation;
pub mod organization;
pub mod location;
pub mod resource;
pub mod offering;
pub mod organization_settings;

pub type Organization = organization::Model;
pub type Location = location::Model;
pub type Resource = resource::Model;
/// HTTP-facing name of an offering.
pub type Service = offering::Model;
pub type OrganizationSettings = organization_settings::Model;
