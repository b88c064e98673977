//! Service layer providing tenant-scoped CRUD operations on top of models.
//! - Existence checks and tenant scoping happen here, never in handlers.
//! - Multi-row writes (bootstrap, cascades, primary switch) run in one transaction.
//! - Every failure is a `ServiceError`; the HTTP layer maps it to a status code.

pub mod errors;
pub mod pagination;
mod fields;
pub mod organization_service;
pub mod location_service;
pub mod resource_service;
pub mod offering_service;
pub mod settings_service;
#[cfg(test)]
pub mod test_support;
