// src/catalog/mod.rs

pub mod loader;
pub mod model;
pub mod store;
pub mod validate;

pub use loader::load;
pub use store::{Catalog, CampaignCatalog, CampaignDefinition, PoolCatalog, PoolDefinition};
