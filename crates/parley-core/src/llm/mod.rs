pub mod box_provider;
pub mod image;
pub mod provider;
pub mod registry;
