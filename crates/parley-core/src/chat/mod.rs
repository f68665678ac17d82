pub mod box_store;
pub mod locks;
pub mod service;
pub mod session;
pub mod store;
