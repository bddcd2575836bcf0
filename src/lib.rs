pub mod app_config;
pub mod backend;
pub mod dispatcher;
pub mod domain;
pub mod reconciler;
pub mod store;
pub mod store_listener;
pub mod supervisor;
