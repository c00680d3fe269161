// Library for tests to access modules

pub mod cleanup;
pub mod cloudwatch_repo;
pub mod config;
pub mod error;
pub mod inventory_repo;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod selector;
pub mod version;
pub mod window;
