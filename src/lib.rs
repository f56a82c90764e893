pub mod cli;
pub mod config;
pub mod crm;
pub mod error;
pub mod export;
pub mod invoice;
pub mod reconcile;
