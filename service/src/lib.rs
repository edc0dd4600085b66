pub mod app_services;
pub mod entitlement;
pub mod error;
pub mod photo_groups;
pub mod pipeline;
pub mod settings_service;
pub mod staged_deletion;
pub mod staging_store;
pub mod triage_service;
pub mod triage_session;
