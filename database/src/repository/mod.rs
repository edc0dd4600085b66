pub mod setting_repository;
