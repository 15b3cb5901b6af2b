pub mod discount_repository;
