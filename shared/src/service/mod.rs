pub mod discount_service;
