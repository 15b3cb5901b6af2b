pub mod discount;
pub mod identity;
pub mod shared_info;
