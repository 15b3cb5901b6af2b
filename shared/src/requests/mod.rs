pub mod create_discount;
pub mod list_discounts;
