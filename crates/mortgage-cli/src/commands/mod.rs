pub mod affordability;
pub mod land_transfer;
pub mod monthly_cost;
pub mod payment;
