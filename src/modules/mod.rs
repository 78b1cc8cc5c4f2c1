pub mod geo;
pub mod shipping;
