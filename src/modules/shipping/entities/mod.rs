pub mod method;
pub mod quote;
pub mod zone;
