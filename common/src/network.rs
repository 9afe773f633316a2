pub mod addr;
pub mod range;
