pub mod common;
pub mod value;
