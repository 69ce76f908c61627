pub mod constants;
pub mod crypto;
pub mod types;
pub mod xml;
