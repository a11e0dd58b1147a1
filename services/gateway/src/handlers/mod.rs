pub mod orders;
pub mod trades;
