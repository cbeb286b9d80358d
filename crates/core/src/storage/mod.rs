pub mod json_store;
pub mod lock;
pub mod memory;
pub mod traits;
