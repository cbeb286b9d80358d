pub mod category;
pub mod chart;
pub mod filter;
pub mod finances;
pub mod history;
pub mod projection;
