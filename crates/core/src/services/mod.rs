pub mod chart_service;
pub mod finances_service;
pub mod growth_estimator;
pub mod history_filter;
pub mod projection_generator;
pub mod projection_service;
