pub mod aging;
pub mod error;
pub mod kpis;
pub mod profitability;
pub mod revenue;
pub mod rfm;
pub mod summary;
pub mod types;

pub use error::AnalyticsError;
pub use types::*;

/// Standard result type for all analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
