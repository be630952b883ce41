pub mod aggregator;
pub mod audit;
pub mod engine;
pub mod resolver;

pub use crate::domain::model::{CalculationRequest, CalculationResult, ComponentFeeResult};
pub use crate::domain::ports::{RateSource, RuleSource};
pub use crate::utils::error::Result;
