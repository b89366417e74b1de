pub mod automation;
pub mod error;
pub mod providers;
pub mod template_matching;

#[cfg(test)]
mod test_support;

pub use automation::{
    Automation, BoundingRegion, CropRect, FindKind, FindOptions, LocatorConfig, Point,
    RelativeOffset, RetryOutcome, retry_with_timeout, wait_until,
};
pub use error::{LocatorError, LocatorResult};
pub use template_matching::{MatchMethod, MatchResult, ScaleRange, TemplateMatcher};
