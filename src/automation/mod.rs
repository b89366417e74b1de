//! Element resolution for UI automation
//!
//! An [`Automation`] session captures a window, finds targets in the capture
//! by template matching or OCR, and turns them into screen coordinates for
//! clicks and focused text reads.

pub mod config;
pub mod region_text;
pub mod retry;
pub mod session;
pub mod types;


// Re-export main types and functions
pub use config::{LocatorConfig, create_fast_config, create_strict_config};
pub use retry::{RetryOutcome, retry_with_timeout, wait_until};
pub use session::{Automation, text_matches};
pub use types::{BoundingRegion, CropRect, FindKind, FindOptions, Point, RelativeOffset};
