// Collaborators the locator depends on: screen capture, OCR and input.
// The traits are the contracts; the concrete types here are offline
// implementations (image files, dry-run input) used by the CLI and tests.

pub mod input;
pub mod ocr;
pub mod screenshot;
pub mod types;

pub use input::{InputEvent, LoggingInput};
pub use ocr::UnavailableOcr;
pub use screenshot::ImageScreenshot;
pub use types::{Capture, InputProvider, OcrBox, OcrLine, OcrProvider, ScreenshotProvider};
