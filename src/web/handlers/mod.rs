//! HTML template rendering handlers for public pages.

mod press_release;

pub use press_release::{PressReleaseTemplate, press_release_view_handler};
