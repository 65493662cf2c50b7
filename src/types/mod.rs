// ABOUTME: Validated domain types shared by the engine and its backends.
// ABOUTME: Versions, service names, and image references.

mod image_ref;
mod service_name;
mod version;

pub use image_ref::{DEFAULT_TAG, ImageRef, ParseImageRefError};
pub use service_name::{ServiceName, ServiceNameError};
pub use version::{Version, VersionError, parse_version_list};
