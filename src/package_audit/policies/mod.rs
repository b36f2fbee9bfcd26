mod license_detection;

pub use license_detection::{LicenseDetector, LICENSE_TOKENS};
