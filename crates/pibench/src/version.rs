//! Version information.

/// Crate version.
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Version line shown in verbose banners.
#[must_use]
pub fn full_version() -> String {
    format!("pibench {}", version())
}
