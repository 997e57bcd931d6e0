//! Settings fixed at `init` time.

/// The GL version the host created its context with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}
impl Version {
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}
impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

bitflags::bitflags! {
    /// Categories of diagnostics the layer reports.
    ///
    /// Turning a category off silences its messages only. The shadow state is updated exactly
    /// as it would be otherwise, including calls that are dropped for referencing unknown objects.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Checks: u32 {
        /// A call named an object the layer is not tracking.
        const HANDLES = 1 << 0;
        /// Shader compile status never checked, failed, or the shader was compiled twice.
        const SHADER_STATUS = 1 << 1;
        /// Program link status never checked or failed.
        const PROGRAM_STATUS = 1 << 2;
        /// A texture was used with a target other than the one it was first bound to.
        const TEXTURE_TARGET = 1 << 3;
    }
}
impl Default for Checks {
    fn default() -> Self {
        Self::all()
    }
}

/// Everything [`crate::Layer::init`] needs to know up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Config {
    pub version: Version,
    pub checks: Checks,
}
impl Config {
    #[must_use]
    pub fn new(version: Version) -> Self {
        Self {
            version,
            checks: Checks::default(),
        }
    }
    /// Replace the set of reported diagnostic categories.
    #[must_use]
    pub fn with_checks(mut self, checks: Checks) -> Self {
        self.checks = checks;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_reports_everything() {
        let config = Config::new(Version::new(3, 3));
        assert_eq!(config.checks, Checks::all());
        assert_eq!(config.version.to_string(), "3.3");
    }

    #[test]
    fn versions_order_by_major_then_minor() {
        assert!(Version::new(4, 5) > Version::new(3, 3));
        assert!(Version::new(4, 5) > Version::new(4, 1));
    }
}
