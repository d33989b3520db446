//! Errors for this library
//!
//! The simulation itself never fails, bad numbers are clamped or defaulted. Only looking things
//! up by name can go wrong.

/// All the known errors returned by this crate.
#[derive(Debug, snafu::Snafu)]
#[snafu(visibility(pub(crate)))]
#[non_exhaustive]
pub enum FieldError {
    #[snafu(display("Unknown preset `{name}`, expected one of: {expected}"))]
    /// A preset name that doesn't match any of the bundled presets.
    UnknownPreset {
        /// The name that was asked for
        name: String,
        /// The names that are available
        expected: String,
    },
}
