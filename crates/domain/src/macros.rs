//! Macro for implementing Display and FromStr for wire-name enums
//!
//! Configuration enums (wire format, log format) and the command action are
//! written as lowercase names in config files, environment variables and on
//! the wire. This macro provides both conversions from one mapping.
//!
//! # Example
//!
//! ```rust
//! use stitch_domain::impl_wire_name_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Compression {
//!     None,
//!     Gzip,
//! }
//!
//! impl_wire_name_conversions!(Compression {
//!     None => "none",
//!     Gzip => "gzip",
//! });
//! ```

/// Implements Display and FromStr traits for wire-name enums
///
/// - Display writes the canonical lowercase name
/// - FromStr parses case-insensitively and also accepts `-` in place of `_`
#[macro_export]
macro_rules! impl_wire_name_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().replace('-', "_").as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
