//! Macro for implementing Display and FromStr for wire enums
//!
//! Wire enums (vote types, engine states) travel as fixed upper-case tokens.
//! The macro keeps their string form in one place and parses
//! case-insensitively so hand-edited documents still decode.
//!
//! # Example
//!
//! ```rust
//! use timealign_domain::impl_wire_enum_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Answer {
//!     Accept,
//!     Decline,
//! }
//!
//! impl_wire_enum_conversions!(Answer {
//!     Accept => "ACCEPT",
//!     Decline => "DECLINE",
//! });
//!
//! assert_eq!(Answer::Accept.to_string(), "ACCEPT");
//! assert_eq!("decline".parse::<Answer>().unwrap(), Answer::Decline);
//! ```

/// Implements Display and FromStr traits for wire enums
///
/// - Display writes the exact token given for each variant
/// - FromStr accepts any ASCII casing of that token
#[macro_export]
macro_rules! impl_wire_enum_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                $(
                    if s.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}
