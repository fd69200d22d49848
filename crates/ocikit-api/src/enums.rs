//! Open enum support.
//!
//! Every enum in the service models is *open*: values the service adds after
//! this client was built deserialize to an `UnknownEnumValue` variant instead
//! of failing. Going the other way, the sentinel is never sent, and string
//! input is parsed case-insensitively with a descriptive error.

use std::str::FromStr;

use strum::VariantNames;

use crate::error::Error;

/// Wire name of the sentinel variant shared by all open enums.
pub const UNKNOWN_ENUM_VALUE: &str = "UNKNOWN_ENUM_VALUE";

/// Parse caller input into an open enum.
///
/// Matching is case-insensitive. The sentinel itself is rejected: it only
/// exists to represent server values this client does not know about.
pub fn parse_enum<E>(parameter: &'static str, value: &str) -> Result<E, Error>
where
    E: FromStr + AsRef<str> + VariantNames,
{
    match value.parse::<E>() {
        Ok(parsed) if parsed.as_ref() != UNKNOWN_ENUM_VALUE => Ok(parsed),
        _ => Err(invalid_enum_value::<E>(parameter, value)),
    }
}

/// Check a typed enum before it is sent and return its wire form.
pub fn validate_enum<E>(parameter: &'static str, value: &E) -> Result<String, Error>
where
    E: AsRef<str> + VariantNames,
{
    let wire = value.as_ref();
    if wire == UNKNOWN_ENUM_VALUE {
        return Err(invalid_enum_value::<E>(parameter, wire));
    }
    Ok(wire.to_owned())
}

/// Known wire values of an open enum, sentinel excluded.
pub fn known_values<E: VariantNames>() -> impl Iterator<Item = &'static str> {
    E::VARIANTS
        .iter()
        .copied()
        .filter(|v| *v != UNKNOWN_ENUM_VALUE)
}

fn invalid_enum_value<E: VariantNames>(parameter: &'static str, value: &str) -> Error {
    Error::InvalidEnumValue {
        parameter,
        value: value.to_owned(),
        allowed: known_values::<E>().collect::<Vec<_>>().join(", "),
    }
}

// ── Declaration macro ────────────────────────────────────────────────

/// Declare an open enum: `SCREAMING_SNAKE_CASE` on the wire, parsed
/// case-insensitively, with a trailing `UnknownEnumValue` sentinel that
/// absorbs any value this client does not know.
macro_rules! open_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
            ::strum::Display,
            ::strum::EnumString,
            ::strum::AsRefStr,
            ::strum::VariantNames,
        )]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        #[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
        #[non_exhaustive]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this client version does not recognize.
            #[serde(other)]
            UnknownEnumValue,
        }
    };
}

pub(crate) use open_enum;

// ── Enums shared by both services ───────────────────────────────────

open_enum! {
    /// Sort direction for list operations.
    pub enum SortOrder {
        Asc,
        Desc,
    }
}

open_enum! {
    /// Sort key for list operations that sort by creation time or name.
    pub enum SortBy {
        #[serde(rename = "TIMECREATED")]
        #[strum(serialize = "TIMECREATED")]
        TimeCreated,
        #[serde(rename = "DISPLAYNAME")]
        #[strum(serialize = "DISPLAYNAME")]
        DisplayName,
    }
}
