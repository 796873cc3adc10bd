//! Handle literals: `0x<hex> [<name>]`.
//!
//! Dump files reference driver objects by an opaque handle rendered as
//! a hexadecimal id followed by a bracketed symbolic name, e.g.
//! `0x1a2b [VkInstance]`. The decoder is a fixed three-token scan:
//! `0x` prefix, hex digits, optional spacing, then the bracketed name,
//! which must close the literal.

use crate::error::ParseError;

/// A decoded driver-object handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Handle {
    /// Numeric id, the hex digits read as an unsigned 64-bit integer.
    pub value: u64,
    /// Symbolic name, the bracketed text verbatim.
    pub name: String,
}

impl Handle {
    /// Decode a handle literal.
    ///
    /// Anything that deviates from the grammar fails with
    /// [`ParseError::HandleFormat`] carrying the literal: a missing
    /// `0x`, no hex digits, an id wider than 64 bits, non-whitespace
    /// between the digits and `[`, or a name that does not end the
    /// literal at its closing `]`.
    pub fn parse(literal: &str) -> Result<Self, ParseError> {
        let fail = || ParseError::HandleFormat {
            literal: literal.to_owned(),
        };

        let rest = literal.strip_prefix("0x").ok_or_else(fail)?;
        let digits_len = rest
            .bytes()
            .take_while(u8::is_ascii_hexdigit)
            .count();
        if digits_len == 0 {
            return Err(fail());
        }
        let (digits, rest) = rest.split_at(digits_len);
        let value = u64::from_str_radix(digits, 16).map_err(|_| fail())?;

        let rest = rest.trim_start_matches([' ', '\t']);
        let rest = rest.strip_prefix('[').ok_or_else(fail)?;
        let name = rest.strip_suffix(']').ok_or_else(fail)?;
        // The name stops at the first `]`; anything after it is trailing
        // garbage, not part of the name.
        if name.contains(']') {
            return Err(fail());
        }

        Ok(Handle {
            value,
            name: name.to_owned(),
        })
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:x} [{}]", self.value, self.name)
    }
}
