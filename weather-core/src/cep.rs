use std::fmt;

/// Number of digits in a Brazilian postal code.
pub const CEP_LEN: usize = 8;

/// Returns `true` iff `input` is exactly eight ASCII decimal digits.
///
/// No trimming or punctuation stripping happens here: `"01001-000"` and
/// `" 01001000"` are both rejected.
pub fn is_valid_cep(input: &str) -> bool {
    input.len() == CEP_LEN && input.bytes().all(|b| b.is_ascii_digit())
}

/// A postal code that already passed [`is_valid_cep`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    pub fn parse(input: &str) -> Option<Self> {
        is_valid_cep(input).then(|| Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
