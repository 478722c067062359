use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Length of a CPF given as bare digits, e.g. `12345678901`
pub const RAW_LEN: usize = 11;

/// Length of a CPF in its punctuated form, e.g. `123.456.789-01`
pub const CANONICAL_LEN: usize = 14;

/// Normalize a CPF into the punctuated `DDD.DDD.DDD-DD` form used for storage.
///
/// Validation is purely structural: an 11 digit string is reformatted, a
/// 14 character string is assumed to already be canonical and is returned
/// as is. No check digit verification is performed.
pub fn normalize(raw: &str) -> Result<String, Error> {
    let len = raw.chars().count();

    if len < RAW_LEN {
        return Err(Error::InvalidInput("CPF too short".to_string()));
    }

    match len {
        RAW_LEN => {
            if !raw.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::InvalidInput("CPF invalid".to_string()));
            }
            Ok(format!(
                "{}.{}.{}-{}",
                &raw[0..3],
                &raw[3..6],
                &raw[6..9],
                &raw[9..11]
            ))
        }
        CANONICAL_LEN => Ok(raw.to_string()),
        _ => Err(Error::InvalidInput("CPF invalid".to_string())),
    }
}

/// A CPF in canonical form. Only obtainable through [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    pub fn parse(raw: &str) -> Result<Self, Error> {
        normalize(raw).map(Cpf)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Cpf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cpf::parse(s)
    }
}

impl TryFrom<String> for Cpf {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Cpf::parse(&value)
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_bare_digits() {
        assert_eq!(normalize("12345678901").unwrap(), "123.456.789-01");
        assert_eq!(normalize("00000000000").unwrap(), "000.000.000-00");
    }

    #[test]
    fn formatted_output_keeps_digit_order() {
        for seed in [0u64, 7, 12_345_678_901, 98_765_432_109, 99_999_999_999] {
            let raw = format!("{:011}", seed);
            let out = normalize(&raw).unwrap();
            assert_eq!(out.len(), CANONICAL_LEN);
            assert_eq!(&out[3..4], ".");
            assert_eq!(&out[7..8], ".");
            assert_eq!(&out[11..12], "-");
            let digits: String = out.chars().filter(|c| c.is_ascii_digit()).collect();
            assert_eq!(digits, raw);
        }
    }

    #[test]
    fn canonical_form_is_unchanged() {
        assert_eq!(normalize("123.456.789-01").unwrap(), "123.456.789-01");
        // no punctuation placement check on 14 character input
        assert_eq!(normalize("12345678901234").unwrap(), "12345678901234");
        assert_eq!(normalize("abcdefghijklmn").unwrap(), "abcdefghijklmn");
    }

    #[test]
    fn rejects_short_input() {
        for raw in ["", "1", "1234567890", "123.456.78"] {
            match normalize(raw) {
                Err(Error::InvalidInput(msg)) => assert_eq!(msg, "CPF too short"),
                other => panic!("expected invalid input for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_intermediate_and_long_lengths() {
        for raw in ["123456789012", "1234567890123", "123.456.789-012"] {
            match normalize(raw) {
                Err(Error::InvalidInput(msg)) => assert_eq!(msg, "CPF invalid"),
                other => panic!("expected invalid input for {raw:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn rejects_eleven_non_digits() {
        assert!(matches!(normalize("1234567890a"), Err(Error::InvalidInput(_))));
        assert!(matches!(normalize("123.456.789"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn raw_and_canonical_parse_to_same_cpf() {
        let raw = Cpf::parse("12345678901").unwrap();
        let canonical: Cpf = "123.456.789-01".parse().unwrap();
        assert_eq!(raw, canonical);
        assert_eq!(raw.to_string(), "123.456.789-01");
    }

    #[test]
    fn deserializes_through_normalizer() {
        let cpf: Cpf = serde_json::from_str("\"12345678901\"").unwrap();
        assert_eq!(cpf.as_str(), "123.456.789-01");
        assert!(serde_json::from_str::<Cpf>("\"123\"").is_err());
        assert_eq!(serde_json::to_string(&cpf).unwrap(), "\"123.456.789-01\"");
    }
}
