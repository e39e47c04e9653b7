//! Delimited field splitting
//!
//! Telemetry payloads are a sequence of text fields, each terminated by the
//! unit separator `0x1F`. Bytes after the last separator (normally just the
//! line terminator) do not form a field.
//!
//! ```text
//! 5.01 ␟ 37 ␟ 61 ␟ 12 ␟ 30 ␟ 48 ␟ 1800 ␟ 7000 ␟ 12.3 ␟ \r\n
//! ```

use crate::field::FieldSink;

/// Field terminator (ASCII unit separator)
pub const FIELD_DELIMITER: u8 = 0x1F;

/// Errors from splitting a delimited payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FieldError {
    /// Payload did not contain exactly the expected number of fields
    FieldCount { expected: usize, found: usize },
    /// A field is not valid UTF-8
    InvalidText { index: usize },
    /// Output buffer too small while encoding
    BufferTooSmall,
}

/// Iterator over delimiter-terminated fields
///
/// Scanning stops at the first NUL byte.
#[derive(Debug, Clone)]
pub struct Fields<'a> {
    rest: &'a [u8],
    delimiter: u8,
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.rest.iter().position(|&b| b == self.delimiter)?;
        let field = &self.rest[..pos];
        self.rest = &self.rest[pos + 1..];
        Some(field)
    }
}

/// Split a payload into its delimiter-terminated fields
pub fn split_fields(payload: &[u8], delimiter: u8) -> Fields<'_> {
    let end = payload.iter().position(|&b| b == 0).unwrap_or(payload.len());
    Fields {
        rest: &payload[..end],
        delimiter,
    }
}

/// Fill `sinks` from a payload that must hold exactly `sinks.len()` fields
///
/// All fields are validated before any sink is written, so on error every
/// sink keeps its previous content. Each value is truncated to its sink's
/// capacity.
pub fn parse_fixed_fields(
    payload: &[u8],
    delimiter: u8,
    sinks: &mut [&mut dyn FieldSink],
) -> Result<(), FieldError> {
    let expected = sinks.len();
    let mut found = 0;

    for (index, raw) in split_fields(payload, delimiter).enumerate() {
        if core::str::from_utf8(raw).is_err() {
            return Err(FieldError::InvalidText { index });
        }
        found += 1;
    }

    if found != expected {
        return Err(FieldError::FieldCount { expected, found });
    }

    let fields = split_fields(payload, delimiter).enumerate();
    for (sink, (index, raw)) in sinks.iter_mut().zip(fields) {
        let Ok(text) = core::str::from_utf8(raw) else {
            return Err(FieldError::InvalidText { index });
        };
        sink.assign_truncated(text);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use proptest::prelude::*;
    use std::string::String;
    use std::vec::Vec;

    fn join(fields: &[&str]) -> Vec<u8> {
        let mut out = Vec::new();
        for field in fields {
            out.extend_from_slice(field.as_bytes());
            out.push(FIELD_DELIMITER);
        }
        out.extend_from_slice(b"\r\n");
        out
    }

    #[test]
    fn test_split_ignores_trailing_bytes() {
        let payload = join(&["a0", "a1", "a2"]);
        let fields: Vec<&[u8]> = split_fields(&payload, FIELD_DELIMITER).collect();
        assert_eq!(fields, [&b"a0"[..], b"a1", b"a2"]);
    }

    #[test]
    fn test_split_keeps_empty_fields() {
        let payload = [FIELD_DELIMITER, FIELD_DELIMITER];
        assert_eq!(split_fields(&payload, FIELD_DELIMITER).count(), 2);
    }

    #[test]
    fn test_split_stops_at_nul() {
        let payload = b"a\x1fb\x00c\x1f";
        assert_eq!(split_fields(payload, FIELD_DELIMITER).count(), 1);
    }

    #[test]
    fn test_parse_fills_sinks() {
        let mut cpu = Field::<48>::new();
        let mut gpu = Field::<48>::new();
        let mut ram = Field::<10>::new();

        let payload = join(&["AMD Ryzen 7 5800X", "NVIDIA RTX 3070", "32GB"]);
        parse_fixed_fields(&payload, FIELD_DELIMITER, &mut [&mut cpu, &mut gpu, &mut ram])
            .unwrap();

        assert_eq!(cpu, "AMD Ryzen 7 5800X");
        assert_eq!(gpu, "NVIDIA RTX 3070");
        assert_eq!(ram, "32GB");
    }

    #[test]
    fn test_parse_wrong_count_leaves_sinks_untouched() {
        let mut a = Field::<10>::from_str_truncated("old-a");
        let mut b = Field::<10>::from_str_truncated("old-b");

        let payload = join(&["new-a"]);
        let result = parse_fixed_fields(&payload, FIELD_DELIMITER, &mut [&mut a, &mut b]);

        assert_eq!(
            result,
            Err(FieldError::FieldCount {
                expected: 2,
                found: 1
            })
        );
        assert_eq!(a, "old-a");
        assert_eq!(b, "old-b");
    }

    #[test]
    fn test_parse_extra_field_rejected() {
        let mut a = Field::<10>::new();
        let payload = join(&["x", "y"]);
        assert!(parse_fixed_fields(&payload, FIELD_DELIMITER, &mut [&mut a]).is_err());
        assert!(a.is_empty());
    }

    #[test]
    fn test_parse_invalid_utf8_rejected() {
        let mut a = Field::<10>::from_str_truncated("keep");
        let payload = [0xFF, 0xFE, FIELD_DELIMITER];
        assert_eq!(
            parse_fixed_fields(&payload, FIELD_DELIMITER, &mut [&mut a]),
            Err(FieldError::InvalidText { index: 0 })
        );
        assert_eq!(a, "keep");
    }

    #[test]
    fn test_parse_invalid_later_field_reports_index() {
        let mut a = Field::<10>::from_str_truncated("keep-a");
        let mut b = Field::<10>::from_str_truncated("keep-b");
        let mut c = Field::<10>::from_str_truncated("keep-c");
        let payload = b"ok\x1Ffi\x1F\xC3\x1F";

        assert_eq!(
            parse_fixed_fields(payload, FIELD_DELIMITER, &mut [&mut a, &mut b, &mut c]),
            Err(FieldError::InvalidText { index: 2 })
        );
        assert_eq!(a, "keep-a");
        assert_eq!(b, "keep-b");
        assert_eq!(c, "keep-c");
    }

    #[test]
    fn test_parse_truncates_long_field() {
        let mut ram = Field::<10>::new();
        let payload = join(&["123456789012345"]);
        parse_fixed_fields(&payload, FIELD_DELIMITER, &mut [&mut ram]).unwrap();
        assert_eq!(ram, "1234567890");
    }

    proptest! {
        #[test]
        fn prop_count_matches_delimiters(fields in proptest::collection::vec("[a-zA-Z0-9 .]{0,12}", 0..12)) {
            let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            let payload = join(&refs);
            prop_assert_eq!(split_fields(&payload, FIELD_DELIMITER).count(), fields.len());
        }

        #[test]
        fn prop_mismatched_count_never_writes(
            fields in proptest::collection::vec("[a-z]{1,8}", 0..6),
            expected in 1usize..6,
        ) {
            prop_assume!(fields.len() != expected);
            let refs: Vec<&str> = fields.iter().map(String::as_str).collect();
            let payload = join(&refs);

            let mut sinks: Vec<Field<16>> = (0..expected)
                .map(|_| Field::from_str_truncated("sentinel"))
                .collect();
            let mut dyn_sinks: Vec<&mut dyn FieldSink> =
                sinks.iter_mut().map(|s| s as &mut dyn FieldSink).collect();

            prop_assert!(parse_fixed_fields(&payload, FIELD_DELIMITER, &mut dyn_sinks).is_err());
            drop(dyn_sinks);
            prop_assert!(sinks.iter().all(|s| s.as_str() == "sentinel"));
        }

        #[test]
        fn prop_fields_never_exceed_capacity(value in "\\PC{0,40}") {
            let mut field = Field::<10>::new();
            let payload = join(&[value.as_str()]);
            parse_fixed_fields(&payload, FIELD_DELIMITER, &mut [&mut field]).unwrap();
            prop_assert!(field.len() <= 10);
            prop_assert!(value.starts_with(field.as_str()));
        }
    }
}
