//! Field splitting and message classification.

use std::fmt;

use crate::config::MessagePolicy;

/// Field separator of the transmitter wire format.
pub const FIELD_DELIMITER: char = '\r';

/// Number of fields a strictly valid message splits into.
pub const STRICT_FIELD_COUNT: usize = 4;

/// A message split into its `\r`-delimited fields.
///
/// Splitting never drops empty fields: `""` yields one empty field and
/// `"a\r"` yields `["a", ""]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecord {
    fields: Vec<String>,
}

impl ParsedRecord {
    pub fn parse(raw: &str) -> Self {
        Self {
            fields: raw.split(FIELD_DELIMITER).map(str::to_owned).collect(),
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false; a split yields at least one field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Why a message was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Field count is not the one the policy requires.
    Format,
    /// Cap code field is not made of decimal digits.
    CapCode,
    /// Trailing fields are not empty.
    Ending,
    /// Fewer than the cap code and body fields are present.
    MissingFields,
}

impl InvalidReason {
    /// Stable label for metrics and structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            InvalidReason::Format => "invalid_format",
            InvalidReason::CapCode => "invalid_cap_code",
            InvalidReason::Ending => "invalid_ending",
            InvalidReason::MissingFields => "missing_fields",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::Format => write!(f, "invalid format"),
            InvalidReason::CapCode => write!(f, "invalid cap code"),
            InvalidReason::Ending => write!(f, "invalid ending"),
            InvalidReason::MissingFields => write!(f, "missing fields"),
        }
    }
}

/// Outcome of validating one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Valid { cap_code: String, message: String },
    Invalid(InvalidReason),
}

impl Classification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Classification::Valid { .. })
    }

    /// Stable label for metrics and structured logs.
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Valid { .. } => "transmitted",
            Classification::Invalid(reason) => reason.label(),
        }
    }
}

fn is_cap_code(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

impl MessagePolicy {
    /// Classify a parsed record. Never fails.
    pub fn classify(&self, record: &ParsedRecord) -> Classification {
        let fields = record.fields();
        match self {
            MessagePolicy::Strict => {
                if fields.len() != STRICT_FIELD_COUNT {
                    return Classification::Invalid(InvalidReason::Format);
                }
                if !is_cap_code(&fields[0]) {
                    return Classification::Invalid(InvalidReason::CapCode);
                }
                if !fields[2].is_empty() || !fields[3].is_empty() {
                    return Classification::Invalid(InvalidReason::Ending);
                }
                Classification::Valid {
                    cap_code: fields[0].clone(),
                    message: fields[1].clone(),
                }
            }
            MessagePolicy::Lenient => match fields {
                [cap_code, message, ..] => Classification::Valid {
                    cap_code: cap_code.clone(),
                    message: message.clone(),
                },
                _ => Classification::Invalid(InvalidReason::MissingFields),
            },
        }
    }

    /// Split and classify raw message text.
    pub fn classify_raw(&self, raw: &str) -> Classification {
        self.classify(&ParsedRecord::parse(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(cap: &str, message: &str) -> Classification {
        Classification::Valid {
            cap_code: cap.into(),
            message: message.into(),
        }
    }

    #[test]
    fn split_keeps_empty_fields() {
        assert_eq!(ParsedRecord::parse("").fields(), [""]);
        assert_eq!(ParsedRecord::parse("123\rHello\r\r").fields(), ["123", "Hello", "", ""]);
        assert_eq!(ParsedRecord::parse("\r\r\r").len(), 4);
    }

    #[test]
    fn strict_accepts_wire_contract() {
        assert_eq!(MessagePolicy::Strict.classify_raw("123\rHello\r\r"), valid("123", "Hello"));
        assert_eq!(MessagePolicy::Strict.classify_raw("0042\r\r\r"), valid("0042", ""));
    }

    #[test]
    fn strict_rejects_bad_cap_code() {
        let strict = MessagePolicy::Strict;
        assert_eq!(strict.classify_raw("abc\rHello\r\r"), Classification::Invalid(InvalidReason::CapCode));
        assert_eq!(strict.classify_raw("\rHello\r\r"), Classification::Invalid(InvalidReason::CapCode));
        assert_eq!(strict.classify_raw("-12\rHello\r\r"), Classification::Invalid(InvalidReason::CapCode));
        // Non-ASCII digits are not decimal digits on this wire.
        assert_eq!(strict.classify_raw("١٢\rHello\r\r"), Classification::Invalid(InvalidReason::CapCode));
    }

    #[test]
    fn strict_rejects_wrong_field_count() {
        let strict = MessagePolicy::Strict;
        for raw in ["", "123\rHello", "123\rHello\r", "123\rHello\r\r\r", "123\rHello\n\n"] {
            assert_eq!(
                strict.classify_raw(raw),
                Classification::Invalid(InvalidReason::Format),
                "input {raw:?}"
            );
        }
    }

    #[test]
    fn strict_rejects_non_empty_ending() {
        let strict = MessagePolicy::Strict;
        assert_eq!(strict.classify_raw("123\rHello\rX\r"), Classification::Invalid(InvalidReason::Ending));
        assert_eq!(strict.classify_raw("123\rHello\r\rX"), Classification::Invalid(InvalidReason::Ending));
    }

    #[test]
    fn strict_checks_format_before_cap_code() {
        assert_eq!(
            MessagePolicy::Strict.classify_raw("abc\rHello"),
            Classification::Invalid(InvalidReason::Format)
        );
        assert_eq!(
            MessagePolicy::Strict.classify_raw("abc\rHello\rX\r"),
            Classification::Invalid(InvalidReason::CapCode)
        );
    }

    #[test]
    fn lenient_takes_first_two_fields() {
        let lenient = MessagePolicy::Lenient;
        assert_eq!(lenient.classify_raw("abc\rHello"), valid("abc", "Hello"));
        assert_eq!(lenient.classify_raw("123\rHello\rX\rY\rZ"), valid("123", "Hello"));
        assert_eq!(lenient.classify_raw("123\r"), valid("123", ""));
    }

    #[test]
    fn lenient_short_input_is_classified() {
        let lenient = MessagePolicy::Lenient;
        assert_eq!(lenient.classify_raw(""), Classification::Invalid(InvalidReason::MissingFields));
        assert_eq!(lenient.classify_raw("123"), Classification::Invalid(InvalidReason::MissingFields));
    }

    #[test]
    fn classification_is_deterministic() {
        for raw in ["123\rHello\r\r", "abc\rx\r\r", "", "1\r2\r3\r4\r5"] {
            for policy in [MessagePolicy::Strict, MessagePolicy::Lenient] {
                assert_eq!(policy.classify_raw(raw), policy.classify_raw(raw));
            }
        }
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(valid("1", "x").label(), "transmitted");
        assert_eq!(Classification::Invalid(InvalidReason::Ending).label(), "invalid_ending");
        assert_eq!(InvalidReason::CapCode.to_string(), "invalid cap code");
    }
}
