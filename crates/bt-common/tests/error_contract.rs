//! Error contract tests: codes and categories are stable across the crate
//! boundary and serialize the way downstream consumers expect.

use bt_common::{format_error_human, Error, ErrorCategory};

#[test]
fn codes_are_grouped_by_category() {
    let cases: Vec<(Error, u32, ErrorCategory)> = vec![
        (
            Error::InvalidCount {
                input: "ten".into(),
            },
            10,
            ErrorCategory::Validation,
        ),
        (Error::DecodeExhausted, 20, ErrorCategory::Decode),
        (
            Error::Spawn {
                command: "./gradlew".into(),
                reason: "missing".into(),
            },
            30,
            ErrorCategory::Process,
        ),
        (Error::Download("timed out".into()), 40, ErrorCategory::Download),
        (
            Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk full")),
            60,
            ErrorCategory::Io,
        ),
        (Error::Internal("oops".into()), 70, ErrorCategory::Internal),
    ];

    for (err, code, category) in cases {
        assert_eq!(err.code(), code, "code for {err}");
        assert_eq!(err.category(), category, "category for {err}");
        // First digit of the code matches the category grouping.
        assert_eq!(err.code() / 10, code / 10);
    }
}

#[test]
fn category_serializes_snake_case() {
    let json = serde_json::to_string(&ErrorCategory::Validation).unwrap();
    assert_eq!(json, r#""validation""#);
}

#[test]
fn human_format_is_single_line() {
    let err = Error::InvalidCount {
        input: "abc".into(),
    };
    let formatted = format_error_human(&err, false);
    assert_eq!(formatted.lines().count(), 1);
    assert!(formatted.contains("abc"));
}
