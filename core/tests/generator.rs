use indoc::*;
use mapjson::{Error, GeneratorConfig, GeneratorError, IoSink, JsonGenerator, TextGenerator};

fn compact() -> TextGenerator<String> {
    TextGenerator::new(GeneratorConfig::default(), String::new())
}

#[test]
fn test_scalars() {
    let mut g = compact();
    g.write_start_array(None).unwrap();
    g.write_null(None).unwrap();
    g.write_bool(None, true).unwrap();
    g.write_i64(None, -1400).unwrap();
    g.write_f64(None, 1.5).unwrap();
    g.write_f32(None, -0.125).unwrap();
    g.write_str(None, "hi").unwrap();
    g.write_end().unwrap();
    assert_eq!(g.finish().unwrap(), r#"[null,true,-1400,1.5,-0.125,"hi"]"#);
}

#[test]
fn test_escape() {
    let mut g = compact();
    g.write_str(None, "a\"b\\c\n\t\u{1}\u{8}\u{c}\rä").unwrap();
    assert_eq!(
        g.finish().unwrap(),
        "\"a\\\"b\\\\c\\n\\t\\u0001\\b\\f\\rä\""
    );
}

#[test]
fn test_escape_key() {
    let mut g = compact();
    g.write_start_object(None).unwrap();
    g.write_i64(Some("a\"b"), 1).unwrap();
    g.write_end().unwrap();
    assert_eq!(g.finish().unwrap(), r#"{"a\"b":1}"#);
}

#[test]
fn test_object_pretty() {
    let mut g = TextGenerator::new(GeneratorConfig::pretty("    "), String::new());
    g.write_start_object(None).unwrap();
    g.write_str(Some("name"), "Finland").unwrap();
    g.write_i64(Some("pop"), 5500000).unwrap();
    g.write_start_array(Some("langs")).unwrap();
    g.write_str(None, "fi").unwrap();
    g.write_str(None, "sv").unwrap();
    g.write_end().unwrap();
    g.write_start_object(Some("metadata")).unwrap();
    g.write_end().unwrap();
    g.write_end().unwrap();
    let expected = indoc! {
        r#"{
            "name": "Finland",
            "pop": 5500000,
            "langs": [
                "fi",
                "sv"
            ],
            "metadata": {}
        }"#
    };
    assert_eq!(g.finish().unwrap(), expected);
}

#[test]
fn test_json_passthrough() {
    let mut g = compact();
    let json = serde_json::json!({ "a": [1, u64::MAX, 2.5, null], "b": "x" });
    g.write_json(None, &json).unwrap();
    assert_eq!(
        g.finish().unwrap(),
        r#"{"a":[1,18446744073709551615,2.5,null],"b":"x"}"#
    );
}

#[test]
fn test_non_finite() {
    let mut g = compact();
    assert!(matches!(
        g.write_f64(None, f64::INFINITY),
        Err(Error::NonFinite(value)) if value == f64::INFINITY
    ));
    assert!(matches!(
        g.write_f32(None, f32::NAN),
        Err(Error::NonFinite(value)) if value.is_nan()
    ));
}

#[test]
fn test_misuse() {
    let mut g = compact();
    g.write_start_object(None).unwrap();
    assert!(matches!(
        g.write_i64(None, 1),
        Err(Error::Generator(GeneratorError::ExpectedKey))
    ));

    let mut g = compact();
    g.write_start_array(None).unwrap();
    assert!(matches!(
        g.write_i64(Some("a"), 1),
        Err(Error::Generator(GeneratorError::UnexpectedKey))
    ));

    let mut g = compact();
    assert!(matches!(
        g.write_bool(Some("a"), true),
        Err(Error::Generator(GeneratorError::UnexpectedKey))
    ));
    assert!(matches!(
        g.write_end(),
        Err(Error::Generator(GeneratorError::Unbalanced))
    ));

    let mut g = compact();
    g.write_null(None).unwrap();
    assert!(matches!(
        g.write_null(None),
        Err(Error::Generator(GeneratorError::MultipleRoots))
    ));

    let mut g = compact();
    g.write_start_array(None).unwrap();
    assert!(matches!(
        g.finish(),
        Err(Error::Generator(GeneratorError::Unclosed))
    ));

    assert!(matches!(
        compact().finish(),
        Err(Error::Generator(GeneratorError::Empty))
    ));
}

struct Closed;

impl std::io::Write for Closed {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_sink_error() {
    let mut g = TextGenerator::new(GeneratorConfig::default(), IoSink::new(Closed));
    let err = g.write_i64(None, 1).unwrap_err();
    assert!(matches!(err, Error::Sink(_)));
    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("pipe"));
}
