use bigdecimal::BigDecimal;
use mapjson::{Array, Error, GeneratorError, Mapped, Mapper, MapperConfig, Mappings, Value};
use num_bigint::BigInt;
use std::str::FromStr;

fn to_str(value: &Value) -> String {
    Mapper::default().to_string(value).unwrap()
}

#[test]
fn test_root_scalars() {
    let mapper = Mapper::default();
    assert_eq!(mapper.to_string(&Value::Null).unwrap(), "null");
    assert_eq!(mapper.to_string_of(&true).unwrap(), "true");
    assert_eq!(mapper.to_string_of(&1234u32).unwrap(), "1234");
    assert_eq!(mapper.to_string_of(&-1400i32).unwrap(), "-1400");
    assert_eq!(mapper.to_string_of(&-7i8).unwrap(), "-7");
    assert_eq!(mapper.to_string_of(&1.5f32).unwrap(), "1.5");
    assert_eq!(mapper.to_string_of(&-0.125f64).unwrap(), "-0.125");
    assert_eq!(mapper.to_string_of(&'x').unwrap(), "\"x\"");
    assert_eq!(mapper.to_string_of("Hello world!").unwrap(), "\"Hello world!\"");
    assert_eq!(mapper.to_string_of("\t\n").unwrap(), "\"\\t\\n\"");
}

#[test]
fn test_big_numbers() {
    assert_eq!(
        Mapper::default().to_string_of(&u64::MAX).unwrap(),
        "18446744073709551615"
    );
    let big = BigInt::from_str("-123456789012345678901234567890").unwrap();
    assert_eq!(to_str(&Value::BigInt(big)), "-123456789012345678901234567890");
    let decimal = BigDecimal::from_str("3.14").unwrap();
    assert_eq!(to_str(&Value::Decimal(decimal)), "3.14");
}

#[test]
fn test_json_value() {
    let json = serde_json::json!({ "a": [1, true], "b": null });
    assert_eq!(to_str(&Value::Json(json)), r#"{"a":[1,true],"b":null}"#);
}

#[derive(Mapped)]
struct Reading {
    value: f64,
    ratio: f32,
    label: char,
    raw: serde_json::Value,
}

fn reading(value: f64) -> Value {
    Value::object(Reading {
        value,
        ratio: 0.5,
        label: 'k',
        raw: serde_json::json!([1, 2]),
    })
}

fn reading_mapper() -> Mapper {
    let mut mappings = Mappings::new();
    mappings.register::<Reading>();
    Mapper::new(MapperConfig::default(), mappings)
}

#[test]
fn test_properties() {
    assert_eq!(
        reading_mapper().to_string(&reading(2.25)).unwrap(),
        r#"{"value":2.25,"ratio":0.5,"label":"k","raw":[1,2]}"#
    );
}

#[test]
fn test_nan_skipped() {
    assert_eq!(
        reading_mapper().to_string(&reading(f64::NAN)).unwrap(),
        r#"{"ratio":0.5,"label":"k","raw":[1,2]}"#
    );
}

#[test]
fn test_infinity_rejected() {
    assert!(matches!(
        reading_mapper().to_string(&reading(f64::NEG_INFINITY)),
        Err(Error::NonFinite(value)) if value == f64::NEG_INFINITY
    ));
}

fn decimal_mapper(limit: u32) -> Mapper {
    Mapper::new(
        MapperConfig {
            max_big_decimal_scale: limit,
            ..MapperConfig::default()
        },
        Mappings::new(),
    )
}

#[test]
fn test_decimal_scale_limit() {
    let mapper = decimal_mapper(2);
    let at_limit = BigDecimal::from_str("0.12").unwrap();
    assert_eq!(mapper.to_string(&Value::Decimal(at_limit)).unwrap(), "0.12");

    let beyond = BigDecimal::from_str("0.123").unwrap();
    assert!(matches!(
        mapper.to_string(&Value::Decimal(beyond)),
        Err(Error::ScaleLimit { scale: 3, limit: 2 })
    ));

    let negative = BigDecimal::new(BigInt::from(1), -3);
    assert!(matches!(
        mapper.to_string(&Value::Decimal(negative)),
        Err(Error::ScaleLimit { scale: -3, limit: 2 })
    ));
}

#[test]
fn test_decimal_scale_default() {
    let mapper = Mapper::default();
    let at_limit = BigDecimal::new(BigInt::from(1), 1000);
    assert!(mapper.to_string(&Value::Decimal(at_limit)).is_ok());
    let beyond = BigDecimal::new(BigInt::from(1), 1001);
    let err = mapper.to_string(&Value::Decimal(beyond)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "BigDecimal scale (1001) limit exceeds maximum allowed (1000)"
    );
}

#[test]
fn test_to_writer() {
    let bytes = Mapper::default()
        .to_writer(Vec::new(), &Value::from("ü"))
        .unwrap();
    assert_eq!(bytes, "\"ü\"".as_bytes());
}

#[test]
fn test_skipped_root() {
    assert!(matches!(
        Mapper::default().to_string(&Value::Double(f64::NAN)),
        Err(Error::Generator(GeneratorError::Empty))
    ));
    let mapper = Mapper::new(
        MapperConfig {
            skip_empty_array: true,
            ..MapperConfig::default()
        },
        Mappings::new(),
    );
    assert!(matches!(
        mapper.to_string(&Value::Array(Array::Int(Vec::new()))),
        Err(Error::Generator(GeneratorError::Empty))
    ));
    assert_eq!(
        mapper.to_string(&Value::Array(Array::Int(vec![1]))).unwrap(),
        "[1]"
    );
}
