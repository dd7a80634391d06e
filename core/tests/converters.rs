use bigdecimal::BigDecimal;
use mapjson::{
    BoxError, ClassMapping, ConverterRegistry, Error, GeneratorError, Mapped, MappingGenerator,
    Mapper, MapperConfig, Mappings, Property, ToValue, Value,
};
use num_bigint::BigInt;
use std::rc::Rc;

struct Temperature(f64);

fn celsius(value: &Value) -> f64 {
    value
        .as_object()
        .and_then(|object| object.downcast_ref::<Temperature>())
        .map_or(f64::NAN, |t| t.0)
}

#[derive(Mapped)]
struct Weather {
    city: String,
    temp: Rc<Temperature>,
    history: Vec<Rc<Temperature>>,
}

fn weather() -> Value {
    Value::object(Weather {
        city: "Oslo".to_owned(),
        temp: Rc::new(Temperature(21.5)),
        history: vec![Rc::new(Temperature(3.0))],
    })
}

fn mapper_with_converter(
    converter: impl Fn(&Value, &mut dyn MappingGenerator) -> mapjson::Result<()>
        + Send
        + Sync
        + 'static,
) -> Mapper {
    let mut mappings = Mappings::new();
    mappings.register::<Weather>().register::<Leaf>();
    Mapper::new(
        MapperConfig::default().with_object_converter::<Temperature>(converter),
        mappings,
    )
}

#[test]
fn test_keyless_scalar() {
    let mapper = mapper_with_converter(|value, generator| {
        let text = format!("{}C", celsius(value));
        generator.generator().write_str(None, &text)
    });
    assert_eq!(
        mapper.to_string(&weather()).unwrap(),
        r#"{"city":"Oslo","temp":"21.5C","history":["3C"]}"#
    );
    assert_eq!(
        mapper.to_string(&Value::object(Temperature(-4.0))).unwrap(),
        r#""-4C""#
    );
}

#[test]
fn test_keyed_entries() {
    let mapper = mapper_with_converter(|value, generator| {
        let generator = generator.generator();
        generator.write_f64(Some("celsius"), celsius(value))?;
        generator.write_str(Some("unit"), "C")
    });
    assert_eq!(
        mapper.to_string(&weather()).unwrap(),
        r#"{"city":"Oslo","temp":{"celsius":21.5,"unit":"C"},"history":[{"celsius":3.0,"unit":"C"}]}"#
    );
}

#[test]
fn test_writes_nothing() {
    let mapper = mapper_with_converter(|_, _| Ok(()));
    assert_eq!(
        mapper.to_string(&weather()).unwrap(),
        r#"{"city":"Oslo","temp":{},"history":[{}]}"#
    );
    assert_eq!(
        mapper.to_string(&Value::object(Temperature(0.0))).unwrap(),
        "{}"
    );
}

#[test]
fn test_explicit_container() {
    let mapper = mapper_with_converter(|value, generator| {
        let generator = generator.generator();
        generator.write_start_array(None)?;
        generator.write_f64(None, celsius(value))?;
        generator.write_end()
    });
    assert_eq!(
        mapper.to_string(&weather()).unwrap(),
        r#"{"city":"Oslo","temp":[21.5],"history":[[3.0]]}"#
    );
}

#[derive(Mapped)]
struct Leaf {
    v: i32,
}

#[test]
fn test_mapped_entries() {
    let mapper = mapper_with_converter(|value, generator| {
        generator.write_object("celsius", &Value::Double(celsius(value)))?;
        generator.write_object("leaf", &Rc::new(Leaf { v: 1 }).to_value())?;
        generator.write_object("missing", &Value::Null)
    });
    assert_eq!(
        mapper.to_string(&Value::object(Temperature(1.5))).unwrap(),
        r#"{"celsius":1.5,"leaf":{"v":1}}"#
    );
}

#[test]
fn test_mapped_value() {
    let mapper = mapper_with_converter(|value, generator| {
        generator.write_value(&Value::from(format!("{}C", celsius(value))))
    });
    assert_eq!(
        mapper.to_string(&weather()).unwrap(),
        r#"{"city":"Oslo","temp":"21.5C","history":["3C"]}"#
    );
}

#[test]
fn test_second_value_rejected() {
    let mapper = mapper_with_converter(|_, generator| {
        generator.generator().write_i64(None, 1)?;
        generator.generator().write_i64(None, 2)
    });
    assert!(matches!(
        mapper.to_string(&weather()),
        Err(Error::Generator(GeneratorError::MultipleRoots))
    ));
}

#[test]
fn test_unclosed_rejected() {
    let mapper = mapper_with_converter(|_, generator| generator.generator().write_start_array(None));
    assert!(matches!(
        mapper.to_string(&weather()),
        Err(Error::Generator(GeneratorError::Unclosed))
    ));
}

#[test]
fn test_overclose_rejected() {
    let mapper = mapper_with_converter(|_, generator| {
        let generator = generator.generator();
        generator.write_i64(Some("a"), 1)?;
        generator.write_end()?;
        generator.write_end()
    });
    assert!(matches!(
        mapper.to_string(&weather()),
        Err(Error::Generator(GeneratorError::Unbalanced))
    ));
}

#[test]
fn test_converter_error() {
    let mapper = mapper_with_converter(|_, _| Err(Error::custom("sensor offline")));
    let err = mapper.to_string(&weather()).unwrap_err();
    assert!(matches!(err, Error::Converter { type_name, .. } if type_name.ends_with("Temperature")));
    assert_eq!(
        std::error::Error::source(&err).map(ToString::to_string),
        Some("sensor offline".to_owned())
    );
}

struct Station {
    temp: Temperature,
    name: String,
}

fn fahrenheit(value: &Value, generator: &mut dyn MappingGenerator) -> mapjson::Result<()> {
    let Value::Double(celsius) = value else {
        return Err(Error::custom("expected a number"));
    };
    generator
        .generator()
        .write_f64(None, celsius * 9.0 / 5.0 + 32.0)
}

#[test]
fn test_property_converter() {
    let mut mappings = Mappings::new();
    mappings.insert(
        ClassMapping::new::<Station>()
            .property(Property::of::<Station, f64>("temp", |s| &s.temp.0).object_converter(fahrenheit))
            .property(Property::of::<Station, String>("name", |s| &s.name)),
    );
    let mapper = Mapper::new(MapperConfig::default(), mappings);
    let station = Value::object(Station {
        temp: Temperature(100.0),
        name: "Blindern".to_owned(),
    });
    assert_eq!(
        mapper.to_string(&station).unwrap(),
        r#"{"temp":212.0,"name":"Blindern"}"#
    );
}

fn tenths(value: &Value) -> Result<Value, BoxError> {
    match value {
        Value::Double(value) => Ok(Value::Long((value * 10.0).round() as i64)),
        _ => Err("expected a number".into()),
    }
}

fn boxed(value: &Value) -> Result<Value, BoxError> {
    Ok(Value::Collection(vec![value.clone()]))
}

fn opaque(_: &Value) -> Result<Value, BoxError> {
    Ok(Value::object(Leaf { v: 0 }))
}

#[test]
fn test_property_adapter() {
    let station = || {
        Value::object(Station {
            temp: Temperature(2.25),
            name: "Blindern".to_owned(),
        })
    };
    let mapper = |adapter: fn(&Value) -> Result<Value, BoxError>| {
        let mut mappings = Mappings::new();
        mappings.register::<Leaf>().insert(
            ClassMapping::new::<Station>()
                .property(Property::of::<Station, f64>("temp", |s| &s.temp.0).converter(adapter)),
        );
        Mapper::new(MapperConfig::default(), mappings)
    };
    assert_eq!(mapper(tenths).to_string(&station()).unwrap(), r#"{"temp":23}"#);
    assert_eq!(mapper(boxed).to_string(&station()).unwrap(), r#"{"temp":[2.25]}"#);
    assert!(matches!(
        mapper(opaque).to_string(&station()),
        Err(Error::NotScalar { .. })
    ));
}

fn null_temperature(_: &Value, generator: &mut dyn MappingGenerator) -> mapjson::Result<()> {
    generator.generator().write_null(None)
}

#[test]
fn test_value_filter() {
    let weather = || {
        Value::object(Weather {
            city: "Oslo".to_owned(),
            temp: Rc::new(Temperature(0.0)),
            history: Vec::new(),
        })
    };

    let mut mappings = Mappings::new();
    mappings.register::<Weather>();
    let config = MapperConfig::default()
        .with_object_converter::<Temperature>(null_temperature)
        .with_value_filter(|key: &str, value: &Value| {
            key == "city" || matches!(value, Value::Collection(items) if items.is_empty())
        });
    let mapper = Mapper::new(config, mappings);
    assert_eq!(mapper.to_string(&weather()).unwrap(), r#"{"temp":null}"#);

    let mut mappings = Mappings::new();
    mappings.register::<Weather>();
    let config = MapperConfig::default()
        .with_value_filter(|key: &str, _: &Value| key == "city" || key == "temp");
    let mapper = Mapper::new(config, mappings);
    assert_eq!(mapper.to_string(&weather()).unwrap(), r#"{"history":[]}"#);
}

#[test]
fn test_converter_registry_field() {
    let mut converters = ConverterRegistry::default();
    converters.insert_object_converter::<Temperature>(null_temperature);
    let mut mappings = Mappings::new();
    mappings.register::<Weather>();
    let config = MapperConfig {
        skip_null: false,
        converters,
        ..MapperConfig::default()
    };
    let mapper = Mapper::new(config, mappings);
    assert_eq!(
        mapper.to_string(&weather()).unwrap(),
        r#"{"city":"Oslo","temp":null,"history":[null]}"#
    );
}

#[test]
fn test_converter_decimal_scale() {
    let mapper = mapper_with_converter(|value, generator| {
        let scale = celsius(value) as i64;
        generator
            .generator()
            .write_decimal(Some("exact"), &BigDecimal::new(BigInt::from(1), scale))
    });
    assert_eq!(
        mapper.to_string(&Value::object(Temperature(2.0))).unwrap(),
        r#"{"exact":0.01}"#
    );
    assert!(matches!(
        mapper.to_string(&Value::object(Temperature(1001.0))),
        Err(Error::ScaleLimit {
            scale: 1001,
            limit: 1000
        })
    ));
}
