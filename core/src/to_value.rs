use crate::{Array, MapKey, ObjectRef, PropertyKind, Value};
use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::rc::{Rc, Weak};

/// A Rust type which can be read into a [`Value`].
pub trait ToValue {
    /// The declared shape of properties of this type.
    const KIND: PropertyKind;

    /// Converts this to a [`Value`]. Shared nodes (`Rc`) keep their identity.
    fn to_value(&self) -> Value;
}

macro_rules! impl_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ToValue for $ty {
                const KIND: PropertyKind = PropertyKind::Primitive;
                fn to_value(&self) -> Value {
                    Value::$variant((*self).into())
                }
            }
        )*
    };
}

impl_scalar! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    u8 => Int,
    u16 => Int,
    u32 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
}

impl ToValue for u64 {
    const KIND: PropertyKind = PropertyKind::Primitive;
    fn to_value(&self) -> Value {
        match i64::try_from(*self) {
            Ok(value) => Value::Long(value),
            Err(_) => Value::BigInt((*self).into()),
        }
    }
}

impl ToValue for usize {
    const KIND: PropertyKind = PropertyKind::Primitive;
    fn to_value(&self) -> Value {
        (*self as u64).to_value()
    }
}

impl ToValue for str {
    const KIND: PropertyKind = PropertyKind::Primitive;
    fn to_value(&self) -> Value {
        Value::String(self.to_owned())
    }
}

impl ToValue for String {
    const KIND: PropertyKind = PropertyKind::Primitive;
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl ToValue for BigDecimal {
    const KIND: PropertyKind = PropertyKind::Primitive;
    fn to_value(&self) -> Value {
        Value::Decimal(self.clone())
    }
}

impl ToValue for BigInt {
    const KIND: PropertyKind = PropertyKind::Primitive;
    fn to_value(&self) -> Value {
        Value::BigInt(self.clone())
    }
}

impl ToValue for serde_json::Value {
    const KIND: PropertyKind = PropertyKind::Dynamic;
    fn to_value(&self) -> Value {
        Value::Json(self.clone())
    }
}

impl ToValue for Value {
    const KIND: PropertyKind = PropertyKind::Dynamic;
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for ObjectRef {
    const KIND: PropertyKind = PropertyKind::Object;
    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }
}

impl<T: Any> ToValue for Rc<T> {
    const KIND: PropertyKind = PropertyKind::Object;
    fn to_value(&self) -> Value {
        Value::Object(ObjectRef::from_rc(self.clone()))
    }
}

/// A dangling reference reads as `null`.
impl<T: Any> ToValue for Weak<T> {
    const KIND: PropertyKind = PropertyKind::Object;
    fn to_value(&self) -> Value {
        self.upgrade().map_or(Value::Null, |rc| rc.to_value())
    }
}

impl<T: ToValue> ToValue for RefCell<T> {
    const KIND: PropertyKind = T::KIND;
    fn to_value(&self) -> Value {
        self.borrow().to_value()
    }
}

impl<T: ToValue> ToValue for Option<T> {
    const KIND: PropertyKind = T::KIND;
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    const KIND: PropertyKind = PropertyKind::Collection;
    fn to_value(&self) -> Value {
        Value::Collection(self.iter().map(ToValue::to_value).collect())
    }
}

/// An element type of a fixed-length array (`Box<[T]>` or `[T; N]`). Native numeric, boolean and
/// character elements produce specialized [`Array`] variants.
pub trait ArrayElement: Sized {
    /// Builds the [`Array`] for a slice of this element type.
    fn to_array(items: &[Self]) -> Array;
}

macro_rules! impl_native_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ArrayElement for $ty {
                fn to_array(items: &[Self]) -> Array {
                    Array::$variant(items.to_vec())
                }
            }
        )*
    };
}

impl_native_element! {
    u8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    bool => Bool,
}

/// Optional scalars are boxed elements, which may be `null`.
impl<T: ToValue> ArrayElement for Option<T> {
    fn to_array(items: &[Self]) -> Array {
        Array::Boxed(items.iter().map(ToValue::to_value).collect())
    }
}

impl ArrayElement for String {
    fn to_array(items: &[Self]) -> Array {
        Array::Object(items.iter().map(ToValue::to_value).collect())
    }
}

impl<T: Any> ArrayElement for Rc<T> {
    fn to_array(items: &[Self]) -> Array {
        Array::Object(items.iter().map(ToValue::to_value).collect())
    }
}

impl ArrayElement for Value {
    fn to_array(items: &[Self]) -> Array {
        Array::Object(items.to_vec())
    }
}

impl<T: ArrayElement> ToValue for Box<[T]> {
    const KIND: PropertyKind = PropertyKind::Array;
    fn to_value(&self) -> Value {
        Value::Array(T::to_array(self))
    }
}

impl<T: ArrayElement, const N: usize> ToValue for [T; N] {
    const KIND: PropertyKind = PropertyKind::Array;
    fn to_value(&self) -> Value {
        Value::Array(T::to_array(self))
    }
}

/// A type which can be used as the key of a map property.
pub trait ToMapKey {
    /// Converts this to a [`MapKey`].
    fn to_map_key(&self) -> MapKey;
}

impl ToMapKey for String {
    fn to_map_key(&self) -> MapKey {
        MapKey::String(self.clone())
    }
}

impl ToMapKey for &'static str {
    fn to_map_key(&self) -> MapKey {
        MapKey::String((*self).to_owned())
    }
}

impl ToMapKey for i32 {
    fn to_map_key(&self) -> MapKey {
        MapKey::Long((*self).into())
    }
}

impl ToMapKey for i64 {
    fn to_map_key(&self) -> MapKey {
        MapKey::Long(*self)
    }
}

impl ToMapKey for bool {
    fn to_map_key(&self) -> MapKey {
        MapKey::Bool(*self)
    }
}

impl ToMapKey for char {
    fn to_map_key(&self) -> MapKey {
        MapKey::Char(*self)
    }
}

impl<K: ToMapKey> ToMapKey for Option<K> {
    fn to_map_key(&self) -> MapKey {
        self.as_ref().map_or(MapKey::Null, ToMapKey::to_map_key)
    }
}

impl<K: ToMapKey, V: ToValue> ToValue for BTreeMap<K, V> {
    const KIND: PropertyKind = PropertyKind::Map;
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_map_key(), v.to_value())).collect())
    }
}

/// Entries are written in the map's iteration order.
impl<K: ToMapKey, V: ToValue, S> ToValue for HashMap<K, V, S> {
    const KIND: PropertyKind = PropertyKind::Map;
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_map_key(), v.to_value())).collect())
    }
}
