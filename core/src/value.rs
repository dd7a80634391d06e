use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// Identifies a Rust type at runtime, keeping its name around for error messages.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Gets the [`TypeKey`] for `T`.
    pub fn of<T: Any + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// The [`TypeId`] of the type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The name of the type, as reported by [`std::any::type_name`].
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A type which can appear as a composite node in an object graph. This is implemented for
/// every `'static` type; how a node is written is decided by its
/// [`ClassMapping`](crate::ClassMapping).
pub trait Object: Any {
    /// Gets this object as [`Any`], for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Gets the [`TypeKey`] of the concrete type of this object.
    fn type_key(&self) -> TypeKey;
}

impl<T: Any> Object for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_key(&self) -> TypeKey {
        TypeKey::of::<T>()
    }
}

/// The identity of a graph node: the address of its shared allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// A shared handle to a composite graph node. Clones of a handle refer to the same node, and
/// thus have the same [`ObjectId`]; separately allocated nodes never do, even if they hold equal
/// data.
#[derive(Clone)]
pub struct ObjectRef(Rc<dyn Object>);

impl ObjectRef {
    /// Allocates a new node holding the given value.
    pub fn new<T: Any>(value: T) -> Self {
        Self(Rc::new(value))
    }

    /// Constructs a handle to an existing shared node.
    pub fn from_rc<T: Any>(rc: Rc<T>) -> Self {
        Self(rc)
    }

    /// The identity of this node.
    pub fn id(&self) -> ObjectId {
        ObjectId(Rc::as_ptr(&self.0) as *const () as usize)
    }

    /// The [`TypeKey`] of the node's concrete type.
    pub fn type_key(&self) -> TypeKey {
        (*self.0).type_key()
    }

    /// Gets the node as a dynamically-typed [`Object`].
    pub fn as_object(&self) -> &dyn Object {
        &*self.0
    }

    /// Attempts to view the node as a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        (*self.0).as_any().downcast_ref()
    }

    /// Determines whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:#x}", self.type_key().name(), self.id().0)
    }
}

/// A constant of a Rust enum, as written to JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumConstant {
    type_key: TypeKey,
    name: &'static str,
    ordinal: usize,
}

impl EnumConstant {
    /// Constructs the constant with the given name and ordinal for enum `T`.
    pub fn new<T: Any>(name: &'static str, ordinal: usize) -> Self {
        Self {
            type_key: TypeKey::of::<T>(),
            name,
            ordinal,
        }
    }

    /// The enum type this constant belongs to.
    pub fn type_key(&self) -> TypeKey {
        self.type_key
    }

    /// The name of the constant, used when no adapter is registered for the enum.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The position of the constant within its enum.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }
}

/// A fixed-length sequence. The native variants are written with specialized loops; `Boxed`
/// holds scalar wrappers (possibly `null`), and `Object` holds arbitrary values.
#[derive(Debug, Clone)]
pub enum Array {
    Byte(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
    Char(Vec<char>),
    Bool(Vec<bool>),
    Boxed(Vec<Value>),
    Object(Vec<Value>),
}

impl Array {
    /// The number of elements in the array.
    pub fn len(&self) -> usize {
        match self {
            Array::Byte(items) => items.len(),
            Array::Short(items) => items.len(),
            Array::Int(items) => items.len(),
            Array::Long(items) => items.len(),
            Array::Float(items) => items.len(),
            Array::Double(items) => items.len(),
            Array::Char(items) => items.len(),
            Array::Bool(items) => items.len(),
            Array::Boxed(items) => items.len(),
            Array::Object(items) => items.len(),
        }
    }

    /// Determines whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The key of a [`Value::Map`] entry. Keys are stringified when written.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Null,
    String(String),
    Long(i64),
    Bool(bool),
    Char(char),
}

impl MapKey {
    /// Gets the JSON object key for this map key. A null key becomes `"null"`.
    pub fn as_key(&self) -> Cow<'_, str> {
        match self {
            MapKey::Null => Cow::Borrowed("null"),
            MapKey::String(key) => Cow::Borrowed(key),
            MapKey::Long(key) => Cow::Owned(itoa::Buffer::new().format(*key).to_owned()),
            MapKey::Bool(key) => Cow::Borrowed(if *key { "true" } else { "false" }),
            MapKey::Char(key) => Cow::Owned(key.to_string()),
        }
    }
}

impl From<&str> for MapKey {
    fn from(value: &str) -> Self {
        MapKey::String(value.to_owned())
    }
}

impl From<String> for MapKey {
    fn from(value: String) -> Self {
        MapKey::String(value)
    }
}

impl From<i64> for MapKey {
    fn from(value: i64) -> Self {
        MapKey::Long(value)
    }
}

/// A value in an object graph.
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    String(String),
    /// An already-built JSON fragment, written as-is.
    Json(serde_json::Value),
    Long(i64),
    Int(i32),
    Short(i16),
    Byte(i8),
    Double(f64),
    Float(f32),
    Bool(bool),
    Decimal(BigDecimal),
    BigInt(BigInt),
    Char(char),
    Enum(EnumConstant),
    Array(Array),
    /// An ordered sequence of values.
    Collection(Vec<Value>),
    /// An ordered mapping; entries are written in the given order.
    Map(Vec<(MapKey, Value)>),
    Object(ObjectRef),
}

/// The classification of a [`Value`], used to select how it is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Scalar,
    Json,
    Enum,
    Array,
    Collection,
    Map,
    Object,
}

impl Value {
    /// Wraps a new graph node holding the given value.
    pub fn object<T: Any>(value: T) -> Self {
        Value::Object(ObjectRef::new(value))
    }

    /// Classifies this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Json(_) => Kind::Json,
            Value::String(_)
            | Value::Long(_)
            | Value::Int(_)
            | Value::Short(_)
            | Value::Byte(_)
            | Value::Double(_)
            | Value::Float(_)
            | Value::Bool(_)
            | Value::Decimal(_)
            | Value::BigInt(_)
            | Value::Char(_) => Kind::Scalar,
            Value::Enum(_) => Kind::Enum,
            Value::Array(_) => Kind::Array,
            Value::Collection(_) => Kind::Collection,
            Value::Map(_) => Kind::Map,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Determines whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Gets the runtime type used to look up adapters and converters. Only enums and composite
    /// objects have one.
    pub fn type_key(&self) -> Option<TypeKey> {
        match self {
            Value::Enum(constant) => Some(constant.type_key()),
            Value::Object(object) => Some(object.type_key()),
            _ => None,
        }
    }

    /// A human-readable name for the runtime type of this value, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::String(_) => "string",
            Value::Json(_) => "json",
            Value::Long(_) => "i64",
            Value::Int(_) => "i32",
            Value::Short(_) => "i16",
            Value::Byte(_) => "i8",
            Value::Double(_) => "f64",
            Value::Float(_) => "f32",
            Value::Bool(_) => "bool",
            Value::Decimal(_) => "BigDecimal",
            Value::BigInt(_) => "BigInt",
            Value::Char(_) => "char",
            Value::Enum(constant) => constant.type_key().name(),
            Value::Array(_) => "array",
            Value::Collection(_) => "collection",
            Value::Map(_) => "map",
            Value::Object(object) => object.type_key().name(),
        }
    }

    /// Gets the graph node of this value, if it is one.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}
