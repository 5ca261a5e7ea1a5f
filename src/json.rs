//! JSON interchange for [`Path`] and [`Properties`].
//!
//! A `Properties` maps to a flat JSON object: each property name is the full
//! dotted path and each value is the raw, unescaped string.
//!
//! ```json
//! { "key.111": "value111", "key.222": "value222" }
//! ```

use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, ErrorKind};
use crate::path::Path;
use crate::properties::Properties;

/// Encode `properties` as a flat JSON object.
pub fn to_json(properties: &Properties) -> Value {
    let mut object = Map::new();
    for (path, value) in properties.entries() {
        object.insert(path.value().to_string(), Value::String(value.to_string()));
    }
    Value::Object(object)
}

/// Decode a flat JSON object, validating every property name as a [`Path`].
pub fn from_json(node: &Value) -> crate::Result<Properties> {
    let object = node
        .as_object()
        .ok_or_else(|| json_error(format!("properties must be a JSON object, found {node}")))?;
    object
        .iter()
        .map(|(name, child)| -> crate::Result<(Path, String)> {
            let path = Path::parse(name)?;
            let value = child.as_str().ok_or_else(|| {
                json_error(format!("property \"{name}\" must be a string, found {child}"))
            })?;
            Ok((path, value.to_string()))
        })
        .collect()
}

fn json_error(message: String) -> Error {
    Error::new(ErrorKind::Json).with_message(message)
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.value())
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Path::parse(&text).map_err(de::Error::custom)
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (path, value) in self.entries() {
            map.serialize_entry(path.value(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PropertiesVisitor)
    }
}

struct PropertiesVisitor;

impl<'de> Visitor<'de> for PropertiesVisitor {
    type Value = Properties;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of dotted paths to string values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Properties, A::Error> {
        let mut entries = Vec::new();
        while let Some(entry) = access.next_entry::<Path, String>()? {
            entries.push(entry);
        }
        Ok(entries.into_iter().collect())
    }
}

/// A type with a named JSON encoding that can be placed in a [`JsonRegistry`].
pub trait JsonCodec: Sized + 'static {
    const TYPE_NAME: &'static str;

    fn marshall(&self) -> Value;

    fn unmarshall(node: &Value) -> crate::Result<Self>;
}

impl JsonCodec for Properties {
    const TYPE_NAME: &'static str = "properties";

    fn marshall(&self) -> Value {
        to_json(self)
    }

    fn unmarshall(node: &Value) -> crate::Result<Self> {
        from_json(node)
    }
}

impl JsonCodec for Path {
    const TYPE_NAME: &'static str = "path";

    fn marshall(&self) -> Value {
        Value::String(self.value().to_string())
    }

    fn unmarshall(node: &Value) -> crate::Result<Self> {
        let text = node
            .as_str()
            .ok_or_else(|| json_error(format!("path must be a JSON string, found {node}")))?;
        Path::parse(text)
    }
}

type Unmarshaller = fn(&Value) -> crate::Result<Box<dyn Any>>;

struct Registration {
    type_id: TypeId,
    unmarshall: Unmarshaller,
}

fn unmarshall_boxed<T: JsonCodec>(node: &Value) -> crate::Result<Box<dyn Any>> {
    T::unmarshall(node).map(|value| Box::new(value) as Box<dyn Any>)
}

/// Caller-owned table of JSON codecs keyed by type name.
///
/// Typed values are wrapped as `{"type": <name>, "value": <json>}`. Only
/// registered types are accepted in either direction.
#[derive(Default)]
pub struct JsonRegistry {
    types: BTreeMap<&'static str, Registration>,
}

impl JsonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every codec this crate provides.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register::<Properties>().register::<Path>();
        registry
    }

    pub fn register<T: JsonCodec>(&mut self) -> &mut Self {
        self.types.insert(
            T::TYPE_NAME,
            Registration {
                type_id: TypeId::of::<T>(),
                unmarshall: unmarshall_boxed::<T>,
            },
        );
        self
    }

    pub fn is_registered(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.types.keys().copied()
    }

    pub fn marshall_typed<T: JsonCodec>(&self, value: &T) -> crate::Result<Value> {
        self.registration::<T>()?;
        let mut object = Map::new();
        object.insert("type".to_string(), Value::String(T::TYPE_NAME.to_string()));
        object.insert("value".to_string(), value.marshall());
        Ok(Value::Object(object))
    }

    pub fn unmarshall_typed<T: JsonCodec>(&self, node: &Value) -> crate::Result<T> {
        self.registration::<T>()?;
        let (type_name, value) = split_typed(node)?;
        if type_name != T::TYPE_NAME {
            return Err(json_error(format!(
                "expected type \"{}\", found \"{type_name}\"",
                T::TYPE_NAME
            )));
        }
        T::unmarshall(value)
    }

    /// Decode a typed node into whichever registered type its tag names.
    pub fn unmarshall_any(&self, node: &Value) -> crate::Result<Box<dyn Any>> {
        let (type_name, value) = split_typed(node)?;
        let registration = self
            .types
            .get(type_name)
            .ok_or_else(|| json_error(format!("unknown type \"{type_name}\"")))?;
        (registration.unmarshall)(value)
    }

    fn registration<T: JsonCodec>(&self) -> crate::Result<&Registration> {
        match self.types.get(T::TYPE_NAME) {
            Some(registration) if registration.type_id == TypeId::of::<T>() => Ok(registration),
            _ => Err(json_error(format!("type \"{}\" is not registered", T::TYPE_NAME))),
        }
    }
}

impl fmt::Debug for JsonRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.types.keys()).finish()
    }
}

fn split_typed(node: &Value) -> crate::Result<(&str, &Value)> {
    let type_name = node
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| json_error(format!("missing \"type\" in {node}")))?;
    let value = node
        .get("value")
        .ok_or_else(|| json_error(format!("missing \"value\" in {node}")))?;
    Ok((type_name, value))
}
