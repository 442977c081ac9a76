//! Parsed values and typed access to them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use crate::errors::{Error, Result};
use crate::opt::Action;

/// A stored option value.
///
/// The `as_{bool,count,int,float,str,vec}` methods provide convenient
/// access without destructuring manually. They are deliberately
/// best-effort and total: a malformed number converts to zero rather
/// than an error. Strict typed access goes through
/// [`Values::deserialize`].
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A boolean switch, written by the `StoreTrue`/`StoreFalse` actions.
    Switch(bool),

    /// The number of occurrences of a counted flag.
    Counted(u64),

    /// A single stored string.
    Plain(String),

    /// An ordered list of stored strings.
    List(Vec<String>),
}

impl Value {
    /// Returns the value as a bool.
    ///
    /// Counted repetitions are `true` if non-zero. Plain strings are
    /// `true` for `1` or `true`, `false` otherwise. Lists are `true` if
    /// non-empty.
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Switch(b) => *b,
            Value::Counted(n) => *n > 0,
            Value::Plain(s) => s == "1" || s == "true",
            Value::List(vs) => !vs.is_empty(),
        }
    }

    /// Returns the value as an occurrence count.
    ///
    /// Switches are `1` if set, plain strings convert best-effort, lists
    /// count their elements.
    pub fn as_count(&self) -> u64 {
        match self {
            Value::Switch(b) => u64::from(*b),
            Value::Counted(n) => *n,
            Value::Plain(s) => s.parse().unwrap_or(0),
            Value::List(vs) => vs.len() as u64,
        }
    }

    /// Returns the value converted to an integer, zero on failure.
    pub fn as_int(&self) -> i64 {
        match self {
            Value::Switch(b) => i64::from(*b),
            Value::Counted(n) => *n as i64,
            Value::Plain(s) => s.parse().unwrap_or(0),
            Value::List(_) => 0,
        }
    }

    /// Returns the value converted to a float, zero on failure.
    pub fn as_float(&self) -> f64 {
        match self {
            Value::Switch(b) => f64::from(u8::from(*b)),
            Value::Counted(n) => *n as f64,
            Value::Plain(s) => s.parse().unwrap_or(0.0),
            Value::List(_) => 0.0,
        }
    }

    /// Returns the value as a string.
    ///
    /// Everything except a plain string returns an empty string.
    pub fn as_str(&self) -> &str {
        match self {
            Value::Plain(s) => s,
            _ => "",
        }
    }

    /// Returns the value as a list of strings.
    ///
    /// Switches and counts correspond to an empty list, a plain string to
    /// a list of length one.
    pub fn as_vec(&self) -> Vec<&str> {
        match self {
            Value::Switch(_) | Value::Counted(_) => vec![],
            Value::Plain(s) => vec![s.as_str()],
            Value::List(vs) => vs.iter().map(|s| s.as_str()).collect(),
        }
    }
}

/// The mapping from destination names to parsed values.
///
/// Seeded with the declared defaults before parsing begins; parsing
/// overwrites or extends entries as option occurrences are consumed. A
/// fresh map is created for every parse invocation.
#[derive(Clone, Default)]
pub struct Values {
    pub(crate) map: HashMap<String, Value>,
}

impl Values {
    /// Create an empty value map.
    pub fn new() -> Values {
        Values::default()
    }

    /// Whether an entry exists for `dest`.
    pub fn is_set(&self, dest: &str) -> bool {
        self.map.contains_key(dest)
    }

    /// The raw value stored under `dest`.
    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.map.get(dest)
    }

    /// [`Value::as_bool`] of the entry, or `false` when absent.
    pub fn get_bool(&self, dest: &str) -> bool {
        self.get(dest).map_or(false, Value::as_bool)
    }

    /// [`Value::as_count`] of the entry, or `0` when absent.
    pub fn get_count(&self, dest: &str) -> u64 {
        self.get(dest).map_or(0, Value::as_count)
    }

    /// [`Value::as_int`] of the entry, or `0` when absent.
    pub fn get_int(&self, dest: &str) -> i64 {
        self.get(dest).map_or(0, Value::as_int)
    }

    /// [`Value::as_float`] of the entry, or `0.0` when absent.
    pub fn get_float(&self, dest: &str) -> f64 {
        self.get(dest).map_or(0.0, Value::as_float)
    }

    /// [`Value::as_str`] of the entry, or `""` when absent.
    pub fn get_str(&self, dest: &str) -> &str {
        self.get(dest).map_or("", Value::as_str)
    }

    /// [`Value::as_vec`] of the entry, or an empty list when absent.
    pub fn get_vec(&self, dest: &str) -> Vec<&str> {
        self.get(dest).map_or_else(Vec::new, Value::as_vec)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Deserialize the map into a struct whose fields are named after
    /// destinations.
    ///
    /// Switches deserialize as bools (an absent switch is `false`),
    /// counts as integers, plain strings as strings or parsed numbers,
    /// lists as sequences. An `Option` field is `None` when the
    /// destination is absent; any other field type fails with a
    /// [`Error::Deserialize`] naming the field. Unit enum variants match
    /// values case-insensitively.
    pub fn deserialize<T: de::DeserializeOwned>(&self) -> Result<T> {
        T::deserialize(Deserializer { vals: self })
    }

    pub(crate) fn insert(&mut self, dest: &str, value: Value) {
        self.map.insert(dest.to_string(), value);
    }

    pub(crate) fn append(&mut self, dest: &str, values: Vec<String>) {
        match self.map.get_mut(dest) {
            Some(Value::List(list)) => list.extend(values),
            _ => {
                self.map.insert(dest.to_string(), Value::List(values));
            }
        }
    }

    pub(crate) fn bump(&mut self, dest: &str) {
        let n = match self.map.get(dest) {
            Some(Value::Counted(n)) => n + 1,
            _ => 1,
        };
        self.map.insert(dest.to_string(), Value::Counted(n));
    }

    /// Seed a default, converting the raw string into the value shape the
    /// owning option's action will produce.
    pub(crate) fn seed(&mut self, dest: &str, action: Action, raw: &str) {
        let value = match action {
            Action::StoreTrue | Action::StoreFalse => {
                Value::Switch(raw == "1" || raw == "true")
            }
            Action::Count => Value::Counted(raw.parse().unwrap_or(0)),
            Action::Append => Value::List(vec![raw.to_string()]),
            _ => Value::Plain(raw.to_string()),
        };
        self.map.insert(dest.to_string(), value);
    }
}

impl fmt::Debug for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.map.is_empty() {
            return write!(f, "{{EMPTY}}");
        }
        // Sort the keys for predictable output.
        let mut keys: Vec<&String> = self.map.keys().collect();
        keys.sort();
        let mut first = true;
        for k in keys {
            if !first {
                writeln!(f)?;
            } else {
                first = false;
            }
            write!(f, "{} => {:?}", k, self.map[k])?;
        }
        Ok(())
    }
}

/// Deserializer for [`Values`] into your own `Deserialize` types.
///
/// In general you shouldn't have to use this type directly; call
/// [`Values::deserialize`] instead. It is exposed for generic code that
/// wants to drive deserialization itself.
pub struct Deserializer<'a> {
    vals: &'a Values,
}

impl<'de, 'a: 'de> de::Deserializer<'de> for Deserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, _visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        Err(Error::Deserialize(
            "a value map deserializes only into a struct or map".to_string(),
        ))
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let fields: Vec<&str> = fields.to_vec();
        visitor.visit_map(FieldAccess { vals: self.vals, fields: fields.into_iter(), field: None })
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let mut keys: Vec<&str> = self.vals.map.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        visitor.visit_map(FieldAccess { vals: self.vals, fields: keys.into_iter(), field: None })
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct enum identifier ignored_any
    }
}

struct FieldAccess<'a> {
    vals: &'a Values,
    fields: std::vec::IntoIter<&'a str>,
    field: Option<&'a str>,
}

impl<'de, 'a: 'de> de::MapAccess<'de> for FieldAccess<'a> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.fields.next() {
            None => Ok(None),
            Some(field) => {
                self.field = Some(field);
                seed.deserialize(de::value::StrDeserializer::new(field)).map(Some)
            }
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let field = self.field.take().unwrap_or("");
        // Destinations are usually underscored already; fall back to the
        // dashed spelling for explicitly dashed dests.
        let val = self
            .vals
            .get(field)
            .or_else(|| self.vals.get(&field.replace('_', "-")));
        seed.deserialize(ValueDeserializer { val, key: field })
    }
}

struct ValueDeserializer<'a> {
    val: Option<&'a Value>,
    key: &'a str,
}

impl<'a> ValueDeserializer<'a> {
    fn missing(&self) -> Error {
        Error::Deserialize(format!("Could not find option value for '{}'.", self.key))
    }

    fn value(&self) -> Result<&'a Value> {
        self.val.ok_or_else(|| self.missing())
    }

    fn to_number<T: FromStr>(&self, expect: &str) -> Result<T> {
        let v = self.value()?;
        let s = match v {
            Value::Counted(n) => {
                return n.to_string().parse().map_err(|_| {
                    Error::Deserialize(format!(
                        "Could not decode '{}' to {} for '{}'.",
                        n, expect, self.key
                    ))
                })
            }
            _ => v.as_str().trim(),
        };
        let s = if s.is_empty() { "0" } else { s };
        s.parse().map_err(|_| {
            Error::Deserialize(format!(
                "Could not decode '{}' to {} for '{}'.",
                s, expect, self.key
            ))
        })
    }
}

macro_rules! deserialize_num {
    ($method:ident, $visit:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: Visitor<'de>,
        {
            visitor.$visit(self.to_number::<$ty>(stringify!($ty))?)
        }
    };
}

impl<'de, 'a: 'de> de::Deserializer<'de> for ValueDeserializer<'a> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.val {
            None => visitor.visit_unit(),
            Some(Value::Switch(b)) => visitor.visit_bool(*b),
            Some(Value::Counted(n)) => visitor.visit_u64(*n),
            Some(Value::Plain(s)) => visitor.visit_str(s),
            Some(Value::List(_)) => self.deserialize_seq(visitor),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_bool(self.val.map_or(false, Value::as_bool))
    }

    deserialize_num!(deserialize_i8, visit_i8, i8);
    deserialize_num!(deserialize_i16, visit_i16, i16);
    deserialize_num!(deserialize_i32, visit_i32, i32);
    deserialize_num!(deserialize_i64, visit_i64, i64);
    deserialize_num!(deserialize_u8, visit_u8, u8);
    deserialize_num!(deserialize_u16, visit_u16, u16);
    deserialize_num!(deserialize_u32, visit_u32, u32);
    deserialize_num!(deserialize_u64, visit_u64, u64);
    deserialize_num!(deserialize_f32, visit_f32, f32);
    deserialize_num!(deserialize_f64, visit_f64, f64);

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let s = self.value()?.as_str();
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(Error::Deserialize(format!(
                "Could not decode '{}' into char for '{}'.",
                s, self.key
            ))),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_str(self.value()?.as_str())
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.val {
            None => visitor.visit_none(),
            Some(_) => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let items: Vec<&str> = self.val.map_or_else(Vec::new, Value::as_vec);
        visitor.visit_seq(ListAccess { items: items.into_iter() })
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        let v = self.value()?.as_str();
        let lower = v.to_lowercase();
        let variant = variants
            .iter()
            .find(|n| n.to_lowercase() == lower)
            .ok_or_else(|| {
                Error::Deserialize(format!(
                    "Could not match '{}' with any of the allowed variants: {:?}",
                    v, variants
                ))
            })?;
        visitor.visit_enum((*variant).into_deserializer())
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        i128 u128 bytes byte_buf map struct tuple tuple_struct
    }
}

struct ListAccess<'a> {
    items: std::vec::IntoIter<&'a str>,
}

impl<'de, 'a: 'de> de::SeqAccess<'de> for ListAccess<'a> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.items.next() {
            None => Ok(None),
            Some(item) => {
                seed.deserialize(de::value::StrDeserializer::new(item)).map(Some)
            }
        }
    }
}
