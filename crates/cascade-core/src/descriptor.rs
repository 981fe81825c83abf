//! # Type Descriptors
//!
//! A [`TypeDescriptor`] is the immutable description of an expected shape.
//! It is a closed sum type so that the checker can dispatch with a single
//! exhaustive `match`, and it is `Eq + Hash` so that registries can key on
//! it directly. Registry lookup is exact: two descriptors match only if they
//! are structurally equal. There is no subtype widening and no walk up a
//! type hierarchy.
//!
//! ## Text Form
//!
//! Descriptors have a compact text form used by `Display`, `FromStr` and
//! serde:
//!
//! ```text
//! Any | None | bool | int | float | str | bytes
//! list[T] | tuple[T] | set[T] | dict[K, V] | list | dict ...
//! A | B            Optional[T]            Union[A, B, ...]
//! UserId           (any other identifier names a custom type)
//! 'my-type'        (quoted custom name: not an identifier, or a built-in name)
//! Union[]          (the empty union, which matches nothing)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value::Value;

/// Name of a caller-defined type.
///
/// Any string is accepted. In the descriptor text form a name is written
/// bare when it is a plain identifier (letters, digits, `_` and `.`, not
/// starting with a digit) that is not a built-in name, and quoted
/// otherwise, so every name parses back to the same descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the name can be written bare in the text form.
    pub fn is_plain(&self) -> bool {
        let mut chars = self.0.chars();
        let starts_well = chars.next().is_some_and(|c| c.is_alphabetic() || c == '_');
        starts_well
            && chars.all(is_ident_char)
            && !RESERVED_NAMES.contains(&self.0.as_str())
    }
}

/// Identifiers the text form reads as something other than a custom type.
const RESERVED_NAMES: &[&str] = &[
    "Any", "None", "bool", "int", "float", "str", "bytes", "list", "List", "tuple", "Tuple",
    "set", "Set", "dict", "Dict", "Optional", "Union",
];

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A concrete scalar type identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    None,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
}

impl PrimitiveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::None => "None",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Int => "int",
            PrimitiveType::Float => "float",
            PrimitiveType::Str => "str",
            PrimitiveType::Bytes => "bytes",
        }
    }

    /// Exact-kind membership.
    pub fn admits(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (PrimitiveType::None, Value::None)
                | (PrimitiveType::Bool, Value::Bool(_))
                | (PrimitiveType::Int, Value::Int(_))
                | (PrimitiveType::Float, Value::Float(_))
                | (PrimitiveType::Str, Value::Str(_))
                | (PrimitiveType::Bytes, Value::Bytes(_))
        )
    }
}

/// The outer kind of a parameterized container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    List,
    Tuple,
    Set,
    Map,
}

impl ContainerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::List => "list",
            ContainerKind::Tuple => "tuple",
            ContainerKind::Set => "set",
            ContainerKind::Map => "dict",
        }
    }

    /// Sequence and set kinds validate their elements against a single
    /// element descriptor.
    pub fn is_sequence_like(&self) -> bool {
        !self.is_mapping_like()
    }

    /// Mapping kinds validate keys and values against two descriptors.
    pub fn is_mapping_like(&self) -> bool {
        matches!(self, ContainerKind::Map)
    }

    /// Outer-kind membership; elements are not inspected.
    pub fn admits(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ContainerKind::List, Value::List(_))
                | (ContainerKind::Tuple, Value::Tuple(_))
                | (ContainerKind::Set, Value::Set(_))
                | (ContainerKind::Map, Value::Map(_))
        )
    }
}

/// The expected shape of a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeDescriptor {
    /// Matches anything.
    Any,
    /// A concrete scalar type.
    Primitive(PrimitiveType),
    /// Ordered alternatives; a value matches if any alternative matches.
    ///
    /// Prefer [`TypeDescriptor::union`], which normalizes the alternatives.
    Union(Vec<TypeDescriptor>),
    /// An outer container kind plus zero or more element descriptors.
    Container {
        kind: ContainerKind,
        params: Vec<TypeDescriptor>,
    },
    /// A caller-defined type, usually governed by a registered validator.
    Custom(TypeName),
}

impl TypeDescriptor {
    pub const NONE: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveType::None);
    pub const BOOL: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveType::Bool);
    pub const INT: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveType::Int);
    pub const FLOAT: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveType::Float);
    pub const STR: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveType::Str);
    pub const BYTES: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveType::Bytes);

    /// Normalized union: nested unions are flattened, repeated alternatives
    /// dropped (first occurrence wins) and a single alternative collapses to
    /// itself. No alternatives gives the empty union, which matches nothing
    /// and is written `Union[]`.
    pub fn union<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = TypeDescriptor>,
    {
        let mut flat: Vec<TypeDescriptor> = Vec::new();
        for alternative in alternatives {
            let nested = match alternative {
                TypeDescriptor::Union(inner) => inner,
                other => vec![other],
            };
            for descriptor in nested {
                if !flat.contains(&descriptor) {
                    flat.push(descriptor);
                }
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            TypeDescriptor::Union(flat)
        }
    }

    /// `inner | None`.
    pub fn optional(inner: TypeDescriptor) -> Self {
        Self::union([inner, Self::NONE])
    }

    pub fn container(kind: ContainerKind, params: Vec<TypeDescriptor>) -> Self {
        TypeDescriptor::Container { kind, params }
    }

    pub fn list_of(item: TypeDescriptor) -> Self {
        Self::container(ContainerKind::List, vec![item])
    }

    pub fn tuple_of(item: TypeDescriptor) -> Self {
        Self::container(ContainerKind::Tuple, vec![item])
    }

    pub fn set_of(item: TypeDescriptor) -> Self {
        Self::container(ContainerKind::Set, vec![item])
    }

    pub fn map_of(key: TypeDescriptor, value: TypeDescriptor) -> Self {
        Self::container(ContainerKind::Map, vec![key, value])
    }

    pub fn custom(name: impl Into<TypeName>) -> Self {
        TypeDescriptor::Custom(name.into())
    }

    pub fn is_any(&self) -> bool {
        matches!(self, TypeDescriptor::Any)
    }

    /// Shallow membership.
    ///
    /// Primitives and custom types require the exact kind (custom values
    /// must carry the same type name), unions require any alternative to
    /// admit the value, and containers only check the outer kind.
    pub fn admits(&self, value: &Value) -> bool {
        match self {
            TypeDescriptor::Any => true,
            TypeDescriptor::Primitive(primitive) => primitive.admits(value),
            TypeDescriptor::Union(alternatives) => alternatives.iter().any(|a| a.admits(value)),
            TypeDescriptor::Container { kind, .. } => kind.admits(value),
            TypeDescriptor::Custom(name) => {
                matches!(value, Value::Custom(custom) if custom.type_name() == name)
            }
        }
    }
}

impl From<PrimitiveType> for TypeDescriptor {
    fn from(primitive: PrimitiveType) -> Self {
        TypeDescriptor::Primitive(primitive)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Any => f.write_str("Any"),
            TypeDescriptor::Primitive(primitive) => f.write_str(primitive.as_str()),
            TypeDescriptor::Union(alternatives) if alternatives.is_empty() => f.write_str("Union[]"),
            TypeDescriptor::Union(alternatives) => {
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{alternative}")?;
                }
                Ok(())
            }
            TypeDescriptor::Container { kind, params } => {
                f.write_str(kind.as_str())?;
                if !params.is_empty() {
                    f.write_str("[")?;
                    for (i, param) in params.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{param}")?;
                    }
                    f.write_str("]")?;
                }
                Ok(())
            }
            TypeDescriptor::Custom(name) if name.is_plain() => write!(f, "{name}"),
            TypeDescriptor::Custom(name) => {
                f.write_str("'")?;
                for c in name.as_str().chars() {
                    if c == '\'' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("'")
            }
        }
    }
}

/// Error parsing the text form of a descriptor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DescriptorParseError {
    #[error("unexpected end of type descriptor")]
    UnexpectedEnd,

    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },

    #[error("'{name}' does not take type parameters")]
    UnexpectedParams { name: String },

    #[error("'{name}' takes {expected} type parameter(s), got {found}")]
    ParamCount {
        name: String,
        expected: &'static str,
        found: usize,
    },
}

impl FromStr for TypeDescriptor {
    type Err = DescriptorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { src: s, pos: 0 };
        let descriptor = parser.parse_union()?;
        parser.skip_ws();
        match parser.peek() {
            None => Ok(descriptor),
            Some(found) => Err(DescriptorParseError::UnexpectedChar {
                found,
                offset: parser.pos,
            }),
        }
    }
}

impl TryFrom<String> for TypeDescriptor {
    type Error = DescriptorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TypeDescriptor> for String {
    fn from(descriptor: TypeDescriptor) -> Self {
        descriptor.to_string()
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn unexpected(&self) -> DescriptorParseError {
        match self.peek() {
            Some(found) => DescriptorParseError::UnexpectedChar {
                found,
                offset: self.pos,
            },
            None => DescriptorParseError::UnexpectedEnd,
        }
    }

    fn parse_union(&mut self) -> Result<TypeDescriptor, DescriptorParseError> {
        let mut alternatives = vec![self.parse_term()?];
        while self.eat('|') {
            alternatives.push(self.parse_term()?);
        }
        Ok(TypeDescriptor::union(alternatives))
    }

    fn parse_ident(&mut self) -> Result<&str, DescriptorParseError> {
        self.skip_ws();
        let start = self.pos;
        match self.peek() {
            Some(c) if c.is_alphabetic() || c == '_' => {}
            _ => return Err(self.unexpected()),
        }
        while let Some(c) = self.peek().filter(|c| is_ident_char(*c)) {
            self.pos += c.len_utf8();
        }
        Ok(&self.src[start..self.pos])
    }

    /// A quoted custom name. A backslash escapes the next character.
    fn parse_quoted(&mut self) -> Result<TypeDescriptor, DescriptorParseError> {
        let mut name = String::new();
        loop {
            let c = self.peek().ok_or(DescriptorParseError::UnexpectedEnd)?;
            self.pos += c.len_utf8();
            match c {
                '\'' => return Ok(TypeDescriptor::Custom(TypeName(name))),
                '\\' => {
                    let escaped = self.peek().ok_or(DescriptorParseError::UnexpectedEnd)?;
                    self.pos += escaped.len_utf8();
                    name.push(escaped);
                }
                other => name.push(other),
            }
        }
    }

    fn parse_term(&mut self) -> Result<TypeDescriptor, DescriptorParseError> {
        if self.eat('\'') {
            return self.parse_quoted();
        }
        let name = self.parse_ident()?.to_owned();
        let params = if !self.eat('[') {
            None
        } else if self.eat(']') {
            Some(Vec::new())
        } else {
            let mut params = vec![self.parse_union()?];
            while self.eat(',') {
                params.push(self.parse_union()?);
            }
            if !self.eat(']') {
                return Err(self.unexpected());
            }
            Some(params)
        };
        resolve(name, params)
    }
}

fn resolve(
    name: String,
    params: Option<Vec<TypeDescriptor>>,
) -> Result<TypeDescriptor, DescriptorParseError> {
    let container = match name.as_str() {
        "list" | "List" => Some(ContainerKind::List),
        "tuple" | "Tuple" => Some(ContainerKind::Tuple),
        "set" | "Set" => Some(ContainerKind::Set),
        "dict" | "Dict" => Some(ContainerKind::Map),
        _ => None,
    };
    if let Some(kind) = container {
        return Ok(TypeDescriptor::container(kind, params.unwrap_or_default()));
    }

    match (name.as_str(), params) {
        ("Optional", Some(mut params)) if params.len() == 1 => {
            Ok(TypeDescriptor::optional(params.remove(0)))
        }
        ("Optional", params) => Err(DescriptorParseError::ParamCount {
            name: name.clone(),
            expected: "exactly 1",
            found: params.map_or(0, |p| p.len()),
        }),
        ("Union", Some(params)) => Ok(TypeDescriptor::union(params)),
        ("Union", None) => Err(DescriptorParseError::ParamCount {
            name: name.clone(),
            expected: "a bracketed list of",
            found: 0,
        }),
        (_, Some(_)) => Err(DescriptorParseError::UnexpectedParams { name: name.clone() }),
        ("Any", None) => Ok(TypeDescriptor::Any),
        ("None", None) => Ok(TypeDescriptor::NONE),
        ("bool", None) => Ok(TypeDescriptor::BOOL),
        ("int", None) => Ok(TypeDescriptor::INT),
        ("float", None) => Ok(TypeDescriptor::FLOAT),
        ("str", None) => Ok(TypeDescriptor::STR),
        ("bytes", None) => Ok(TypeDescriptor::BYTES),
        (_, None) => Ok(TypeDescriptor::Custom(TypeName(name.clone()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> TypeDescriptor {
        s.parse().unwrap()
    }

    #[test]
    fn test_union_flattens_and_dedups() {
        let inner = TypeDescriptor::union([TypeDescriptor::INT, TypeDescriptor::STR]);
        let outer = TypeDescriptor::union([inner, TypeDescriptor::INT, TypeDescriptor::NONE]);
        assert_eq!(
            outer,
            TypeDescriptor::Union(vec![
                TypeDescriptor::INT,
                TypeDescriptor::STR,
                TypeDescriptor::NONE
            ])
        );
    }

    #[test]
    fn test_single_alternative_union_collapses() {
        assert_eq!(TypeDescriptor::union([TypeDescriptor::INT]), TypeDescriptor::INT);
    }

    #[test]
    fn test_parse_primitives_and_containers() {
        assert_eq!(parse("int"), TypeDescriptor::INT);
        assert_eq!(parse("list[int]"), TypeDescriptor::list_of(TypeDescriptor::INT));
        assert_eq!(
            parse("Dict[str, list[int]]"),
            TypeDescriptor::map_of(
                TypeDescriptor::STR,
                TypeDescriptor::list_of(TypeDescriptor::INT)
            )
        );
        assert_eq!(
            parse("tuple"),
            TypeDescriptor::container(ContainerKind::Tuple, vec![])
        );
    }

    #[test]
    fn test_parse_unions() {
        assert_eq!(
            parse("Optional[int]"),
            TypeDescriptor::optional(TypeDescriptor::INT)
        );
        assert_eq!(parse("int | None"), parse("Optional[int]"));
        assert_eq!(parse("Union[int, str]"), parse(" int|str "));
    }

    #[test]
    fn test_parse_custom() {
        assert_eq!(parse("UserId"), TypeDescriptor::custom("UserId"));
        assert_eq!(parse("geo.Point"), TypeDescriptor::custom("geo.Point"));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "int[str]".parse::<TypeDescriptor>(),
            Err(DescriptorParseError::UnexpectedParams { name: "int".into() })
        );
        assert_eq!(
            "list[int".parse::<TypeDescriptor>(),
            Err(DescriptorParseError::UnexpectedEnd)
        );
        assert_eq!(
            "int str".parse::<TypeDescriptor>(),
            Err(DescriptorParseError::UnexpectedChar { found: 's', offset: 4 })
        );
        assert!(matches!(
            "Optional[int, str]".parse::<TypeDescriptor>(),
            Err(DescriptorParseError::ParamCount { found: 2, .. })
        ));
        assert_eq!(
            "".parse::<TypeDescriptor>(),
            Err(DescriptorParseError::UnexpectedEnd)
        );
    }

    #[test]
    fn test_display() {
        let descriptor = TypeDescriptor::map_of(
            TypeDescriptor::STR,
            TypeDescriptor::optional(TypeDescriptor::list_of(TypeDescriptor::INT)),
        );
        assert_eq!(descriptor.to_string(), "dict[str, list[int] | None]");
    }

    #[test]
    fn test_serde_uses_text_form() {
        let descriptor = TypeDescriptor::list_of(TypeDescriptor::custom("UserId"));
        let json = serde_json::to_string(&descriptor).unwrap();
        assert_eq!(json, "\"list[UserId]\"");
        let back: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, descriptor);
        assert!(serde_json::from_str::<TypeDescriptor>("\"int[\"").is_err());
    }

    #[test]
    fn test_names_that_are_not_identifiers_are_quoted() {
        let odd = TypeDescriptor::custom("my-type");
        assert_eq!(odd.to_string(), "'my-type'");
        assert_eq!(parse("'my-type'"), odd);

        let json = serde_json::to_string(&TypeDescriptor::list_of(odd.clone())).unwrap();
        let back: TypeDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TypeDescriptor::list_of(odd));

        let tricky = TypeDescriptor::custom(r"it's a\b");
        assert_eq!(tricky.to_string(), r"'it\'s a\\b'");
        assert_eq!(parse(&tricky.to_string()), tricky);
        assert_eq!(parse(&TypeDescriptor::custom("").to_string()), TypeDescriptor::custom(""));
    }

    #[test]
    fn test_reserved_custom_names_stay_custom() {
        for name in ["int", "list", "Optional", "Union", "None"] {
            let custom = TypeDescriptor::custom(name);
            assert_eq!(custom.to_string(), format!("'{name}'"));
            assert_eq!(parse(&custom.to_string()), custom);
        }
        assert_eq!(parse("int | 'int'"), TypeDescriptor::union([
            TypeDescriptor::INT,
            TypeDescriptor::custom("int"),
        ]));
        assert!(TypeName::new("UserId").is_plain());
        assert!(TypeName::new("geo.Point").is_plain());
        assert!(!TypeName::new("1st").is_plain());
    }

    #[test]
    fn test_unterminated_quoted_name() {
        assert_eq!(
            "'open".parse::<TypeDescriptor>(),
            Err(DescriptorParseError::UnexpectedEnd)
        );
    }

    #[test]
    fn test_empty_union_has_a_text_form() {
        let never = TypeDescriptor::union(Vec::new());
        assert_eq!(never, TypeDescriptor::Union(vec![]));
        assert_eq!(never.to_string(), "Union[]");
        assert_eq!(parse("Union[]"), never);
        assert_eq!(
            parse("dict[str, Union[]]"),
            TypeDescriptor::map_of(TypeDescriptor::STR, never.clone())
        );
        assert!(!never.admits(&Value::None));
        // An empty union inside another union contributes nothing.
        assert_eq!(
            TypeDescriptor::union([never, TypeDescriptor::INT]),
            TypeDescriptor::INT
        );
    }

    #[test]
    fn test_admits_is_shallow() {
        let list_of_int = TypeDescriptor::list_of(TypeDescriptor::INT);
        assert!(list_of_int.admits(&Value::list(["not", "ints"])));
        assert!(!list_of_int.admits(&Value::tuple([1])));
        assert!(!TypeDescriptor::INT.admits(&Value::Bool(true)));
        assert!(TypeDescriptor::custom("UserId").admits(&Value::custom("UserId", 1)));
        assert!(!TypeDescriptor::custom("UserId").admits(&Value::custom("OrderId", 1)));
        assert!(!TypeDescriptor::custom("UserId").admits(&Value::Int(1)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        pub(crate) fn descriptor() -> impl Strategy<Value = TypeDescriptor> {
            let leaf = prop_oneof![
                Just(TypeDescriptor::Any),
                Just(TypeDescriptor::NONE),
                Just(TypeDescriptor::BOOL),
                Just(TypeDescriptor::INT),
                Just(TypeDescriptor::FLOAT),
                Just(TypeDescriptor::STR),
                Just(TypeDescriptor::BYTES),
                prop_oneof![
                    "[A-Z][a-z]{1,6}Id",
                    r"[a-z' \\.-]{0,6}",
                    "(int|list|Union|None)",
                ]
                .prop_map(TypeDescriptor::custom),
            ];
            leaf.prop_recursive(3, 24, 3, |inner| {
                prop_oneof![
                    inner.clone().prop_map(TypeDescriptor::list_of),
                    inner.clone().prop_map(TypeDescriptor::set_of),
                    (inner.clone(), inner.clone())
                        .prop_map(|(k, v)| TypeDescriptor::map_of(k, v)),
                    prop::collection::vec(inner, 0..4).prop_map(TypeDescriptor::union),
                ]
            })
        }

        proptest! {
            /// The text form parses back to the same descriptor.
            #[test]
            fn text_form_round_trips(descriptor in descriptor()) {
                let text = descriptor.to_string();
                let parsed: TypeDescriptor = text.parse().unwrap();
                prop_assert_eq!(parsed, descriptor);
            }
        }
    }
}
