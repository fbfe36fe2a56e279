//! # Field Module
//!
//! Descriptors for the mapped attributes of an entity: the column kind, an
//! optional column name, the primary-key flag and the default used when an
//! instance carries no value.

use std::{fmt, sync::Arc};

use crate::{database::Drivers, Value};

/// The closed set of column kinds an entity field can map to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `varchar(width)`
    String { width: u32 },
    Boolean,
    Integer,
    Float,
    Text,
}

impl FieldKind {
    /// The column DDL type for this kind.
    pub fn column_type(&self) -> String {
        match self {
            FieldKind::String { width } => format!("varchar({})", width),
            FieldKind::Boolean => "boolean".to_string(),
            FieldKind::Integer => "bigint".to_string(),
            FieldKind::Float => "real".to_string(),
            FieldKind::Text => "text".to_string(),
        }
    }

    /// The column DDL type for this kind on `driver`.
    ///
    /// SQLite declares booleans as `integer`; a `boolean` column there is not
    /// readable through the any driver.
    pub fn column_type_for(&self, driver: Drivers) -> String {
        match (self, driver) {
            (FieldKind::Boolean, Drivers::SQLite) => "integer".to_string(),
            _ => self.column_type(),
        }
    }

    /// Whether a field of this kind may be the primary key.
    pub fn can_be_primary_key(&self) -> bool {
        !matches!(self, FieldKind::Boolean | FieldKind::Text)
    }

    fn label(&self) -> &'static str {
        match self {
            FieldKind::String { .. } => "StringField",
            FieldKind::Boolean => "BooleanField",
            FieldKind::Integer => "IntegerField",
            FieldKind::Float => "FloatField",
            FieldKind::Text => "TextField",
        }
    }

    fn raw_default(&self) -> FieldDefault {
        match self {
            FieldKind::Boolean => FieldDefault::Value(Value::Bool(false)),
            FieldKind::Integer => FieldDefault::Value(Value::Int(0)),
            FieldKind::Float => FieldDefault::Value(Value::Float(0.0)),
            FieldKind::String { .. } | FieldKind::Text => FieldDefault::None,
        }
    }
}

/// What a field falls back to when an instance has no value for it.
#[derive(Clone, Default)]
pub enum FieldDefault {
    #[default]
    None,
    Value(Value),
    /// Evaluated on every resolution, e.g. an id generator or a clock read.
    Producer(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl FieldDefault {
    pub fn resolve(&self) -> Option<Value> {
        match self {
            FieldDefault::None => None,
            FieldDefault::Value(value) => Some(value.clone()),
            FieldDefault::Producer(produce) => Some(produce()),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldDefault::None => write!(f, "None"),
            FieldDefault::Value(value) => f.debug_tuple("Value").field(value).finish(),
            FieldDefault::Producer(_) => write!(f, "Producer(..)"),
        }
    }
}

/// Metadata for one mapped attribute of an entity.
///
/// Built with one of the kind constructors and refined with the chained
/// overrides:
///
/// ```rust,ignore
/// Field::string("id").width(50).primary_key().default_with(defaults::next_id)
/// ```
#[derive(Debug, Clone)]
pub struct Field {
    /// Attribute name on the entity.
    pub name: String,
    /// Column name, when it differs from the attribute name.
    pub column: Option<String>,
    pub kind: FieldKind,
    pub primary_key: bool,
    pub default: FieldDefault,
}

impl Field {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self { name: name.into(), column: None, kind, primary_key: false, default: kind.raw_default() }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String { width: 100 })
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Marks the field as the primary key. Ignored for boolean and text kinds.
    pub fn primary_key(mut self) -> Self {
        if self.kind.can_be_primary_key() {
            self.primary_key = true;
        } else {
            log::warn!("{} cannot be a primary key, flag ignored", self.name);
        }
        self
    }

    /// Sets the varchar width. Ignored for kinds other than string.
    pub fn width(mut self, width: u32) -> Self {
        if let FieldKind::String { .. } = self.kind {
            self.kind = FieldKind::String { width };
        }
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    pub fn default_with<F, V>(mut self, produce: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        self.default = FieldDefault::Producer(Arc::new(move || produce().into()));
        self
    }

    /// The column this field is stored in.
    pub fn column_name(&self) -> &str {
        self.column.as_deref().unwrap_or(&self.name)
    }

    pub fn column_type(&self) -> String {
        self.kind.column_type()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}, {}:{}>", self.kind.label(), self.column_type(), self.column_name())
    }
}
