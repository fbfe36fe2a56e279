//! # Schema Module
//!
//! Turns the ordered field descriptors of an entity into immutable
//! [`EntityMeta`]: the table name, the primary key, the other mapped fields and
//! the SQL templates every CRUD helper runs. Templates use `?` placeholders and
//! backtick-quoted identifiers; the executor adapts both to the driver.

use crate::{database::Drivers, error::SchemaError, field::Field};

// ============================================================================
// EntitySchema
// ============================================================================

/// Declaration of an entity: its type name, an optional table override and
/// its fields in declaration order.
#[derive(Debug, Clone)]
pub struct EntitySchema {
    name: String,
    table: Option<String>,
    fields: Vec<Field>,
}

impl EntitySchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), table: None, fields: Vec::new() }
    }

    /// Overrides the table name, which otherwise is the entity type name.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Validates the declaration and derives the statement templates.
    pub fn build(self) -> Result<EntityMeta, SchemaError> {
        let table = self.table.unwrap_or_else(|| self.name.clone());
        log::info!("found model: {} (table: {})", self.name, table);

        let mut primary_key: Option<String> = None;
        let mut fields = Vec::new();

        for (position, field) in self.fields.iter().enumerate() {
            if self.fields[..position].iter().any(|f| f.name == field.name) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            log::debug!("  found mapping: {} ==> {}", field.name, field);

            if field.primary_key {
                if primary_key.is_some() {
                    return Err(SchemaError::DuplicatePrimaryKey(field.name.clone()));
                }
                primary_key = Some(field.name.clone());
            } else {
                fields.push(field.name.clone());
            }
        }

        let primary_key = primary_key.ok_or_else(|| SchemaError::NoPrimaryKey(self.name.clone()))?;

        let column_of = |name: &str| -> String {
            self.fields.iter().find(|f| f.name == name).map_or(name, Field::column_name).to_string()
        };
        let pk_column = column_of(primary_key.as_str());
        let columns: Vec<String> = fields.iter().map(|f| column_of(f.as_str())).collect();
        let escaped: Vec<String> = columns.iter().map(|c| quote(c)).collect();

        let select = if escaped.is_empty() {
            format!("select {} from {}", quote(&pk_column), quote(&table))
        } else {
            format!("select {}, {} from {}", quote(&pk_column), escaped.join(", "), quote(&table))
        };

        let mut insert_columns = escaped.clone();
        insert_columns.push(quote(&pk_column));
        let insert = format!(
            "insert into {} ({}) values ({})",
            quote(&table),
            insert_columns.join(", "),
            placeholders(insert_columns.len())
        );

        let assignments = if escaped.is_empty() {
            format!("{}={}", quote(&pk_column), quote(&pk_column))
        } else {
            escaped.iter().map(|c| format!("{}=?", c)).collect::<Vec<_>>().join(", ")
        };
        let update = format!("update {} set {} where {}=?", quote(&table), assignments, quote(&pk_column));

        let delete = format!("delete from {} where {}=?", quote(&table), quote(&pk_column));

        let create = create_statement(&table, &self.fields, None);

        Ok(EntityMeta {
            name: self.name,
            table,
            primary_key,
            fields,
            mappings: self.fields,
            select,
            insert,
            update,
            delete,
            create,
        })
    }
}

fn create_statement(table: &str, mappings: &[Field], driver: Option<Drivers>) -> String {
    let definitions: Vec<String> = mappings
        .iter()
        .map(|f| {
            let column_type = match driver {
                Some(driver) => f.kind.column_type_for(driver),
                None => f.column_type(),
            };
            let mut def = format!("{} {}", quote(f.column_name()), column_type);
            if f.primary_key {
                def.push_str(" primary key");
            }
            def
        })
        .collect();
    format!("create table if not exists {} ({})", quote(table), definitions.join(", "))
}

fn quote(identifier: &str) -> String {
    format!("`{}`", identifier)
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

// ============================================================================
// EntityMeta
// ============================================================================

/// Derived, immutable description of an entity type.
#[derive(Debug, Clone)]
pub struct EntityMeta {
    /// The entity type name.
    pub name: String,
    pub table: String,
    /// Attribute name of the primary key.
    pub primary_key: String,
    /// Attribute names of the non-key fields, in declaration order.
    pub fields: Vec<String>,
    /// All field descriptors, in declaration order.
    pub mappings: Vec<Field>,
    pub select: String,
    pub insert: String,
    pub update: String,
    pub delete: String,
    pub create: String,
}

impl EntityMeta {
    /// Looks up the descriptor of an attribute.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.mappings.iter().find(|f| f.name == name)
    }

    /// Column name of an attribute; unmapped names are returned unchanged.
    pub fn column<'a>(&'a self, name: &'a str) -> &'a str {
        self.field(name).map_or(name, Field::column_name)
    }

    pub fn primary_key_column(&self) -> &str {
        self.column(&self.primary_key)
    }

    /// The `create table` statement with column types adjusted for `driver`.
    pub fn create_for(&self, driver: Drivers) -> String {
        create_statement(&self.table, &self.mappings, Some(driver))
    }
}
