//! Shape stand-ins: request tracking in query mode, concrete values in data mode.
//!
//! A [`Shape`] conforms to one registered type and operates in exactly one of two
//! modes. A query-mode shape holds no real values: every field access on it is
//! recorded into an ordered request tree, and model-typed fields hand back child
//! query shapes to keep recording deeper. A data-mode shape is the opposite: it
//! holds hydrated values and recording never happens. The two behaviors are an
//! explicit branch on the mode tag, not implicit dispatch.

use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::QueryError;
use crate::schema::Schema;

/// An in-memory stand-in for one record of a registered type.
#[derive(Debug)]
pub struct Shape {
    schema: Arc<Schema>,
    type_name: String,
    mode: Mode,
    pub(crate) fields: IndexMap<String, Slot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Query,
    Data,
}

/// One field slot: either a scalar value or a list of child shapes.
///
/// Query mode stores exactly one child per model field; data mode stores however
/// many records the response carried.
#[derive(Debug)]
pub(crate) enum Slot {
    Scalar(Value),
    Models(Vec<Shape>),
}

/// The result of one field access, uniform across both modes.
#[derive(Debug)]
pub enum FieldValue<'a> {
    /// A scalar value: the hydrated value in data mode, a null placeholder in
    /// query mode.
    Scalar(&'a Value),

    /// Child shapes for a model-typed field. Always a one-element list in query
    /// mode, so declared-array and declared-singular fields read the same way.
    Models(&'a mut Vec<Shape>),
}

impl Shape {
    /// Create a query-mode shape with an empty request tree.
    pub fn for_query(schema: Arc<Schema>, type_name: &str) -> Result<Self, QueryError> {
        if !schema.is_model_type(type_name) {
            return Err(QueryError::UnknownType(type_name.to_string()));
        }
        Ok(Shape {
            schema,
            type_name: type_name.to_string(),
            mode: Mode::Query,
            fields: IndexMap::new(),
        })
    }

    /// Create a data-mode shape with every declared field at its unset default:
    /// null for scalars, an empty child list for model fields.
    pub(crate) fn for_data(schema: Arc<Schema>, type_name: &str) -> Result<Self, QueryError> {
        let type_def = schema
            .type_def(type_name)
            .ok_or_else(|| QueryError::UnknownType(type_name.to_string()))?;
        let fields = type_def
            .fields()
            .iter()
            .map(|f| {
                let slot = if schema.is_model_type(&f.field_type) {
                    Slot::Models(Vec::new())
                } else {
                    Slot::Scalar(Value::Null)
                };
                (f.name.clone(), slot)
            })
            .collect();
        Ok(Shape {
            schema,
            type_name: type_name.to_string(),
            mode: Mode::Data,
            fields,
        })
    }

    /// The registered type this shape conforms to.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Access one declared field.
    ///
    /// In query mode this records the field (once — repeat accesses are
    /// idempotent) and, for model-typed fields, lazily creates the single child
    /// query shape. In data mode it returns the stored value and never touches
    /// a request tree. Accessing an undeclared field is an error in both modes.
    pub fn access(&mut self, field: &str) -> Result<FieldValue<'_>, QueryError> {
        let field_def = self
            .schema
            .type_def(&self.type_name)
            .and_then(|t| t.field(field))
            .ok_or_else(|| QueryError::UnknownField {
                type_name: self.type_name.clone(),
                field: field.to_string(),
            })?;
        let name = field_def.name.clone();
        let declared = field_def.field_type.clone();
        let is_model = self.schema.is_model_type(&declared);

        let mode = self.mode;
        let schema = self.schema.clone();
        let slot = self.fields.entry(name).or_insert_with(|| match (mode, is_model) {
            (Mode::Query, true) => Slot::Models(vec![Shape {
                schema,
                type_name: declared,
                mode: Mode::Query,
                fields: IndexMap::new(),
            }]),
            // Declared but unfetched model field read in data mode.
            (Mode::Data, true) => Slot::Models(Vec::new()),
            // Query-mode placeholder, or a declared but unfetched scalar.
            (_, false) => Slot::Scalar(Value::Null),
        });

        Ok(match slot {
            Slot::Scalar(value) => FieldValue::Scalar(value),
            Slot::Models(shapes) => FieldValue::Models(shapes),
        })
    }

    /// Access a scalar field, failing if the field is model-typed.
    pub fn scalar(&mut self, field: &str) -> Result<&Value, QueryError> {
        let type_name = self.type_name.clone();
        match self.access(field)? {
            FieldValue::Scalar(value) => Ok(value),
            FieldValue::Models(_) => Err(QueryError::ScalarAccessOnModel {
                type_name,
                field: field.to_string(),
            }),
        }
    }

    /// Access a model-typed field's children, failing if the field is a scalar.
    pub fn models(&mut self, field: &str) -> Result<&mut Vec<Shape>, QueryError> {
        let type_name = self.type_name.clone();
        match self.access(field)? {
            FieldValue::Models(shapes) => Ok(shapes),
            FieldValue::Scalar(_) => Err(QueryError::ModelAccessOnScalar {
                type_name,
                field: field.to_string(),
            }),
        }
    }

    /// Overwrite one scalar slot. Hydration only.
    pub(crate) fn insert_scalar(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), Slot::Scalar(value));
    }

    /// Overwrite one model slot. Hydration only.
    pub(crate) fn insert_models(&mut self, name: &str, shapes: Vec<Shape>) {
        self.fields.insert(name.to_string(), Slot::Models(shapes));
    }
}
