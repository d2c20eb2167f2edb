//! Schema compilation and the type registry.
//!
//! [`Schema::parse`] turns declaration text into an immutable, declaration-ordered
//! set of [`TypeDef`]s. The registry it produces is the single source of truth the
//! shape builder, query compiler and hydrator consult to decide whether a field is
//! a leaf (scalar) or needs a sub-selection (model type).

use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

use crate::error::SchemaError;

/// A single field of a [`TypeDef`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name, decapitalized regardless of source casing.
    pub name: String,

    /// Declared type name after scalar conversion: either a scalar name or the
    /// name of a registered [`TypeDef`].
    pub field_type: String,

    /// Whether the field was declared as `[Type]`.
    pub is_array: bool,

    /// Whether the field was declared with a trailing `!`.
    pub required: bool,
}

/// A compiled type or interface declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Unique type name.
    pub name: String,

    fields: Vec<FieldDef>,
}

impl TypeDef {
    /// Fields in storage order: required fields first, then optional ones,
    /// each group keeping its relative declaration order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Look up a field by its (decapitalized) name.
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// The compiled schema: an immutable name → [`TypeDef`] registry.
///
/// Built once from the declaration text and never mutated afterward, so it can
/// be shared across concurrent sessions behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Schema {
    types: Vec<TypeDef>,
    index: HashMap<String, usize>,
}

impl Schema {
    /// Compile declaration text into a registry.
    ///
    /// One declaration per brace-delimited block; blocks whose trimmed text does
    /// not start with `type ` or `interface ` are ignored. Field arguments,
    /// `@decorator` annotations and `implements`/`extends` clauses are stripped.
    /// Forward references are allowed anywhere: declared type names are not
    /// resolved per-field, only once the whole text has been read.
    pub fn parse(text: &str) -> Result<Self, SchemaError> {
        let mut types = Vec::new();
        for block in text.split('}') {
            let block = block.trim();
            let keyword_len = if block.starts_with("type ") {
                5
            } else if block.starts_with("interface ") {
                10
            } else {
                continue;
            };
            types.push(parse_block(&block[keyword_len..])?);
        }

        let index = types
            .iter()
            .enumerate()
            .map(|(i, t)| (t.name.clone(), i))
            .collect();

        tracing::debug!(types = types.len(), "compiled schema");
        Ok(Schema { types, index })
    }

    /// True iff `name` is a registered type; false means scalar.
    pub fn is_model_type(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Look up a registered type.
    pub fn type_def(&self, name: &str) -> Option<&TypeDef> {
        self.index.get(name).map(|&i| &self.types[i])
    }

    /// All registered types, in declaration order.
    ///
    /// Artifact generators depend on this order being deterministic.
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter()
    }
}

/// Parse one recognized block, with the leading keyword already removed.
fn parse_block(block: &str) -> Result<TypeDef, SchemaError> {
    let stripped = strip_arguments(block);

    let mut lines = stripped.lines().filter_map(|line| {
        // Decorators and implements/extends clauses run to the end of the line.
        let line = line.split('@').next().unwrap_or("");
        let line = line.split("implements").next().unwrap_or("");
        let line = line.split("extends").next().unwrap_or("");
        let line: String = line
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '{')
            .collect();
        (!line.is_empty()).then_some(line)
    });

    let type_name = lines.next().unwrap_or_default();

    let mut fields = Vec::new();
    for line in lines {
        fields.push(parse_field(&type_name, &line)?);
    }

    // Stable reorder: required fields precede optional ones. This only affects
    // positional-constructor ergonomics in generated artifacts, not semantics.
    fields.sort_by_key(|f| !f.required);

    Ok(TypeDef {
        name: type_name,
        fields,
    })
}

/// Parse one `name:rawType` field line.
fn parse_field(type_name: &str, line: &str) -> Result<FieldDef, SchemaError> {
    if line.matches(':').count() != 1 {
        return Err(SchemaError::FieldSyntax {
            type_name: type_name.to_string(),
            line: line.to_string(),
        });
    }
    let (name, raw) = line
        .split_once(':')
        .unwrap_or((line, ""));

    let required = raw.ends_with('!');
    let is_array = raw.starts_with('[');
    // `!` may also appear inside the brackets, as in `[Person!]`.
    let inner: String = raw
        .chars()
        .filter(|c| !matches!(c, '!' | '[' | ']'))
        .collect();

    Ok(FieldDef {
        name: decapitalize(name),
        field_type: convert_scalar(&inner).to_string(),
        is_array,
        required,
    })
}

/// Remove parenthesized argument lists, which may span lines.
fn strip_arguments(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut depth = 0usize;
    for c in block.chars() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Fixed scalar conversion table.
///
/// `Long` maps to the integer-like `Int`; `ID` deliberately passes through as
/// an opaque identifier scalar. Unmapped names pass through unchanged.
fn convert_scalar(name: &str) -> &str {
    match name {
        "Long" => "Int",
        other => other,
    }
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
