//! The type contract for the API surface.
//!
//! Binds a parsed document plus the request's variables to typed operations,
//! rejecting anything the shipped schema (`schema.graphql`) does not
//! declare. The resolver layer never observes a malformed request.

use actix_web::HttpResponse;
use serde_json::{Map, Value as Json};

use crate::document::{Document, Field, OperationKind, Value, VariableDef};
use crate::error::ContractError;
use crate::icon::IconInput;

pub const SCHEMA_SDL: &str = include_str!("schema.graphql");

/// A top-level field bound to its typed arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundOperation {
    GetIcon { id: String },
    ListIcons,
    CreateIcon { input: IconInput },
}

/// Bind every top-level field of the document against the schema. The
/// returned pairs keep document order, which becomes response-key order.
pub fn bind(
    document: &Document,
    variables: &Map<String, Json>,
) -> Result<Vec<(String, BoundOperation)>, ContractError> {
    let operation = &document.operation;
    let mut bound = Vec::with_capacity(operation.fields.len());
    for field in &operation.fields {
        let op = bind_field(operation.kind, field, &operation.variables, variables)?;
        bound.push((field.name.clone(), op));
    }
    Ok(bound)
}

fn bind_field(
    kind: OperationKind,
    field: &Field,
    var_defs: &[VariableDef],
    variables: &Map<String, Json>,
) -> Result<BoundOperation, ContractError> {
    match (kind, field.name.as_str()) {
        (OperationKind::Query, "getIcon") => {
            let mut id = None;
            for (name, value) in &field.arguments {
                match name.as_str() {
                    "id" => id = Some(resolve_value(value, var_defs, variables)?),
                    other => {
                        return Err(ContractError::UnknownArgument {
                            argument: other.to_string(),
                            field: "getIcon",
                        });
                    }
                }
            }
            match id {
                Some(Json::String(s)) => Ok(BoundOperation::GetIcon { id: s }),
                // GraphQL ID coercion accepts integers as their decimal form.
                Some(Json::Number(n)) if n.is_i64() || n.is_u64() => {
                    Ok(BoundOperation::GetIcon { id: n.to_string() })
                }
                Some(Json::Null) | None => Err(ContractError::MissingArgument {
                    field: "getIcon",
                    argument: "id",
                    ty: "ID!",
                }),
                Some(other) => Err(ContractError::InvalidValue {
                    argument: "id",
                    reason: format!("ID cannot represent {other}"),
                }),
            }
        }
        (OperationKind::Query, "listIcons") => {
            if let Some((name, _)) = field.arguments.first() {
                return Err(ContractError::UnknownArgument {
                    argument: name.clone(),
                    field: "listIcons",
                });
            }
            Ok(BoundOperation::ListIcons)
        }
        (OperationKind::Mutation, "createIcon") => {
            let mut input = None;
            for (name, value) in &field.arguments {
                match name.as_str() {
                    "input" => input = Some(resolve_value(value, var_defs, variables)?),
                    other => {
                        return Err(ContractError::UnknownArgument {
                            argument: other.to_string(),
                            field: "createIcon",
                        });
                    }
                }
            }
            let json = match input {
                Some(Json::Null) | None => {
                    return Err(ContractError::MissingArgument {
                        field: "createIcon",
                        argument: "input",
                        ty: "IconInput!",
                    });
                }
                Some(json) => json,
            };
            let input =
                serde_json::from_value::<IconInput>(json).map_err(|e| ContractError::InvalidValue {
                    argument: "input",
                    reason: e.to_string(),
                })?;
            Ok(BoundOperation::CreateIcon { input })
        }
        (kind, _) => Err(ContractError::UnknownField {
            field: field.name.clone(),
            parent: kind.parent_type(),
        }),
    }
}

/// Convert a document value into JSON, resolving `$variable` references
/// against the request envelope and falling back to definition defaults.
fn resolve_value(
    value: &Value,
    var_defs: &[VariableDef],
    variables: &Map<String, Json>,
) -> Result<Json, ContractError> {
    Ok(match value {
        Value::Null => Json::Null,
        Value::Int(i) => Json::from(*i),
        Value::Float(f) => Json::from(*f),
        Value::String(s) => Json::String(s.clone()),
        Value::Boolean(b) => Json::Bool(*b),
        // Enum values travel as their name; serde checks membership.
        Value::Enum(name) => Json::String(name.clone()),
        Value::Variable(name) => {
            if let Some(json) = variables.get(name) {
                json.clone()
            } else if let Some(def) = var_defs.iter().find(|d| d.name == *name) {
                match &def.default {
                    Some(default) => resolve_value(default, var_defs, variables)?,
                    None => {
                        return Err(ContractError::MissingVariable {
                            name: name.clone(),
                            ty: def.ty.clone(),
                        });
                    }
                }
            } else {
                return Err(ContractError::UndefinedVariable { name: name.clone() });
            }
        }
        Value::List(items) => Json::Array(
            items
                .iter()
                .map(|v| resolve_value(v, var_defs, variables))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(fields) => {
            let mut map = Map::with_capacity(fields.len());
            for (name, v) in fields {
                map.insert(name.clone(), resolve_value(v, var_defs, variables)?);
            }
            Json::Object(map)
        }
    })
}

pub(crate) async fn get() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(mime::TEXT_PLAIN_UTF_8)
        .body(SCHEMA_SDL)
}
