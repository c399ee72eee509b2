//! The `/graphql` endpoint: request/response envelopes and the handler that
//! runs parse → bind → resolve → shape.

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::error::{ContractError, DocumentError, IcondError};
use crate::metrics::Metrics;
use crate::schema::{self, BoundOperation};
use crate::store::IconStore;
use crate::{ServerResult, document, resolver};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<Json>,
    #[serde(
        default,
        rename = "operationName",
        skip_serializing_if = "Option::is_none"
    )]
    pub operation_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Json>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ApiError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl ApiError {
    fn other(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: Vec::new(),
        }
    }

    fn from_document_error(err: &DocumentError) -> Self {
        Self {
            message: format!("Syntax error: {}", err.message),
            locations: vec![Location {
                line: err.line,
                column: err.column,
            }],
        }
    }

    fn from_contract_error(err: &ContractError) -> Self {
        Self {
            message: err.to_string(),
            locations: Vec::new(),
        }
    }
}

/// What became of a well-formed JSON envelope. Request-shape problems are
/// data (`Rejected`), not faults; only internal errors propagate as `Err`.
pub(crate) enum Outcome {
    Data {
        data: Json,
        operations: Vec<&'static str>,
    },
    Rejected(Vec<ApiError>),
}

pub(crate) fn execute(request: &ApiRequest, store: &IconStore) -> Result<Outcome, IcondError> {
    let variables = match &request.variables {
        None | Some(Json::Null) => Map::new(),
        Some(Json::Object(map)) => map.clone(),
        Some(_) => {
            return Ok(Outcome::Rejected(vec![ApiError::other(
                "\"variables\" must be an object",
            )]));
        }
    };

    let document = match document::parse(&request.query) {
        Ok(document) => document,
        Err(e) => return Ok(Outcome::Rejected(vec![ApiError::from_document_error(&e)])),
    };

    // Single-operation documents make operationName advisory, but a name
    // that matches nothing is still a request-shape error.
    if let Some(requested) = &request.operation_name {
        if document.operation.name.as_deref() != Some(requested.as_str()) {
            return Ok(Outcome::Rejected(vec![ApiError::from_contract_error(
                &ContractError::UnknownOperation {
                    name: requested.clone(),
                },
            )]));
        }
    }

    let bound = match schema::bind(&document, &variables) {
        Ok(bound) => bound,
        Err(e) => return Ok(Outcome::Rejected(vec![ApiError::from_contract_error(&e)])),
    };

    let mut data = Map::with_capacity(bound.len());
    let mut operations = Vec::with_capacity(bound.len());
    for (key, op) in bound {
        let value = match op {
            BoundOperation::GetIcon { id } => {
                operations.push("getIcon");
                serde_json::to_value(resolver::get_icon(store, &id)?)?
            }
            BoundOperation::ListIcons => {
                operations.push("listIcons");
                serde_json::to_value(resolver::list_icons(store)?)?
            }
            BoundOperation::CreateIcon { input } => {
                operations.push("createIcon");
                serde_json::to_value(resolver::create_icon(store, input)?)?
            }
        };
        data.insert(key, value);
    }
    Ok(Outcome::Data {
        data: Json::Object(data),
        operations,
    })
}

pub(crate) async fn post(
    body: web::Bytes,
    store: web::Data<IconStore>,
    metrics: web::Data<Metrics>,
) -> ServerResult {
    let request: ApiRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            metrics.record("request", "rejected");
            return Ok(bad_request(vec![ApiError::other(format!(
                "Invalid request body: {e}"
            ))]));
        }
    };

    match execute(&request, &store)? {
        Outcome::Data { data, operations } => {
            let creates = operations.iter().filter(|op| **op == "createIcon").count();
            for op in &operations {
                metrics.record(op, "ok");
            }
            if creates > 0 {
                let len = store.len().map_err(IcondError::from)?;
                metrics.icons_created(creates as u64, len);
            }
            Ok(HttpResponse::Ok().json(ApiResponse {
                data: Some(data),
                errors: Vec::new(),
            }))
        }
        Outcome::Rejected(errors) => {
            metrics.record("request", "rejected");
            Ok(bad_request(errors))
        }
    }
}

fn bad_request(errors: Vec<ApiError>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse { data: None, errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(query: &str) -> ApiRequest {
        ApiRequest {
            query: query.to_string(),
            variables: None,
            operation_name: None,
        }
    }

    fn data_of(outcome: Outcome) -> Json {
        match outcome {
            Outcome::Data { data, .. } => data,
            Outcome::Rejected(errors) => panic!("request rejected: {errors:?}"),
        }
    }

    fn errors_of(outcome: Outcome) -> Vec<ApiError> {
        match outcome {
            Outcome::Rejected(errors) => errors,
            Outcome::Data { data, .. } => panic!("expected rejection, got data: {data}"),
        }
    }

    #[test]
    fn test_scenario_create_fetch_miss_list() {
        let store = IconStore::new();

        let created = data_of(
            execute(
                &request(r#"mutation { createIcon(input: {name: "home"}) { id } }"#),
                &store,
            )
            .unwrap(),
        );
        let icon = &created["createIcon"];
        let id = icon["id"].as_str().unwrap().to_string();
        assert!(!id.is_empty());
        assert_eq!(
            *icon,
            json!({
                "id": id,
                "name": "home",
                "defaultFontSize": 0,
                "color": "",
                "svgAvailable": false,
                "sizesAvailable": [],
            })
        );

        let fetched = data_of(
            execute(&request(&format!("{{ getIcon(id: \"{id}\") {{ id }} }}")), &store).unwrap(),
        );
        assert_eq!(fetched["getIcon"], *icon);

        let missed = data_of(
            execute(&request(r#"{ getIcon(id: "nonexistent") { id } }"#), &store).unwrap(),
        );
        assert_eq!(missed["getIcon"], Json::Null);

        data_of(
            execute(
                &request(r#"mutation { createIcon(input: {name: "star", color: "red"}) { id } }"#),
                &store,
            )
            .unwrap(),
        );
        let listed = data_of(execute(&request("{ listIcons { id name } }"), &store).unwrap());
        let icons = listed["listIcons"].as_array().unwrap();
        assert_eq!(icons.len(), 2);
        assert_eq!(icons[0]["name"], "home");
        assert_eq!(icons[1]["name"], "star");
        assert_eq!(icons[1]["color"], "red");
    }

    #[test]
    fn test_create_via_variables() {
        let store = IconStore::new();
        let outcome = execute(
            &ApiRequest {
                query: "mutation Create($input: IconInput!) { createIcon(input: $input) { id } }"
                    .to_string(),
                variables: Some(json!({"input": {"name": "bell", "defaultFontSize": 24}})),
                operation_name: Some("Create".to_string()),
            },
            &store,
        )
        .unwrap();
        let data = data_of(outcome);
        assert_eq!(data["createIcon"]["name"], "bell");
        assert_eq!(data["createIcon"]["defaultFontSize"], 24);
    }

    #[test]
    fn test_syntax_error_is_rejected_with_location() {
        let store = IconStore::new();
        let errors = errors_of(execute(&request("{ getIcon(id: ) }"), &store).unwrap());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.starts_with("Syntax error"));
        assert_eq!(errors[0].locations[0].line, 1);
    }

    #[test]
    fn test_contract_error_is_rejected() {
        let store = IconStore::new();
        let errors = errors_of(
            execute(&request(r#"{ createIcon(input: {name: "x"}) { id } }"#), &store).unwrap(),
        );
        assert!(errors[0].message.contains("Cannot query field"));
    }

    #[test]
    fn test_operation_name_mismatch_is_rejected() {
        let store = IconStore::new();
        let errors = errors_of(
            execute(
                &ApiRequest {
                    query: "query Fetch { listIcons { id } }".to_string(),
                    variables: None,
                    operation_name: Some("Other".to_string()),
                },
                &store,
            )
            .unwrap(),
        );
        assert!(errors[0].message.contains("Unknown operation"));
    }

    #[test]
    fn test_variables_must_be_an_object() {
        let store = IconStore::new();
        let errors = errors_of(
            execute(
                &ApiRequest {
                    query: "{ listIcons { id } }".to_string(),
                    variables: Some(json!([1, 2])),
                    operation_name: None,
                },
                &store,
            )
            .unwrap(),
        );
        assert!(errors[0].message.contains("must be an object"));
    }

    #[test]
    fn test_rejected_request_leaves_store_untouched() {
        let store = IconStore::new();
        errors_of(
            execute(
                &request(r#"mutation { createIcon(input: {name: "x", bogus: 1}) { id } }"#),
                &store,
            )
            .unwrap(),
        );
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn test_multiple_fields_in_one_query() {
        let store = IconStore::new();
        data_of(
            execute(
                &request(r#"mutation { createIcon(input: {name: "a"}) { id } }"#),
                &store,
            )
            .unwrap(),
        );
        let data = data_of(
            execute(
                &request(r#"{ listIcons { id } getIcon(id: "none") { id } }"#),
                &store,
            )
            .unwrap(),
        );
        assert_eq!(data["listIcons"].as_array().unwrap().len(), 1);
        assert_eq!(data["getIcon"], Json::Null);
    }

    #[test]
    fn test_response_envelope_serialization() {
        let response = ApiResponse {
            data: Some(json!({"getIcon": null})),
            errors: Vec::new(),
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"data": {"getIcon": null}})
        );

        let rejected = ApiResponse {
            data: None,
            errors: vec![ApiError {
                message: "Syntax error: boom".to_string(),
                locations: vec![Location { line: 1, column: 3 }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&rejected).unwrap(),
            json!({"errors": [{"message": "Syntax error: boom", "locations": [{"line": 1, "column": 3}]}]})
        );
    }
}
