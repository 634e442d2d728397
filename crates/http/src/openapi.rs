//! OpenAPI document assembled from module fragments

use bookshelf_kernel::ModuleRegistry;
use serde_json::{json, Value};

/// Path a module route is reachable at once nested under `/{module_name}`.
pub fn mounted_path(module_name: &str, path: &str) -> String {
    if path == "/" {
        format!("/{}", module_name)
    } else {
        format!("/{}{}", module_name, path)
    }
}

/// Build the merged OpenAPI document for every registered module
pub fn document(registry: &ModuleRegistry) -> Value {
    let mut openapi_spec = json!({
        "openapi": "3.1.0",
        "info": {
            "title": "Bookshelf API",
            "version": "1.0.0",
            "description": "In-memory bookshelf catalog"
        },
        "paths": {},
        "components": {
            "schemas": {}
        }
    });

    // Shared failure envelope
    openapi_spec["components"]["schemas"]["ErrorResponse"] = json!({
        "type": "object",
        "properties": {
            "status": {
                "type": "string",
                "enum": ["fail", "error"]
            },
            "message": {
                "type": "string"
            }
        },
        "required": ["status", "message"]
    });

    openapi_spec["paths"]["/healthz"] = json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "OK",
                    "content": {
                        "text/plain": {
                            "schema": {
                                "type": "string"
                            }
                        }
                    }
                }
            }
        }
    });

    for module in registry.modules() {
        let Some(module_spec) = module.openapi() else {
            continue;
        };

        if let Some(paths_obj) = module_spec.get("paths").and_then(Value::as_object) {
            for (path, path_item) in paths_obj {
                openapi_spec["paths"][mounted_path(module.name(), path)] = path_item.clone();
            }
        }

        if let Some(schemas_obj) = module_spec
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(Value::as_object)
        {
            for (schema_name, schema_def) in schemas_obj {
                openapi_spec["components"]["schemas"][schema_name] = schema_def.clone();
            }
        }
    }

    openapi_spec
}

/// Convert the merged JSON into a utoipa document for Swagger UI
pub fn to_utoipa(spec: &Value) -> utoipa::openapi::OpenApi {
    serde_json::from_value(spec.clone()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "merged OpenAPI document rejected; serving empty document");
        utoipa::openapi::OpenApiBuilder::new()
            .info(
                utoipa::openapi::InfoBuilder::new()
                    .title("Bookshelf API")
                    .version("1.0.0")
                    .build(),
            )
            .build()
    })
}
