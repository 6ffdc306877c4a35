//! Shared test documents.

use crate::document::OpenApiDocument;
use serde_json::{json, Value};

/// Two operations, one tag each.
pub fn users_and_orders_raw() -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {"title": "Shop", "version": "1.0.0"},
        "paths": {
            "/users": {
                "get": {"tags": ["user"], "summary": "List users"}
            },
            "/orders": {
                "post": {"tags": ["order"], "summary": "Create order"}
            }
        }
    })
}

pub fn users_and_orders() -> OpenApiDocument {
    OpenApiDocument::from_value(&users_and_orders_raw()).unwrap()
}

/// Tagged, multi-tagged and untagged operations plus local references.
pub fn petstore_raw() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {"title": "Petstore", "version": "1.0.0"},
        "tags": [
            {"name": "pet", "description": "Everything about your pets"},
            {"name": "store", "description": "Access to orders"}
        ],
        "paths": {
            "/pets": {
                "get": {
                    "tags": ["pet"],
                    "summary": "List pets",
                    "description": "Returns all pets",
                    "parameters": [{"$ref": "#/components/parameters/Limit"}],
                    "responses": {
                        "200": {
                            "description": "ok",
                            "content": {"application/json": {"schema": {
                                "type": "array",
                                "items": {"$ref": "#/components/schemas/Pet"}
                            }}}
                        }
                    }
                },
                "post": {
                    "tags": ["pet"],
                    "summary": "Create a pet",
                    "requestBody": {"$ref": "#/components/requestBodies/PetBody"},
                    "responses": {"201": {"description": "created"}}
                }
            },
            "/pets/{petId}": {
                "get": {
                    "tags": ["pet", "store"],
                    "summary": "Find pet by ID",
                    "parameters": [{
                        "name": "petId",
                        "in": "path",
                        "required": true,
                        "schema": {"type": "string"}
                    }],
                    "responses": {
                        "200": {"$ref": "#/components/responses/PetResponse"},
                        "404": {"description": "not found"}
                    }
                }
            },
            "/store/orders": {
                "post": {
                    "tags": ["store"],
                    "summary": "Place an order",
                    "description": "Place an order for a pet",
                    "responses": {"200": {"description": "ok"}}
                }
            },
            "/health": {
                "get": {"summary": "Health check", "responses": {"200": {"description": "ok"}}}
            },
            "/shared": {"$ref": "#/components/pathItems/Shared"}
        },
        "components": {
            "parameters": {
                "Limit": {"name": "limit", "in": "query", "schema": {"type": "integer"}}
            },
            "schemas": {
                "Pet": {
                    "type": "object",
                    "required": ["id", "name"],
                    "properties": {
                        "id": {"type": "integer"},
                        "name": {"type": "string"},
                        "category": {"$ref": "#/components/schemas/Category"}
                    }
                },
                "Category": {"type": "object", "properties": {"name": {"type": "string"}}}
            },
            "requestBodies": {
                "PetBody": {
                    "required": true,
                    "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
                }
            },
            "responses": {
                "PetResponse": {
                    "description": "A pet",
                    "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
                }
            },
            "pathItems": {
                "Shared": {"get": {"tags": ["misc"], "summary": "Shared operation"}}
            }
        }
    })
}

pub fn petstore_resolved() -> OpenApiDocument {
    OpenApiDocument::from_value(&petstore_raw()).unwrap()
}
