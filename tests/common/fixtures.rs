use serde_json::{Value, json};

/// The classic bookstore document.
pub fn store() -> Value {
    json!({
        "store": {
            "book": [
                {
                    "category": "reference",
                    "author": "Nigel Rees",
                    "title": "Sayings of the Century",
                    "price": 8.95
                },
                {
                    "category": "fiction",
                    "author": "Evelyn Waugh",
                    "title": "Sword of Honour",
                    "price": 12.99
                },
                {
                    "category": "fiction",
                    "author": "Herman Melville",
                    "title": "Moby Dick",
                    "isbn": "0-553-21311-3",
                    "price": 8.99
                },
                {
                    "category": "fiction",
                    "author": "J. R. R. Tolkien",
                    "title": "The Lord of the Rings",
                    "isbn": "0-395-19395-8",
                    "price": 22.99
                }
            ],
            "bicycle": {
                "color": "red",
                "price": 19.95
            }
        },
        "expensive": 10
    })
}

/// A small API description with keys that need bracket notation.
pub fn petstore() -> Value {
    json!({
        "openapi": "3.0.0",
        "paths": {
            "/pets": {
                "get": { "operationId": "listPets", "tags": ["pets"] },
                "post": { "operationId": "createPets", "tags": ["pets"] }
            },
            "/pets/{petId}": {
                "get": { "operationId": "showPetById", "tags": ["pets"] }
            }
        }
    })
}

/// Counts a value and all of its descendants.
pub fn count_nodes(value: &Value) -> usize {
    1 + match value {
        Value::Array(items) => items.iter().map(count_nodes).sum(),
        Value::Object(map) => map.values().map(count_nodes).sum(),
        _ => 0,
    }
}
