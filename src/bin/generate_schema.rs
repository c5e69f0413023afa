//! Schema generator for the `/generate` wire contract.
//!
//! This binary writes `wire_schema.json` describing the request and
//! response bodies the client exchanges with the SQL generation service,
//! so the server side can be checked against the same contract.

use schemars::{JsonSchema, schema_for};
use serde_json::{Value, json};
use sqlgen_client::config::GENERATE_PATH;
use sqlgen_client::models::{GenerateRequest, GenerateResponse};
use std::fs;

const OUTPUT_FILE: &str = "wire_schema.json";

// One HTTP operation with its body schemas
struct Endpoint {
    method: &'static str,
    path: &'static str,
    description: &'static str,
    request_schema: Value,
    response_schema: Value,
}

fn main() {
    let endpoints = vec![Endpoint {
        method: "POST",
        path: GENERATE_PATH,
        description: "Translate a natural-language question into SQL against the supplied database schema. The response carries generated_sql when success is true and error otherwise.",
        request_schema: generate_schema::<GenerateRequest>(),
        response_schema: generate_schema::<GenerateResponse>(),
    }];

    write_schema(&endpoints);
    println!("Generated {OUTPUT_FILE} with {} endpoint(s)", endpoints.len());
}

// Generates a JSON schema for the given type, without the draft marker
fn generate_schema<T: JsonSchema>() -> Value {
    let mut schema = serde_json::to_value(schema_for!(T)).unwrap_or_else(|e| {
        eprintln!("Failed to serialize schema: {e}");
        std::process::exit(1);
    });

    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
    }

    schema
}

fn write_schema(endpoints: &[Endpoint]) {
    let schemas: Vec<Value> = endpoints
        .iter()
        .map(|endpoint| {
            json!({
                "method": endpoint.method,
                "path": endpoint.path,
                "contentType": "application/json",
                "description": endpoint.description,
                "requestSchema": endpoint.request_schema,
                "responseSchema": endpoint.response_schema
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&schemas).unwrap_or_else(|e| {
        eprintln!("Failed to serialize schema: {e}");
        std::process::exit(1);
    });

    fs::write(OUTPUT_FILE, json).unwrap_or_else(|e| {
        eprintln!("Failed to write {OUTPUT_FILE}: {e}");
        std::process::exit(1);
    });
}
