//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use octocrab::Octocrab;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Create an octocrab client pointed at a mock server.
pub async fn mock_client(server: &MockServer) -> Octocrab {
    Octocrab::builder()
        .base_uri(server.uri())
        .expect("Failed to set base URI")
        .build()
        .expect("Failed to build octocrab")
}

/// GraphQL body for the latest-tags query, newest tag first.
pub fn tags_response(names: &[&str]) -> Value {
    let nodes: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| json!({ "name": name, "target": { "oid": format!("oid{}", i) } }))
        .collect();
    json!({ "data": { "repository": { "refs": { "nodes": nodes } } } })
}

/// GraphQL body for the single-tag query; `None` when the ref does not exist.
pub fn single_tag_response(name: Option<&str>) -> Value {
    let tag_ref = name.map(|n| json!({ "name": n, "target": { "oid": "abc123" } }));
    json!({ "data": { "repository": { "ref": tag_ref } } })
}

/// Compare API body with `messages` as the commits on this page.
pub fn compare_response(total: usize, messages: &[&str]) -> Value {
    let commits: Vec<Value> = messages
        .iter()
        .enumerate()
        .map(|(i, message)| {
            json!({
                "sha": format!("{:040x}", i + 1),
                "commit": { "message": message },
            })
        })
        .collect();
    json!({ "total_commits": total, "commits": commits })
}
