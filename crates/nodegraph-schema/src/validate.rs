//! Structural validation producing located issues.
//!
//! Checks types, required fields, enum membership, and the comment-anchor
//! invariant. Cross-document referential integrity (an edge's `nodeId`
//! existing among `nodes`, id uniqueness) is not checked here.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::graph::{GraphDocument, GraphEnvironment, SUPPORTED_SCHEMA_VERSIONS};
use crate::project::ProjectDocument;

/// A single validation failure, located by a dotted path into the
/// candidate document (e.g. `nodes.2.position.x`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub path: String,
    pub message: String,
}

/// Validate a candidate graph document.
///
/// On success returns the typed document with defaults applied (missing
/// `nodes`/`edges`/`comments` become empty) and unknown top-level fields
/// preserved. The input is never mutated.
pub fn validate_graph(candidate: &Value) -> Result<GraphDocument, Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    check_graph(candidate, "", &mut issues);
    if !issues.is_empty() {
        return Err(issues);
    }
    serde_json::from_value(candidate.clone()).map_err(|err| {
        vec![ValidationIssue {
            path: String::new(),
            message: err.to_string(),
        }]
    })
}

/// Validate a candidate project document (manifest plus graph/struct maps).
pub fn validate_project(candidate: &Value) -> Result<ProjectDocument, Vec<ValidationIssue>> {
    let mut issues = Vec::new();
    check_project(candidate, &mut issues);
    if !issues.is_empty() {
        return Err(issues);
    }
    serde_json::from_value(candidate.clone()).map_err(|err| {
        vec![ValidationIssue {
            path: String::new(),
            message: err.to_string(),
        }]
    })
}

fn check_graph(value: &Value, prefix: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        push(issues, prefix, "Expected an object");
        return;
    };

    match obj.get("schemaVersion").and_then(Value::as_i64) {
        Some(version) if SUPPORTED_SCHEMA_VERSIONS.contains(&version) => {}
        _ => push(
            issues,
            &join(prefix, "schemaVersion"),
            "Expected schema version 1 or 2",
        ),
    }
    require_string(obj, "name", prefix, issues);
    optional_string(obj, "createdAt", prefix, issues);
    optional_string(obj, "updatedAt", prefix, issues);

    if let Some(nodes) = obj.get("nodes") {
        check_each(nodes, &join(prefix, "nodes"), issues, check_node);
    }
    if let Some(edges) = obj.get("edges") {
        check_each(edges, &join(prefix, "edges"), issues, check_edge);
    }
    if let Some(comments) = obj.get("comments") {
        check_each(comments, &join(prefix, "comments"), issues, check_comment);
    }

    if let Some(env) = obj.get("environment") {
        let path = join(prefix, "environment");
        match env.as_str() {
            Some(s) if GraphEnvironment::parse(s).is_some() => {}
            Some(s) => push(issues, &path, format!("Unknown environment: {s}")),
            None => push(issues, &path, "Expected a string"),
        }
    }
    if let Some(interval) = obj.get("executionIntervalSeconds") {
        if !interval.is_number() {
            push(
                issues,
                &join(prefix, "executionIntervalSeconds"),
                "Expected a number",
            );
        }
    }
}

fn check_node(value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        push(issues, path, "Expected an object");
        return;
    };
    require_string(obj, "id", path, issues);
    require_string(obj, "type", path, issues);
    check_position(obj.get("position"), &join(path, "position"), issues);
    optional_string(obj, "label", path, issues);

    if let Some(data) = obj.get("data") {
        let data_path = join(path, "data");
        let Some(data_obj) = data.as_object() else {
            push(issues, &data_path, "Expected an object");
            return;
        };
        optional_object(data_obj, "overrides", &data_path, issues);
        optional_object(data_obj, "controls", &data_path, issues);
        if let Some(count) = data_obj.get("sequenceFlowOutCount") {
            if count.as_i64().is_none() {
                push(
                    issues,
                    &join(&data_path, "sequenceFlowOutCount"),
                    "Expected an integer",
                );
            }
        }
        if let Some(labels) = data_obj.get("branchFlowOutLabels") {
            let labels_path = join(&data_path, "branchFlowOutLabels");
            match labels.as_array() {
                None => push(issues, &labels_path, "Expected an array"),
                Some(items) => {
                    for (i, item) in items.iter().enumerate() {
                        if !item.is_string() {
                            push(issues, &format!("{labels_path}.{i}"), "Expected a string");
                        }
                    }
                }
            }
        }
    }
}

fn check_edge(value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        push(issues, path, "Expected an object");
        return;
    };
    require_string(obj, "id", path, issues);
    for end in ["source", "target"] {
        let end_path = join(path, end);
        match obj.get(end).and_then(Value::as_object) {
            None => push(issues, &end_path, "Expected an object"),
            Some(end_obj) => {
                require_string(end_obj, "nodeId", &end_path, issues);
                match end_obj.get("portId").and_then(Value::as_str) {
                    Some(port) if !port.is_empty() => {}
                    Some(_) => push(
                        issues,
                        &join(&end_path, "portId"),
                        "Expected a non-empty string",
                    ),
                    None => push(issues, &join(&end_path, "portId"), "Expected a string"),
                }
            }
        }
    }
}

fn check_comment(value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        push(issues, path, "Expected an object");
        return;
    };
    let before = issues.len();

    optional_string(obj, "id", path, issues);
    optional_string(obj, "text", path, issues);
    if let Some(node_id) = obj.get("nodeId") {
        match node_id.as_str() {
            Some(s) if !s.is_empty() => {}
            Some(_) => push(issues, &join(path, "nodeId"), "Expected a non-empty string"),
            None => push(issues, &join(path, "nodeId"), "Expected a string"),
        }
    }
    if obj.contains_key("position") {
        check_position(obj.get("position"), &join(path, "position"), issues);
    }
    optional_bool(obj, "pinned", path, issues);
    optional_bool(obj, "collapsed", path, issues);

    // The anchor invariant only applies to structurally sound comments.
    if issues.len() > before {
        return;
    }
    let anchored = obj
        .get("nodeId")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.trim().is_empty())
        || obj.contains_key("position");
    if !anchored {
        push(issues, path, "Comment requires nodeId or position.");
    }
}

fn check_position(value: Option<&Value>, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.and_then(Value::as_object) else {
        push(issues, path, "Expected an object");
        return;
    };
    for key in ["x", "y"] {
        if !obj.get(key).is_some_and(Value::is_number) {
            push(issues, &join(path, key), "Expected a number");
        }
    }
}

fn check_project(value: &Value, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        push(issues, "", "Expected an object");
        return;
    };

    match obj.get("manifest") {
        Some(manifest) => check_manifest(manifest, "manifest", issues),
        None => push(issues, "manifest", "Expected an object"),
    }

    if let Some(graphs) = obj.get("graphs") {
        match graphs.as_object() {
            None => push(issues, "graphs", "Expected an object"),
            Some(map) => {
                for (graph_id, doc) in map {
                    check_graph(doc, &format!("graphs.{graph_id}"), issues);
                }
            }
        }
    }
    if let Some(structs) = obj.get("structs") {
        if !structs.is_object() {
            push(issues, "structs", "Expected an object");
        }
    }
}

fn check_manifest(value: &Value, prefix: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        push(issues, prefix, "Expected an object");
        return;
    };

    if let Some(version) = obj.get("manifestVersion") {
        if !version.is_number() {
            push(issues, &join(prefix, "manifestVersion"), "Expected a number");
        }
    }
    optional_string(obj, "appVersion", prefix, issues);

    let project_path = join(prefix, "project");
    match obj.get("project").and_then(Value::as_object) {
        None => push(issues, &project_path, "Expected an object"),
        Some(project) => {
            require_string(project, "id", &project_path, issues);
            require_string(project, "name", &project_path, issues);
        }
    }

    if let Some(graphs) = obj.get("graphs") {
        check_each(graphs, &join(prefix, "graphs"), issues, check_graph_ref);
    }
    if let Some(groups) = obj.get("groups") {
        check_each(groups, &join(prefix, "groups"), issues, check_group_entry);
    }
    for key in ["structGroups", "structures"] {
        if let Some(entries) = obj.get(key) {
            if !entries.is_array() {
                push(issues, &join(prefix, key), "Expected an array");
            }
        }
    }
}

fn check_graph_ref(value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        push(issues, path, "Expected an object");
        return;
    };
    require_string(obj, "graphId", path, issues);
    require_string(obj, "name", path, issues);
    require_string(obj, "path", path, issues);
    optional_string(obj, "groupName", path, issues);
    optional_string(obj, "createdAt", path, issues);
    optional_string(obj, "updatedAt", path, issues);
}

fn check_group_entry(value: &Value, path: &str, issues: &mut Vec<ValidationIssue>) {
    let Some(obj) = value.as_object() else {
        push(issues, path, "Expected an object");
        return;
    };
    if let Some(top) = obj.get("topFolder") {
        match top.as_str() {
            Some("server") | Some("client") => {}
            _ => push(
                issues,
                &join(path, "topFolder"),
                "Expected \"server\" or \"client\"",
            ),
        }
    }
    optional_string(obj, "categoryKey", path, issues);
    optional_string(obj, "groupSlug", path, issues);
    optional_string(obj, "groupName", path, issues);
}

fn check_each(
    value: &Value,
    path: &str,
    issues: &mut Vec<ValidationIssue>,
    check: fn(&Value, &str, &mut Vec<ValidationIssue>),
) {
    let Some(items) = value.as_array() else {
        push(issues, path, "Expected an array");
        return;
    };
    for (i, item) in items.iter().enumerate() {
        check(item, &format!("{path}.{i}"), issues);
    }
}

fn push(issues: &mut Vec<ValidationIssue>, path: &str, message: impl Into<String>) {
    issues.push(ValidationIssue {
        path: path.to_string(),
        message: message.into(),
    });
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn require_string(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if !obj.get(key).is_some_and(Value::is_string) {
        push(issues, &join(prefix, key), "Expected a string");
    }
}

fn optional_string(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(value) = obj.get(key) {
        if !value.is_string() {
            push(issues, &join(prefix, key), "Expected a string");
        }
    }
}

fn optional_bool(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(value) = obj.get(key) {
        if !value.is_boolean() {
            push(issues, &join(prefix, key), "Expected a boolean");
        }
    }
}

fn optional_object(
    obj: &Map<String, Value>,
    key: &str,
    prefix: &str,
    issues: &mut Vec<ValidationIssue>,
) {
    if let Some(value) = obj.get(key) {
        if !value.is_object() {
            push(issues, &join(prefix, key), "Expected an object");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_graph() -> Value {
        json!({
            "schemaVersion": 1,
            "name": "example",
        })
    }

    #[test]
    fn test_minimal_graph_normalizes_defaults() {
        let doc = validate_graph(&minimal_graph()).unwrap();
        assert!(doc.nodes.is_empty());
        assert!(doc.edges.is_empty());
        assert!(doc.comments.is_empty());

        let normalized = serde_json::to_value(&doc).unwrap();
        assert_eq!(normalized["nodes"], json!([]));
        assert_eq!(normalized["edges"], json!([]));
        assert_eq!(normalized["comments"], json!([]));
    }

    #[test]
    fn test_unsupported_schema_version() {
        let mut candidate = minimal_graph();
        candidate["schemaVersion"] = json!(3);
        let issues = validate_graph(&candidate).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "schemaVersion");
    }

    #[test]
    fn test_missing_schema_version() {
        let issues = validate_graph(&json!({"name": "x"})).unwrap_err();
        assert_eq!(issues[0].path, "schemaVersion");
    }

    #[test]
    fn test_non_object_candidate() {
        let issues = validate_graph(&json!(42)).unwrap_err();
        assert_eq!(issues[0].path, "");
        assert_eq!(issues[0].message, "Expected an object");
    }

    #[test]
    fn test_unknown_top_level_fields_preserved() {
        let mut candidate = minimal_graph();
        candidate["customMeta"] = json!({"tag": "keep-me"});
        let doc = validate_graph(&candidate).unwrap();
        let normalized = serde_json::to_value(&doc).unwrap();
        assert_eq!(normalized["customMeta"]["tag"], json!("keep-me"));
    }

    #[test]
    fn test_node_position_issue_path() {
        let mut candidate = minimal_graph();
        candidate["nodes"] = json!([
            {"id": "a", "type": "t", "position": {"x": 0, "y": 0}},
            {"id": "b", "type": "t", "position": {"x": 1, "y": 2}},
            {"id": "c", "type": "t", "position": {"x": "oops", "y": 0}},
        ]);
        let issues = validate_graph(&candidate).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "nodes.2.position.x");
        assert_eq!(issues[0].message, "Expected a number");
    }

    #[test]
    fn test_edge_port_must_not_be_empty() {
        let mut candidate = minimal_graph();
        candidate["edges"] = json!([
            {
                "id": "e1",
                "source": {"nodeId": "a", "portId": ""},
                "target": {"nodeId": "b", "portId": "in"},
            },
        ]);
        let issues = validate_graph(&candidate).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "edges.0.source.portId");
    }

    #[test]
    fn test_comment_requires_anchor() {
        let mut candidate = minimal_graph();
        candidate["comments"] = json!([{"text": "note"}]);
        let issues = validate_graph(&candidate).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "comments.0");
        assert_eq!(issues[0].message, "Comment requires nodeId or position.");
    }

    #[test]
    fn test_blank_node_id_is_not_an_anchor() {
        let mut candidate = minimal_graph();
        candidate["comments"] = json!([{"nodeId": "   ", "text": "note"}]);
        let issues = validate_graph(&candidate).unwrap_err();
        assert_eq!(issues[0].path, "comments.0");
    }

    #[test]
    fn test_position_anchored_comment_is_valid() {
        let mut candidate = minimal_graph();
        candidate["comments"] = json!([{"position": {"x": 10, "y": 20}, "text": "note"}]);
        let doc = validate_graph(&candidate).unwrap();
        assert_eq!(doc.comments.len(), 1);
    }

    #[test]
    fn test_unknown_environment() {
        let mut candidate = minimal_graph();
        candidate["environment"] = json!("mainframe");
        let issues = validate_graph(&candidate).unwrap_err();
        assert_eq!(issues[0].path, "environment");
        assert_eq!(issues[0].message, "Unknown environment: mainframe");
    }

    #[test]
    fn test_environment_subkind_accepted() {
        let mut candidate = minimal_graph();
        candidate["environment"] = json!("client:creation-state-decision");
        let doc = validate_graph(&candidate).unwrap();
        assert_eq!(
            doc.environment,
            Some(crate::graph::GraphEnvironment::ClientCreationStateDecision)
        );
    }

    #[test]
    fn test_multiple_issues_collected() {
        let candidate = json!({
            "schemaVersion": 9,
            "nodes": [{"id": 1, "type": "t", "position": {"x": 0, "y": 0}}],
        });
        let issues = validate_graph(&candidate).unwrap_err();
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"schemaVersion"));
        assert!(paths.contains(&"name"));
        assert!(paths.contains(&"nodes.0.id"));
    }

    fn minimal_project() -> Value {
        json!({
            "manifest": {
                "project": {"id": "p1", "name": "Demo"},
                "graphs": [],
            },
            "graphs": {},
        })
    }

    #[test]
    fn test_minimal_project_valid() {
        let doc = validate_project(&minimal_project()).unwrap();
        assert!(doc.graphs.is_empty());
        assert!(doc.structs.is_none());
    }

    #[test]
    fn test_project_missing_identity() {
        let candidate = json!({"manifest": {"project": {"name": "Demo"}}});
        let issues = validate_project(&candidate).unwrap_err();
        assert_eq!(issues[0].path, "manifest.project.id");
    }

    #[test]
    fn test_project_nested_graph_issue_path() {
        let mut candidate = minimal_project();
        candidate["graphs"] = json!({"g1": {"name": "no version"}});
        let issues = validate_project(&candidate).unwrap_err();
        assert_eq!(issues[0].path, "graphs.g1.schemaVersion");
    }

    #[test]
    fn test_manifest_entry_requires_path() {
        let mut candidate = minimal_project();
        candidate["manifest"]["graphs"] = json!([{"graphId": "g1", "name": "First"}]);
        let issues = validate_project(&candidate).unwrap_err();
        assert_eq!(issues[0].path, "manifest.graphs.0.path");
    }

    #[test]
    fn test_group_top_folder_enum() {
        let mut candidate = minimal_project();
        candidate["manifest"]["groups"] = json!([{"topFolder": "cloud"}]);
        let issues = validate_project(&candidate).unwrap_err();
        assert_eq!(issues[0].path, "manifest.groups.0.topFolder");
    }
}
