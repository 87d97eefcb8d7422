//! Per-action payload construction.
//!
//! `build_params` is pure: the current time is a parameter, so the same
//! inputs always produce the same output. Unknown action ids yield empty
//! params — rejecting them against the catalog is the dispatcher's job,
//! not this module's.

use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};

/// Scope hint used when no resources are selected.
const DEFAULT_FOLDER_ROOT: &str = "kb://knowledge-base/";

/// Members of this group get delivery-flavored summaries.
const DELIVERY_GROUP: &str = "Delivery";

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// The closed set of actions the builder knows how to parameterize.
/// Adding an action means adding a variant and a match arm; the compiler
/// keeps the two in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    SummarizeDocs,
    GenerateFaq,
    DraftChangeNote,
    ValidateSchema,
    CreateJiraDraft,
    CompliancePack,
    Other,
}

impl ActionKind {
    pub fn from_id(id: &str) -> Self {
        match id {
            "summarize-docs" => ActionKind::SummarizeDocs,
            "generate-faq" => ActionKind::GenerateFaq,
            "draft-change-note" => ActionKind::DraftChangeNote,
            "validate-schema" => ActionKind::ValidateSchema,
            "create-jira-draft" => ActionKind::CreateJiraDraft,
            "compliance-pack" => ActionKind::CompliancePack,
            _ => ActionKind::Other,
        }
    }
}

// ---------------------------------------------------------------------------
// build_params
// ---------------------------------------------------------------------------

/// Build the action-specific `params` object from the selected resource URIs
/// and the caller's group memberships.
pub fn build_params(
    action_id: &str,
    uris: &[String],
    groups: &[String],
    now: DateTime<Utc>,
) -> Map<String, Value> {
    let params = match ActionKind::from_id(action_id) {
        ActionKind::SummarizeDocs => json!({
            "documentUris": uris,
            "audience": if groups.iter().any(|g| g == DELIVERY_GROUP) {
                "delivery"
            } else {
                "engineering"
            },
        }),
        ActionKind::GenerateFaq => json!({
            "folderPrefix": common_prefix(uris),
            "maxQuestions": 12,
        }),
        ActionKind::DraftChangeNote => json!({
            "baselineUri": uris.first().cloned().unwrap_or_default(),
            "updatedUri": uris.get(1).or_else(|| uris.first()).cloned().unwrap_or_default(),
            "changeWindow": now.format("%Y-%m").to_string(),
        }),
        ActionKind::ValidateSchema => json!({
            "schemaUri": uris.first().cloned().unwrap_or_default(),
            "profile": "both",
        }),
        ActionKind::CreateJiraDraft => json!({
            "projectKey": "REL",
            "summary": "Draft ticket from gateway handoff",
            "description": format!("Context: {}", uris.join(", ")),
            "labels": ["gateway", "automated"],
        }),
        ActionKind::CompliancePack => json!({
            "sourceUris": uris,
            "regime": "AI-Act",
        }),
        ActionKind::Other => json!({}),
    };
    into_object(params)
}

fn into_object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Longest shared "directory" prefix of the selected URIs: the byte-wise
/// common prefix cut back to the last `/`. Falls back to the corpus root for
/// an empty set or URIs with no shared directory.
pub fn common_prefix(uris: &[String]) -> String {
    let Some(first) = uris.first() else {
        return DEFAULT_FOLDER_ROOT.to_string();
    };
    let mut common = first.len();
    for uri in &uris[1..] {
        common = first
            .as_bytes()
            .iter()
            .zip(uri.as_bytes())
            .take(common)
            .take_while(|(a, b)| a == b)
            .count();
    }
    match first.as_bytes()[..common].iter().rposition(|&b| b == b'/') {
        Some(pos) => first[..=pos].to_string(),
        None => DEFAULT_FOLDER_ROOT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn uris(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn groups(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn pinned_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn summarize_audience_follows_delivery_membership() {
        let delivery = build_params(
            "summarize-docs",
            &uris(&["kb://knowledge-base/specs/a.md"]),
            &groups(&["Delivery"]),
            pinned_now(),
        );
        assert_eq!(delivery["audience"], "delivery");

        let engineering = build_params(
            "summarize-docs",
            &uris(&["kb://knowledge-base/specs/a.md"]),
            &groups(&["Eng"]),
            pinned_now(),
        );
        assert_eq!(engineering["audience"], "engineering");
        assert_eq!(
            engineering["documentUris"],
            serde_json::json!(["kb://knowledge-base/specs/a.md"])
        );
    }

    #[test]
    fn generate_faq_scopes_to_common_prefix() {
        let params = build_params(
            "generate-faq",
            &uris(&[
                "kb://knowledge-base/guides/setup.md",
                "kb://knowledge-base/guides/faq/source.md",
            ]),
            &groups(&["Engineering"]),
            pinned_now(),
        );
        assert_eq!(params["folderPrefix"], "kb://knowledge-base/guides/");
        assert_eq!(params["maxQuestions"], 12);
    }

    #[test]
    fn change_note_window_comes_from_supplied_time() {
        let params = build_params(
            "draft-change-note",
            &uris(&["kb://kb/spec-v1.md", "kb://kb/spec-v2.md"]),
            &groups(&["Engineering"]),
            pinned_now(),
        );
        assert_eq!(params["baselineUri"], "kb://kb/spec-v1.md");
        assert_eq!(params["updatedUri"], "kb://kb/spec-v2.md");
        assert_eq!(params["changeWindow"], "2026-08");
    }

    #[test]
    fn change_note_reuses_baseline_when_single_uri() {
        let params = build_params(
            "draft-change-note",
            &uris(&["kb://kb/spec-v1.md"]),
            &groups(&[]),
            pinned_now(),
        );
        assert_eq!(params["updatedUri"], "kb://kb/spec-v1.md");
    }

    #[test]
    fn unknown_action_yields_empty_params() {
        let params = build_params("no-such-action", &uris(&["kb://kb/a"]), &groups(&[]), pinned_now());
        assert!(params.is_empty());
    }

    #[test]
    fn common_prefix_of_empty_set_is_default_root() {
        assert_eq!(common_prefix(&[]), DEFAULT_FOLDER_ROOT);
    }

    #[test]
    fn common_prefix_of_single_uri_is_its_directory() {
        assert_eq!(
            common_prefix(&uris(&["kb://knowledge-base/guides/setup.md"])),
            "kb://knowledge-base/guides/"
        );
    }

    #[test]
    fn common_prefix_without_shared_directory_is_default_root() {
        assert_eq!(common_prefix(&uris(&["alpha", "beta"])), DEFAULT_FOLDER_ROOT);
    }
}
