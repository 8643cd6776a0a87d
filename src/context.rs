//! Message context types for inbound media
//!
//! The ingestion pipeline hands over a bag of optional, possibly-inconsistent
//! fields describing attachments on a message. Template keys are `PascalCase`
//! on the wire; nested media-understanding records use `camelCase` keys.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Outcome string reported by the media-understanding subsystem
const OUTCOME_SUCCESS: &str = "success";

/// Attachment-related fields of an inbound message
///
/// Every field is optional; partial payloads and unknown extra fields
/// deserialize cleanly. `MediaPaths`/`MediaUrls`/`MediaTypes` are aligned by
/// index when their lengths agree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MsgContext {
    /// Single legacy attachment path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_path: Option<String>,

    /// Preferred list of attachment paths, index order significant
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_paths: Option<Vec<String>>,

    /// Remote URL applied to entries lacking a per-index URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    /// Remote URLs parallel to `media_paths`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_urls: Option<Vec<String>>,

    /// MIME/type label applied to entries lacking a per-index type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    /// MIME/type labels parallel to `media_paths`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_types: Option<Vec<String>>,

    /// Attachments already described by the understanding subsystem
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_understanding: Option<Vec<MediaUnderstanding>>,

    /// Per-capability understanding decisions with nested outcomes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_understanding_decisions: Option<Vec<UnderstandingDecision>>,
}

/// Record that an attachment was already processed elsewhere
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUnderstanding {
    /// Zero-based position in the effective paths list
    pub attachment_index: usize,
}

/// A media-understanding decision covering one or more attachments
///
/// Suppresses attachments only when the decision itself succeeded AND the
/// attachment's chosen result succeeded.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UnderstandingDecision {
    /// Decision-level outcome ("success" or a failure label)
    pub outcome: String,

    /// Capability that produced the decision (used for diagnostics)
    pub capability: String,

    /// Attachments covered by this decision
    pub attachments: Vec<DecisionAttachment>,
}

impl UnderstandingDecision {
    /// Whether the decision as a whole succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == OUTCOME_SUCCESS
    }
}

/// Per-attachment result within an understanding decision
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionAttachment {
    /// Zero-based position in the effective paths list
    pub attachment_index: usize,

    /// Chosen result for this attachment, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen: Option<ChosenOutcome>,
}

/// Outcome of the chosen result for a single attachment
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChosenOutcome {
    /// "success" when a description was produced
    pub outcome: String,
}

impl ChosenOutcome {
    /// Whether a description was produced for the attachment
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome == OUTCOME_SUCCESS
    }
}

impl MsgContext {
    /// Parse a context from a pipeline JSON payload
    ///
    /// Unknown fields are ignored and absent fields default to `None`, so
    /// partial payloads parse cleanly.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is structurally incompatible (e.g. not an
    /// object, or a non-integer `attachmentIndex`)
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Resolve the set of attachment indices to exclude from the media note
    ///
    /// Union of all `MediaUnderstanding` indices (unconditional) and the
    /// decision attachments where both the decision outcome and the chosen
    /// outcome are "success". Duplicates and out-of-range indices are
    /// harmless since only membership is queried.
    #[must_use]
    pub fn suppressed_attachment_indices(&self) -> HashSet<usize> {
        let mut suppressed = HashSet::new();

        if let Some(outputs) = &self.media_understanding {
            suppressed.extend(outputs.iter().map(|o| o.attachment_index));
        }

        if let Some(decisions) = &self.media_understanding_decisions {
            for decision in decisions {
                if !decision.is_success() {
                    continue;
                }
                for attachment in &decision.attachments {
                    if attachment.chosen.as_ref().is_some_and(ChosenOutcome::is_success) {
                        suppressed.insert(attachment.attachment_index);
                    }
                }
            }
        }

        suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn success_decision(indices: &[usize]) -> UnderstandingDecision {
        UnderstandingDecision {
            outcome: "success".to_string(),
            capability: "vision".to_string(),
            attachments: indices
                .iter()
                .map(|&attachment_index| DecisionAttachment {
                    attachment_index,
                    chosen: Some(ChosenOutcome {
                        outcome: "success".to_string(),
                    }),
                })
                .collect(),
        }
    }

    #[test]
    fn empty_context_suppresses_nothing() {
        let ctx = MsgContext::default();
        assert!(ctx.suppressed_attachment_indices().is_empty());
    }

    #[test]
    fn understanding_outputs_suppress_unconditionally() {
        let ctx = MsgContext {
            media_understanding: Some(vec![
                MediaUnderstanding { attachment_index: 0 },
                MediaUnderstanding { attachment_index: 2 },
                MediaUnderstanding { attachment_index: 0 },
            ]),
            ..Default::default()
        };

        let suppressed = ctx.suppressed_attachment_indices();
        assert_eq!(suppressed.len(), 2);
        assert!(suppressed.contains(&0));
        assert!(suppressed.contains(&2));
    }

    #[test]
    fn successful_decision_suppresses_chosen_attachments() {
        let ctx = MsgContext {
            media_understanding_decisions: Some(vec![success_decision(&[1])]),
            ..Default::default()
        };

        let suppressed = ctx.suppressed_attachment_indices();
        assert_eq!(suppressed.len(), 1);
        assert!(suppressed.contains(&1));
    }

    #[test]
    fn failed_decision_suppresses_nothing() {
        let mut decision = success_decision(&[0, 1]);
        decision.outcome = "failure".to_string();
        let ctx = MsgContext {
            media_understanding_decisions: Some(vec![decision]),
            ..Default::default()
        };

        assert!(ctx.suppressed_attachment_indices().is_empty());
    }

    #[test]
    fn attachment_without_chosen_success_is_not_suppressed() {
        let decision = UnderstandingDecision {
            outcome: "success".to_string(),
            capability: "vision".to_string(),
            attachments: vec![
                DecisionAttachment {
                    attachment_index: 0,
                    chosen: None,
                },
                DecisionAttachment {
                    attachment_index: 1,
                    chosen: Some(ChosenOutcome {
                        outcome: "timeout".to_string(),
                    }),
                },
                DecisionAttachment {
                    attachment_index: 2,
                    chosen: Some(ChosenOutcome {
                        outcome: "success".to_string(),
                    }),
                },
            ],
        };
        let ctx = MsgContext {
            media_understanding_decisions: Some(vec![decision]),
            ..Default::default()
        };

        let suppressed = ctx.suppressed_attachment_indices();
        assert_eq!(suppressed.len(), 1);
        assert!(suppressed.contains(&2));
    }

    #[test]
    fn sources_are_unioned() {
        let ctx = MsgContext {
            media_understanding: Some(vec![MediaUnderstanding { attachment_index: 0 }]),
            media_understanding_decisions: Some(vec![success_decision(&[0, 3])]),
            ..Default::default()
        };

        let suppressed = ctx.suppressed_attachment_indices();
        assert_eq!(suppressed.len(), 2);
        assert!(suppressed.contains(&0));
        assert!(suppressed.contains(&3));
    }

    #[test]
    fn from_json_parses_partial_payload() {
        let ctx = MsgContext::from_json(json!({
            "MediaPath": "/tmp/a.jpg",
            "SenderName": "Alice",
            "Body": "look at this"
        }))
        .unwrap();

        assert_eq!(ctx.media_path.as_deref(), Some("/tmp/a.jpg"));
        assert!(ctx.media_paths.is_none());
        assert!(ctx.media_understanding.is_none());
    }

    #[test]
    fn from_json_parses_nested_understanding_records() {
        let ctx = MsgContext::from_json(json!({
            "MediaPaths": ["a.jpg", "b.png"],
            "MediaUnderstanding": [{"attachmentIndex": 1, "summary": "a dog"}],
            "MediaUnderstandingDecisions": [{
                "outcome": "success",
                "capability": "vision",
                "attachments": [{"attachmentIndex": 0, "chosen": {"outcome": "success"}}]
            }]
        }))
        .unwrap();

        let suppressed = ctx.suppressed_attachment_indices();
        assert!(suppressed.contains(&0));
        assert!(suppressed.contains(&1));
    }

    #[test]
    fn from_json_rejects_non_object_payload() {
        assert!(MsgContext::from_json(json!(42)).is_err());
    }

    #[test]
    fn decision_with_missing_fields_defaults_to_no_suppression() {
        let ctx = MsgContext::from_json(json!({
            "MediaUnderstandingDecisions": [{"attachments": [{"attachmentIndex": 0}]}]
        }))
        .unwrap();

        assert!(ctx.suppressed_attachment_indices().is_empty());
    }
}
