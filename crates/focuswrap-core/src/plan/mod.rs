//! Study plans and the normalizer that builds them from raw payloads.
//!
//! The plan-generation adapter answers with free text that usually holds a
//! JSON object, often wrapped in a markdown code fence:
//!
//! ~~~text
//! ```json
//! { "timer": 45, "checklist": ["Read ch. 3", "Flashcards"], "notes": "Hydrate" }
//! ```
//! ~~~
//!
//! [`normalize`] strips the fences, finds the object, validates it and
//! converts the minute-based `timer` into seconds.

pub mod generator;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PlanError;

pub use generator::PlanGenerator;

/// A validated study plan. Immutable once a session is armed with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlan {
    duration_secs: u64,
    checklist: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl StudyPlan {
    /// Build a plan from already-structured parts, applying the same
    /// validation as [`normalize`].
    pub fn new(
        duration_secs: u64,
        checklist: Vec<String>,
        notes: Option<String>,
    ) -> Result<Self, PlanError> {
        if duration_secs == 0 {
            return Err(PlanError::InvalidDuration("0 seconds".into()));
        }
        let checklist = validate_checklist(checklist)?;
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Ok(Self {
            duration_secs,
            checklist,
            notes,
        })
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn checklist(&self) -> &[String] {
        &self.checklist
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Turn a raw adapter payload into a [`StudyPlan`].
///
/// # Errors
///
/// Returns a [`PlanError`] when the payload is empty, holds no JSON object,
/// or the object lacks a positive `timer` or a non-empty `checklist`.
pub fn normalize(raw: &str) -> Result<StudyPlan, PlanError> {
    let cleaned = strip_fences(raw);
    if cleaned.is_empty() {
        return Err(PlanError::Empty);
    }

    let value = parse_object(&cleaned)?;
    let obj = value
        .as_object()
        .ok_or_else(|| PlanError::InvalidJson("expected a JSON object".into()))?;

    let timer = obj.get("timer").ok_or(PlanError::MissingField("timer"))?;
    let duration_secs = minutes_to_secs(timer)?;

    let checklist = match obj.get("checklist") {
        None | Some(Value::Null) => return Err(PlanError::MissingField("checklist")),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(PlanError::InvalidJson(format!(
                    "checklist item {i} must be a string, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(PlanError::InvalidJson(format!(
                "checklist must be an array of strings, got {other}"
            )))
        }
    };

    let notes = match obj.get("notes") {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };

    StudyPlan::new(duration_secs, checklist, notes)
}

/// Remove ```` ```json ```` and ```` ``` ```` markers and trim.
fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

fn parse_object(text: &str) -> Result<Value, PlanError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(first_err) => {
            // Prose around the object: retry on the outermost braces.
            let start = text.find('{');
            let end = text.rfind('}');
            match (start, end) {
                (Some(s), Some(e)) if s < e => serde_json::from_str(&text[s..=e])
                    .map_err(|e| PlanError::InvalidJson(e.to_string())),
                _ => Err(PlanError::InvalidJson(first_err.to_string())),
            }
        }
    }
}

fn minutes_to_secs(timer: &Value) -> Result<u64, PlanError> {
    let minutes = match timer {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| PlanError::InvalidDuration(timer.to_string()))?;

    if !minutes.is_finite() || minutes <= 0.0 {
        return Err(PlanError::InvalidDuration(timer.to_string()));
    }

    let secs = (minutes * 60.0).round();
    if secs < 1.0 || secs > u64::MAX as f64 {
        return Err(PlanError::InvalidDuration(timer.to_string()));
    }
    Ok(secs as u64)
}

fn validate_checklist(items: Vec<String>) -> Result<Vec<String>, PlanError> {
    if items.is_empty() {
        return Err(PlanError::EmptyChecklist);
    }
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let trimmed = item.trim();
            if trimmed.is_empty() {
                Err(PlanError::BlankChecklistItem(i))
            } else {
                Ok(trimmed.to_string())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_fenced_payload() {
        let raw = "```json\n{\"timer\": 25, \"checklist\": [\"Read\", \"Quiz\"], \"notes\": \"Stay hydrated\"}\n```";
        let plan = normalize(raw).unwrap();
        assert_eq!(plan.duration_secs(), 25 * 60);
        assert_eq!(plan.checklist(), ["Read", "Quiz"]);
        assert_eq!(plan.notes(), Some("Stay hydrated"));
    }

    #[test]
    fn parses_object_embedded_in_prose() {
        let raw = "Here is your plan:\n{\"timer\": 10, \"checklist\": [\"Outline essay\"]}\nGood luck!";
        let plan = normalize(raw).unwrap();
        assert_eq!(plan.duration_secs(), 600);
        assert_eq!(plan.notes(), None);
    }

    #[test]
    fn accepts_numeric_string_and_fractional_minutes() {
        let plan = normalize(r#"{"timer": "1.5", "checklist": ["a"]}"#).unwrap();
        assert_eq!(plan.duration_secs(), 90);
    }

    #[test]
    fn rejects_missing_timer() {
        let err = normalize(r#"{"checklist": ["a"]}"#).unwrap_err();
        assert_eq!(err, PlanError::MissingField("timer"));
    }

    #[test]
    fn rejects_non_positive_timer() {
        assert!(matches!(
            normalize(r#"{"timer": 0, "checklist": ["a"]}"#),
            Err(PlanError::InvalidDuration(_))
        ));
        assert!(matches!(
            normalize(r#"{"timer": -5, "checklist": ["a"]}"#),
            Err(PlanError::InvalidDuration(_))
        ));
        assert!(matches!(
            normalize(r#"{"timer": "soon", "checklist": ["a"]}"#),
            Err(PlanError::InvalidDuration(_))
        ));
    }

    #[test]
    fn rejects_empty_or_missing_checklist() {
        assert_eq!(
            normalize(r#"{"timer": 5, "checklist": []}"#).unwrap_err(),
            PlanError::EmptyChecklist
        );
        assert_eq!(
            normalize(r#"{"timer": 5}"#).unwrap_err(),
            PlanError::MissingField("checklist")
        );
    }

    #[test]
    fn rejects_blank_and_non_string_items() {
        assert_eq!(
            normalize(r#"{"timer": 5, "checklist": ["ok", "  "]}"#).unwrap_err(),
            PlanError::BlankChecklistItem(1)
        );
        assert!(matches!(
            normalize(r#"{"timer": 5, "checklist": [3]}"#),
            Err(PlanError::InvalidJson(_))
        ));
    }

    #[test]
    fn rejects_empty_and_garbage_payloads() {
        assert_eq!(normalize("```json\n```").unwrap_err(), PlanError::Empty);
        assert!(matches!(
            normalize("no plan here"),
            Err(PlanError::InvalidJson(_))
        ));
        assert!(matches!(
            normalize("[1, 2, 3]"),
            Err(PlanError::InvalidJson(_))
        ));
    }

    #[test]
    fn blank_notes_are_dropped() {
        let plan = normalize(r#"{"timer": 5, "checklist": ["a"], "notes": "   "}"#).unwrap();
        assert_eq!(plan.notes(), None);
    }
}
