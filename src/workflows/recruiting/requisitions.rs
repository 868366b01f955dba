use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::domain::{RequisitionRecord, RequisitionType};
use super::NormalizeError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJobRequisition {
    #[serde(rename = "itemID")]
    item_id: String,
    #[serde(default)]
    posting_instructions: Option<Vec<RawPostingInstruction>>,
    #[serde(default)]
    backfill_worker_positions: Value,
    #[serde(default)]
    openings_new_position_quantity: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPostingInstruction {
    #[serde(default)]
    post_date: Option<String>,
}

/// Loose truthiness for upstream flags that arrive as lists, counts, or booleans.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

pub fn classify(backfill_positions: &Value, new_position_quantity: &Value) -> RequisitionType {
    if is_truthy(backfill_positions) {
        RequisitionType::Backfill
    } else if is_truthy(new_position_quantity) {
        RequisitionType::NewRole
    } else {
        RequisitionType::Unknown
    }
}

fn normalize_requisition(index: usize, raw: &Value) -> Result<RequisitionRecord, NormalizeError> {
    let requisition =
        RawJobRequisition::deserialize(raw).map_err(|source| NormalizeError::Malformed {
            kind: "job requisition",
            index,
            source,
        })?;

    let requisition_type = classify(
        &requisition.backfill_worker_positions,
        &requisition.openings_new_position_quantity,
    );

    Ok(RequisitionRecord {
        requisition_id: requisition.item_id,
        posted_date: requisition
            .posting_instructions
            .into_iter()
            .flatten()
            .next()
            .and_then(|instruction| instruction.post_date),
        requisition_type,
    })
}

pub fn normalize_requisitions(raw: &[Value]) -> Result<Vec<RequisitionRecord>, NormalizeError> {
    let requisitions = raw
        .iter()
        .enumerate()
        .map(|(index, requisition)| normalize_requisition(index, requisition))
        .collect::<Result<Vec<_>, _>>()?;

    info!(count = requisitions.len(), "normalized job requisitions");
    Ok(requisitions)
}
