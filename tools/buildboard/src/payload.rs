use crate::errors::BoardError;
use crate::types::StatusClass;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectStatus {
    pub project_name: String,
    pub css_class_name_for_dashboard: String,
    pub css_class_name_considering_last_status: String,
}

impl ProjectStatus {
    pub fn dashboard_class(&self) -> StatusClass {
        StatusClass::parse_css(&self.css_class_name_for_dashboard)
    }

    pub fn last_status_class(&self) -> StatusClass {
        StatusClass::parse_css(&self.css_class_name_considering_last_status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusPayload {
    Error,
    Projects(Vec<Option<ProjectStatus>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPayload {
    pub payload: StatusPayload,
    pub malformed_records: usize,
    pub diagnostics: Vec<String>,
}

impl ParsedPayload {
    fn of(payload: StatusPayload) -> Self {
        Self {
            payload,
            malformed_records: 0,
            diagnostics: Vec::new(),
        }
    }
}

pub fn parse_payload_str(input: &str) -> Result<ParsedPayload, BoardError> {
    let raw: Value = serde_json::from_str(input).map_err(|err| {
        BoardError::PayloadParse(format!(
            "invalid json: {err}; input={}",
            input.chars().take(256).collect::<String>(),
        ))
    })?;
    parse_payload(&raw)
}

pub fn parse_payload(raw: &Value) -> Result<ParsedPayload, BoardError> {
    if raw.get("error").map(is_truthy).unwrap_or(false) {
        return Ok(ParsedPayload::of(StatusPayload::Error));
    }

    let slots = collect_slots(raw)?;
    let mut records = Vec::with_capacity(slots.len());
    let mut malformed_records = 0;
    let mut diagnostics = Vec::new();
    for (index, slot) in slots.iter().enumerate() {
        match slot {
            None => records.push(None),
            Some(value) => match parse_record(value) {
                Ok(record) => records.push(Some(record)),
                Err(reason) => {
                    malformed_records += 1;
                    diagnostics.push(format!("record {index}: {reason}"));
                    records.push(None);
                }
            },
        }
    }
    Ok(ParsedPayload {
        payload: StatusPayload::Projects(records),
        malformed_records,
        diagnostics,
    })
}

// Accepts both a plain JSON array and the length-keyed object form the
// dashboard poller emits ({"length": 2, "0": {...}, "1": {...}}). A null
// payload or an object without a length carries no records.
fn collect_slots(raw: &Value) -> Result<Vec<Option<&Value>>, BoardError> {
    if raw.is_null() {
        return Ok(Vec::new());
    }
    if let Some(items) = raw.as_array() {
        return Ok(items
            .iter()
            .map(|item| if is_truthy(item) { Some(item) } else { None })
            .collect());
    }

    let object = raw.as_object().ok_or_else(|| {
        BoardError::PayloadParse(format!("unrecognized payload shape: {raw}"))
    })?;
    let Some(length) = object.get("length").and_then(Value::as_u64) else {
        return Ok(Vec::new());
    };

    let mut slots = Vec::with_capacity(length as usize);
    for index in 0..length {
        let slot = object.get(&index.to_string()).filter(|value| is_truthy(value));
        slots.push(slot);
    }
    Ok(slots)
}

fn parse_record(value: &Value) -> Result<ProjectStatus, String> {
    let info = value
        .get("building_info")
        .and_then(Value::as_object)
        .ok_or_else(|| "missing building_info".to_string())?;

    let field = |name: &str| -> Result<String, String> {
        info.get(name)
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or_else(|| format!("missing building_info.{name}"))
    };

    Ok(ProjectStatus {
        project_name: field("project_name")?,
        css_class_name_for_dashboard: field("css_class_name_for_dashboard")?,
        css_class_name_considering_last_status: field("css_class_name_considering_last_status")?,
    })
}

// Error flags and record slots follow JS truthiness: false, null, 0, and ""
// are falsy, everything else is set.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub fn parse_payload_lines(input: &str) -> Result<Vec<Value>, BoardError> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str::<Value>(line).map_err(|err| {
                BoardError::PayloadParse(format!(
                    "invalid json line: {err}; input={}",
                    line.chars().take(256).collect::<String>(),
                ))
            })
        })
        .collect()
}
