use serde_json::Value;

use homework_common::error::BotError;
use homework_common::types::SubmissionRecord;

/// Check the shape of a raw API response and return its most recent submission.
///
/// The API orders `homeworks` newest first; element 0 is taken as is.
pub fn extract_latest(raw: &Value) -> Result<SubmissionRecord, BotError> {
    tracing::debug!("Validating review API response");

    let object = raw.as_object().ok_or_else(|| {
        BotError::MalformedResponse(format!("ожидался словарь, получен {}", kind(raw)))
    })?;

    let homeworks = object.get("homeworks").ok_or(BotError::MissingHomeworksKey)?;

    let list = homeworks.as_array().ok_or_else(|| {
        BotError::MalformedResponse(format!("homeworks не список, а {}", kind(homeworks)))
    })?;

    let latest = list.first().ok_or(BotError::EmptySubmissionList)?;

    latest.as_object().cloned().ok_or_else(|| {
        BotError::MalformedResponse(format!("работа не словарь, а {}", kind(latest)))
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "логическое значение",
        Value::Number(_) => "число",
        Value::String(_) => "строка",
        Value::Array(_) => "список",
        Value::Object(_) => "словарь",
    }
}
