use serde_json::Value;

use homework_common::error::BotError;
use homework_common::types::{HomeworkStatus, SubmissionRecord};

/// Turn a submission into the verdict sentence sent to the user.
///
/// A missing or non-string `homework_name` is tolerated (an empty name is
/// used); a missing or unrecognized `status` fails the translation. Failures
/// are returned, not logged.
pub fn parse_status(record: &SubmissionRecord) -> Result<String, BotError> {
    let name = homework_name(record).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Using an empty homework name");
        ""
    });

    let status = match record.get("status") {
        Some(Value::String(s)) => s.parse::<HomeworkStatus>()?,
        Some(other) => return Err(BotError::UnknownStatus(other.to_string())),
        None => return Err(BotError::MissingField("status")),
    };

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        status.verdict()
    ))
}

fn homework_name(record: &SubmissionRecord) -> Result<&str, BotError> {
    match record.get("homework_name") {
        Some(Value::String(name)) => Ok(name.as_str()),
        Some(other) => Err(BotError::MalformedResponse(format!(
            "homework_name не строка: {}",
            other
        ))),
        None => Err(BotError::MissingField("homework_name")),
    }
}
