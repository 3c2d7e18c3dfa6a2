use thiserror::Error;

/// Errors raised while fetching, validating, translating or delivering
/// homework status updates.
#[derive(Debug, Error)]
pub enum BotError {
    /// Non-200 answer or transport failure from the review API.
    #[error("Ошибка соединения с API-сервисом: {message}")]
    Connection {
        status: Option<u16>,
        message: String,
    },

    #[error("Некорректный ответ API: {0}")]
    MalformedResponse(String),

    #[error("В ответе API нет ключа homeworks")]
    MissingHomeworksKey,

    #[error("Домашняя работа не передана на проверку")]
    EmptySubmissionList,

    #[error("В словаре нет ключа {0}")]
    MissingField(&'static str),

    #[error("Получен неизвестный статус: {0}")]
    UnknownStatus(String),

    #[error("Сообщение не отправлено: {0}")]
    Delivery(String),

    #[error("Ошибка конфигурации: {0}")]
    Config(String),
}

impl BotError {
    /// HTTP status of a connection failure, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            BotError::Connection { status, .. } => *status,
            _ => None,
        }
    }
}
