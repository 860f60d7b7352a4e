use thiserror::Error;

pub type ToolResult<T> = std::result::Result<T, ToolError>;

#[derive(Debug, Error)]
pub enum ToolError {
    /// Ошибка формата или операции над записью
    #[error("SAC error: {0}")]
    Sac(#[from] sacio_types::SacError),

    /// Ошибка чтения/записи вспомогательных файлов
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Некорректный JSON с полюсами и нулями
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Некорректные аргументы командной строки
    #[error("Config error: {0}")]
    Config(String),
}

impl ToolError {
    pub fn config<S: Into<String>>(s: S) -> Self {
        Self::Config(s.into())
    }
}
