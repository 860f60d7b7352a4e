use thiserror::Error;

use crate::Domain;

/// Результат для операций sacio
pub type SacResult<T> = std::result::Result<T, SacError>;

/// Типы ошибок формата SAC и операций над записью.
#[derive(Debug, Error)]
pub enum SacError {
    /// `npts` из заголовка не согласуется с размером файла ни в одном порядке
    /// байт
    #[error(
        "Number of points in header and length of trace inconsistent: \
         file size {file_size}, npts {npts_native} (native) / {npts_swapped} (swapped)"
    )]
    FormatCorruption {
        file_size: u64,
        npts_native: i32,
        npts_swapped: i32,
    },

    /// Буфер короче фиксированного заголовка
    #[error("Truncated data: need at least {needed} bytes, found {found}")]
    Truncated { needed: usize, found: usize },

    /// Операнд, с которым арифметика не определена
    #[error("Unsupported operand: {0}")]
    UnsupportedOperand(String),

    /// Заголовки двух записей не совпадают по указанному полю
    #[error("Header field mismatch: {field}")]
    HeaderMismatch { field: &'static str },

    /// Длина последовательности не равна `npts`
    #[error("Length mismatch: expected {expected} samples, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// Нет `npts`, `delta` или отсчётов
    #[error("Some sac attributes are missing (e.g., npts, delta, depvar)")]
    MissingRequiredFields,

    /// Не задано время в очаге `o`
    #[error("Origin time must be assigned")]
    MissingOriginTime,

    /// Не задано (или некорректно) опорное время `nz*`
    #[error("Reference time (nzyear, nzjday, nzhour, nzmin, nzsec, nzmsec) is not set")]
    MissingReferenceTime,

    /// Операция не допустима в текущей области записи
    #[error("Record is in the {found} domain, operation requires the {expected} domain")]
    DomainState { expected: Domain, found: Domain },

    /// Имя фазы не помещается в поле `kt`
    #[error("Phase name '{label}' is too long (max {max} bytes)")]
    LabelTooLong { label: String, max: usize },

    /// Больше пиков, чем слотов `t`/`kt`
    #[error("Too many arrival times: at most {max} slots available")]
    TooManyArrivals { max: usize },

    /// Текстовое поле длиннее своей фиксированной ширины
    #[error("Text field '{field}' exceeds {width} bytes")]
    TextTooLong { field: &'static str, width: usize },

    /// Пробел или NUL внутри 8-байтного текстового поля
    #[error("Text field '{field}' must not contain spaces or NUL bytes")]
    TextSeparator { field: &'static str },

    /// Недопустимый аргумент операции
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Ошибки ввода/вывода (автоконвертируются из std::io::Error)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SacError {
    /// Удобные конструкторы
    pub fn unsupported_operand<S: Into<String>>(s: S) -> Self {
        Self::UnsupportedOperand(s.into())
    }

    pub fn invalid_parameter<S: Into<String>>(s: S) -> Self {
        Self::InvalidParameter(s.into())
    }

    pub fn domain(
        expected: Domain,
        found: Domain,
    ) -> Self {
        Self::DomainState { expected, found }
    }
}
