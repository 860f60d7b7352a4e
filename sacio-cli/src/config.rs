use std::{fs, path::Path, path::PathBuf};

use sacio_core::{Endian, PolesZeros, WriteOptions};
use serde::{Deserialize, Serialize};

use crate::{ToolError, ToolResult};

/// Куда и в каком порядке байт сохранять результат.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputConfig {
    /// Выходной файл (None — перезаписать входной)
    pub path: Option<PathBuf>,
    /// Порядок байт (None — порядок хоста)
    pub byte_order: Option<Endian>,
}

/// Правый операнд `combine`: число или путь к SAC файлу.
#[derive(Debug, Clone, PartialEq)]
pub enum RhsOperand {
    Scalar(f64),
    File(PathBuf),
}

/// Полюса и нули в JSON.
///
/// ```json
/// {"constant": 1.0, "zeros": [[0.0, 0.0]], "poles": [[-0.037, 0.037]]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PzFile {
    pub constant: f64,
    #[serde(default)]
    pub zeros: Vec<[f64; 2]>,
    #[serde(default)]
    pub poles: Vec<[f64; 2]>,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl OutputConfig {
    /// Итоговый путь: выходной, если задан, иначе входной.
    pub fn resolve<'a>(
        &'a self,
        input: &'a Path,
    ) -> &'a Path {
        self.path.as_deref().unwrap_or(input)
    }

    pub fn write_options(&self) -> WriteOptions {
        self.byte_order
            .map(WriteOptions::with_byte_order)
            .unwrap_or_default()
    }
}

impl PzFile {
    pub fn load<P: AsRef<Path>>(path: P) -> ToolResult<Self> {
        let text = fs::read_to_string(path)?;
        let pz: PzFile = serde_json::from_str(&text)?;

        if !pz.constant.is_finite() {
            return Err(ToolError::config("poles/zeros constant must be finite"));
        }

        Ok(pz)
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов
////////////////////////////////////////////////////////////////////////////////

impl From<PzFile> for PolesZeros {
    fn from(pz: PzFile) -> Self {
        PolesZeros::from_pairs(pz.constant, &pz.zeros, &pz.poles)
    }
}

impl std::str::FromStr for RhsOperand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Empty operand: expected a number or a SAC file path".to_string());
        }

        match s.parse::<f64>() {
            Ok(k) => Ok(RhsOperand::Scalar(k)),
            Err(_) => Ok(RhsOperand::File(PathBuf::from(s))),
        }
    }
}

impl std::fmt::Display for RhsOperand {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            RhsOperand::Scalar(k) => write!(f, "{k}"),
            RhsOperand::File(p) => write!(f, "{}", p.display()),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////
