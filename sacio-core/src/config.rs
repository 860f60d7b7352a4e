/// Порядок байт числовых полей файла.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/// Параметры чтения SAC файла.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Прочитать не более `npts` отсчётов (`None` = все). Значения вне
    /// `[0, npts]` из заголовка игнорируются.
    pub npts: Option<usize>,
    /// Прочитать только заголовок
    pub header_only: bool,
}

/// Параметры записи SAC файла.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Порядок байт на диске
    pub byte_order: Endian,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl Endian {
    /// Порядок байт текущей платформы.
    pub fn native() -> Self {
        if cfg!(target_endian = "little") {
            Endian::Little
        } else {
            Endian::Big
        }
    }

    /// Противоположный порядок байт.
    pub fn swapped(self) -> Self {
        match self {
            Endian::Little => Endian::Big,
            Endian::Big => Endian::Little,
        }
    }
}

impl ReadOptions {
    /// Полное чтение заголовка и данных.
    pub fn new() -> Self {
        Self::default()
    }

    /// Только заголовок, без отсчётов.
    pub fn header_only() -> Self {
        Self {
            npts: None,
            header_only: true,
        }
    }

    /// Ограничивает количество читаемых отсчётов.
    pub fn with_npts(
        mut self,
        npts: usize,
    ) -> Self {
        self.npts = Some(npts);
        self
    }
}

impl WriteOptions {
    pub fn with_byte_order(byte_order: Endian) -> Self {
        Self { byte_order }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для Endian, WriteOptions
////////////////////////////////////////////////////////////////////////////////

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            byte_order: Endian::native(),
        }
    }
}

impl std::fmt::Display for Endian {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Endian::Little => write!(f, "little"),
            Endian::Big => write!(f, "big"),
        }
    }
}

impl std::str::FromStr for Endian {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "little" | "le" => Ok(Endian::Little),
            "big" | "be" => Ok(Endian::Big),
            "native" | "host" => Ok(Endian::native()),
            _ => Err(format!(
                "Unknown byte order: '{s}'. Use: little, big, native"
            )),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endian_fromstr() {
        assert_eq!("little".parse::<Endian>().unwrap(), Endian::Little);
        assert_eq!("BE".parse::<Endian>().unwrap(), Endian::Big);
        assert_eq!("native".parse::<Endian>().unwrap(), Endian::native());
        assert!("middle".parse::<Endian>().is_err());
    }

    #[test]
    fn test_endian_swapped() {
        assert_eq!(Endian::Little.swapped(), Endian::Big);
        assert_eq!(Endian::native().swapped().swapped(), Endian::native());
    }

    #[test]
    fn test_read_options_builders() {
        let full = ReadOptions::new();
        assert_eq!(full.npts, None);
        assert!(!full.header_only);

        let clamp = ReadOptions::new().with_npts(10);
        assert_eq!(clamp.npts, Some(10));

        assert!(ReadOptions::header_only().header_only);
    }

    #[test]
    fn test_write_options_default_is_native() {
        assert_eq!(WriteOptions::default().byte_order, Endian::native());
    }
}
