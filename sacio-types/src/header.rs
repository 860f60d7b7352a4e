use serde::Serialize;

/// Значение «не задано» для вещественных полей
pub const SAC_FLOAT_UNDEF: f32 = -12345.0;

/// Значение «не задано» для целочисленных полей
pub const SAC_INT_UNDEF: i32 = -12345;

/// Значение «не задано» для текстовых полей
pub const SAC_TEXT_UNDEF: &str = "-12345";

/// Версия заголовка, которую пишет библиотека
pub const SAC_NVHDR: i32 = 6;

/// `iftype` для обычного временного ряда
pub const SAC_ITIME: i32 = 1;

/// Ширина обычного текстового поля (байт)
pub const SAC_TEXT_WIDTH: usize = 8;

/// Ширина поля `kevnm` (байт)
pub const SAC_KEVNM_WIDTH: usize = 16;

/// Количество слотов времён вступлений `t` / `kt`
pub const SAC_ARRIVAL_SLOTS: usize = 10;

/// Количество слотов `user` и `resp`
pub const SAC_USER_SLOTS: usize = 10;

/// Количество слотов `kuser`
pub const SAC_KUSER_SLOTS: usize = 3;

/// Замена пустого `khole` при построении идентификатора
pub const SAC_HOLE_PLACEHOLDER: &str = "--";

/// Заголовок SAC файла (фиксированный размер 632 байта на диске).
///
/// Каждое поле хранится как `Option`: `None` соответствует значению
/// `-12345` в файле. Преобразование выполняется только на границе кодека.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SacHeader {
    // ---- вещественные поля ----
    /// Шаг дискретизации (с)
    pub delta: Option<f32>,
    /// Минимальная амплитуда
    pub depmin: Option<f32>,
    /// Максимальная амплитуда
    pub depmax: Option<f32>,
    /// Множитель амплитуд
    pub scale: Option<f32>,
    /// Наблюдённый шаг, если отличается от номинального
    pub odelta: Option<f32>,
    /// Время первого отсчёта
    pub b: Option<f32>,
    /// Время последнего отсчёта
    pub e: Option<f32>,
    /// Время в очаге
    pub o: Option<f32>,
    /// Время первого вступления
    pub a: Option<f32>,
    pub internal1: Option<f32>,
    /// Времена вступлений
    pub t: [Option<f32>; SAC_ARRIVAL_SLOTS],
    /// Время конца события
    pub f: Option<f32>,
    /// Параметры отклика прибора
    pub resp: [Option<f32>; SAC_USER_SLOTS],
    /// Широта станции (градусы)
    pub stla: Option<f32>,
    /// Долгота станции (градусы)
    pub stlo: Option<f32>,
    /// Высота станции (м)
    pub stel: Option<f32>,
    /// Глубина станции (м)
    pub stdp: Option<f32>,
    /// Широта события
    pub evla: Option<f32>,
    /// Долгота события
    pub evlo: Option<f32>,
    /// Высота события
    pub evel: Option<f32>,
    /// Глубина события
    pub evdp: Option<f32>,
    /// Магнитуда
    pub mag: Option<f32>,
    /// Пользовательские поля
    pub user: [Option<f32>; SAC_USER_SLOTS],
    /// Эпицентральное расстояние (км)
    pub dist: Option<f32>,
    /// Азимут событие → станция
    pub az: Option<f32>,
    /// Обратный азимут
    pub baz: Option<f32>,
    /// Расстояние по дуге большого круга (градусы)
    pub gcarc: Option<f32>,
    pub internal2: Option<f32>,
    pub internal3: Option<f32>,
    /// Средняя амплитуда
    pub depmen: Option<f32>,
    /// Азимут компоненты
    pub cmpaz: Option<f32>,
    /// Наклон компоненты
    pub cmpinc: Option<f32>,
    pub xminimum: Option<f32>,
    pub xmaximum: Option<f32>,
    pub yminimum: Option<f32>,
    pub ymaximum: Option<f32>,

    // ---- целочисленные поля ----
    /// Год опорного времени
    pub nzyear: Option<i32>,
    /// День года опорного времени (1..=366)
    pub nzjday: Option<i32>,
    pub nzhour: Option<i32>,
    pub nzmin: Option<i32>,
    pub nzsec: Option<i32>,
    pub nzmsec: Option<i32>,
    /// Версия заголовка
    pub nvhdr: Option<i32>,
    pub norid: Option<i32>,
    pub nevid: Option<i32>,
    /// Количество отсчётов
    pub npts: Option<i32>,
    pub internal4: Option<i32>,
    pub nwfid: Option<i32>,
    pub nxsize: Option<i32>,
    pub nysize: Option<i32>,
    /// Тип файла
    pub iftype: Option<i32>,
    /// Тип зависимой переменной
    pub idep: Option<i32>,
    /// Тип опорного времени
    pub iztype: Option<i32>,
    pub iinst: Option<i32>,
    pub istreg: Option<i32>,
    pub ievreg: Option<i32>,
    pub ievtyp: Option<i32>,
    pub iqual: Option<i32>,
    pub isynth: Option<i32>,
    pub imagtyp: Option<i32>,
    pub imagsrc: Option<i32>,
    /// Равномерный шаг (логическое поле)
    pub leven: Option<i32>,
    pub lpspol: Option<i32>,
    pub lovrok: Option<i32>,
    pub lcalda: Option<i32>,

    // ---- текстовые поля ----
    /// Код станции
    pub kstnm: Option<String>,
    /// Название события (16 байт)
    pub kevnm: Option<String>,
    /// Код точки установки (location)
    pub khole: Option<String>,
    pub ko: Option<String>,
    pub ka: Option<String>,
    /// Имена фаз для `t`
    pub kt: [Option<String>; SAC_ARRIVAL_SLOTS],
    pub kf: Option<String>,
    pub kuser: [Option<String>; SAC_KUSER_SLOTS],
    /// Код канала
    pub kcmpnm: Option<String>,
    /// Код сети
    pub knetwk: Option<String>,
    pub kdatrd: Option<String>,
    pub kinst: Option<String>,
}

impl SacHeader {
    /// Заголовок со всеми полями «не задано», кроме `nvhdr` и `iftype`.
    pub fn new() -> Self {
        SacHeader {
            delta: None,
            depmin: None,
            depmax: None,
            scale: None,
            odelta: None,
            b: None,
            e: None,
            o: None,
            a: None,
            internal1: None,
            t: [None; SAC_ARRIVAL_SLOTS],
            f: None,
            resp: [None; SAC_USER_SLOTS],
            stla: None,
            stlo: None,
            stel: None,
            stdp: None,
            evla: None,
            evlo: None,
            evel: None,
            evdp: None,
            mag: None,
            user: [None; SAC_USER_SLOTS],
            dist: None,
            az: None,
            baz: None,
            gcarc: None,
            internal2: None,
            internal3: None,
            depmen: None,
            cmpaz: None,
            cmpinc: None,
            xminimum: None,
            xmaximum: None,
            yminimum: None,
            ymaximum: None,
            nzyear: None,
            nzjday: None,
            nzhour: None,
            nzmin: None,
            nzsec: None,
            nzmsec: None,
            nvhdr: Some(SAC_NVHDR),
            norid: None,
            nevid: None,
            npts: None,
            internal4: None,
            nwfid: None,
            nxsize: None,
            nysize: None,
            iftype: Some(SAC_ITIME),
            idep: None,
            iztype: None,
            iinst: None,
            istreg: None,
            ievreg: None,
            ievtyp: None,
            iqual: None,
            isynth: None,
            imagtyp: None,
            imagsrc: None,
            leven: None,
            lpspol: None,
            lovrok: None,
            lcalda: None,
            kstnm: None,
            kevnm: None,
            khole: None,
            ko: None,
            ka: None,
            kt: Default::default(),
            kf: None,
            kuser: Default::default(),
            kcmpnm: None,
            knetwk: None,
            kdatrd: None,
            kinst: None,
        }
    }

    /// Приводит пустой или незаданный `khole` к `--`.
    ///
    /// Повторный вызов ничего не меняет.
    pub fn normalize_hole(&mut self) {
        let empty = match self.khole.as_deref() {
            None => true,
            Some(s) => s.is_empty() || s == SAC_TEXT_UNDEF,
        };

        if empty {
            self.khole = Some(SAC_HOLE_PLACEHOLDER.to_string());
        }
    }

    /// Составной идентификатор `knetwk_kstnm_khole_kcmpnm`.
    pub fn id(&self) -> String {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| SAC_TEXT_UNDEF.to_string());

        let hole = match self.khole.as_deref() {
            None | Some("") | Some(SAC_TEXT_UNDEF) => SAC_HOLE_PLACEHOLDER.to_string(),
            Some(h) => h.to_string(),
        };

        format!(
            "{}_{}_{}_{}",
            text(&self.knetwk),
            text(&self.kstnm),
            hole,
            text(&self.kcmpnm)
        )
    }

    /// Ожидаемое время конца `b + (npts - 1) * delta`, если все три поля
    /// заданы.
    pub fn expected_end(&self) -> Option<f32> {
        match (self.b, self.delta, self.npts) {
            (Some(b), Some(delta), Some(npts)) => {
                Some((b as f64 + (npts as f64 - 1.0) * delta as f64) as f32)
            }
            _ => None,
        }
    }
}

impl Default for SacHeader {
    fn default() -> Self {
        Self::new()
    }
}
