//! Запись SAC: заголовок + отсчёты + область (время/частота).
//!
//! Все производные поля (`npts`, `e`, `depmin`, `depmax`) пересчитываются
//! внутри мутаторов, поэтому после любого публичного вызова выполняется
//! `e == b + (npts - 1) * delta` и `depmin/depmax == min/max(отсчёты)`.

use log::trace;
use rustfft::num_complex::Complex;
use sacio_types::{Domain, SacError, SacHeader, SacResult};

/// Буфер отсчётов записи.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// Вещественные отсчёты во времени
    Time(Vec<f32>),
    /// Полуспектр вещественного сигнала
    Spectrum(Vec<Complex<f64>>),
}

/// Сейсмическая запись (одна трасса на файл).
///
/// Клонирование глубокое: буфер копируется целиком.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    header: SacHeader,
    samples: Samples,
    /// Прочитан только заголовок, `npts` описывает файл, а не буфер
    header_only: bool,
}

impl Samples {
    pub fn len(&self) -> usize {
        match self {
            Samples::Time(v) => v.len(),
            Samples::Spectrum(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn domain(&self) -> Domain {
        match self {
            Samples::Time(_) => Domain::Time,
            Samples::Spectrum(_) => Domain::Frequency,
        }
    }
}

impl Default for Samples {
    fn default() -> Self {
        Samples::Time(Vec::new())
    }
}

impl Record {
    /// Пустая запись: все поля «не заданы», область — время.
    pub fn new() -> Self {
        let mut record = Self {
            header: SacHeader::default(),
            samples: Samples::default(),
            header_only: false,
        };
        record.refresh_derived();
        record
    }

    /// Запись во временной области с заданным шагом и временем начала.
    pub fn from_samples(
        data: Vec<f32>,
        delta: f32,
        b: f32,
    ) -> Self {
        let mut header = SacHeader::default();
        header.delta = Some(delta);
        header.b = Some(b);

        Self::from_parts(header, Samples::Time(data))
    }

    /// Собирает запись из заголовка и буфера, восстанавливая производные поля.
    pub(crate) fn from_parts(
        header: SacHeader,
        samples: Samples,
    ) -> Self {
        let mut record = Self {
            header,
            samples,
            header_only: false,
        };
        record.refresh_derived();
        record
    }

    /// Запись без отсчётов, у которой `npts` взят из файла.
    pub(crate) fn header_only(header: SacHeader) -> Self {
        let mut record = Self {
            header,
            samples: Samples::default(),
            header_only: true,
        };
        record.refresh_derived();
        record
    }

    pub fn header(&self) -> &SacHeader {
        &self.header
    }

    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Отсчёты во времени (`None` для спектра).
    pub fn data(&self) -> Option<&[f32]> {
        match &self.samples {
            Samples::Time(v) => Some(v),
            Samples::Spectrum(_) => None,
        }
    }

    /// Полуспектр (`None` во временной области).
    pub fn spectrum(&self) -> Option<&[Complex<f64>]> {
        match &self.samples {
            Samples::Time(_) => None,
            Samples::Spectrum(v) => Some(v),
        }
    }

    pub fn domain(&self) -> Domain {
        self.samples.domain()
    }

    /// Количество отсчётов во времени по заголовку (`0`, если не задано).
    ///
    /// Для спектра это длина исходного временного ряда, а не буфера.
    pub fn npts(&self) -> usize {
        self.header.npts.map_or(0, |n| n.max(0) as usize)
    }

    /// Длина буфера.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Шаг дискретизации (`0.0`, если не задан).
    pub fn delta(&self) -> f32 {
        self.header.delta.unwrap_or(0.0)
    }

    pub fn is_header_only(&self) -> bool {
        self.header_only
    }

    /// `true`, если `npts < 0`, `delta < 0` (включая «не задано») или буфер
    /// пуст.
    pub fn is_empty(&self) -> bool {
        let npts_missing = self.header.npts.map_or(true, |n| n < 0);
        let delta_missing = self.header.delta.map_or(true, |d| d < 0.0);

        npts_missing || delta_missing || self.samples.is_empty()
    }

    /// Составной идентификатор `knetwk_kstnm_khole_kcmpnm`.
    pub fn id(&self) -> String {
        self.header.id()
    }

    /// Вектор времён отсчётов `b + k * delta` относительно опорного времени.
    pub fn times(&self) -> Vec<f64> {
        let b = self.header.b.unwrap_or(0.0) as f64;
        let delta = self.delta() as f64;

        (0..self.npts()).map(|k| b + k as f64 * delta).collect()
    }

    /// Заменяет отсчёты (переводит запись во временную область).
    pub fn set_data(
        &mut self,
        data: Vec<f32>,
    ) {
        self.replace_samples(Samples::Time(data));
    }

    /// Задаёт время первого отсчёта, `e` пересчитывается.
    pub fn set_b(
        &mut self,
        b: f32,
    ) {
        self.header.b = Some(b);
        self.refresh_derived();
    }

    /// Задаёт шаг дискретизации, `e` пересчитывается.
    pub fn set_delta(
        &mut self,
        delta: f32,
    ) {
        self.header.delta = Some(delta);
        self.refresh_derived();
    }

    /// Изменение произвольных полей заголовка.
    ///
    /// После выхода из замыкания производные поля восстанавливаются: ручные
    /// правки `e`, `depmin`, `depmax` (и `npts`, если отсчёты загружены)
    /// перезаписываются.
    pub fn edit_header<F>(
        &mut self,
        edit: F,
    ) where
        F: FnOnce(&mut SacHeader),
    {
        edit(&mut self.header);
        self.refresh_derived();
    }

    pub(crate) fn header_mut_raw(&mut self) -> &mut SacHeader {
        &mut self.header
    }

    pub(crate) fn replace_samples(
        &mut self,
        samples: Samples,
    ) {
        self.samples = samples;
        self.header_only = false;
        self.refresh_derived();
    }

    /// Пересчёт `npts`, `e`, `depmin`, `depmax`.
    pub(crate) fn refresh_derived(&mut self) {
        if !self.header_only {
            if let Samples::Time(data) = &self.samples {
                self.header.npts = Some(data.len() as i32);

                let (min, max) = amplitude_bounds(data).unzip();
                self.header.depmin = min;
                self.header.depmax = max;
            }
        }

        self.header.e = self.header.expected_end();

        trace!(
            "Derived fields: npts={:?}, e={:?}, depmin={:?}, depmax={:?}",
            self.header.npts,
            self.header.e,
            self.header.depmin,
            self.header.depmax
        );
    }

    /// Ошибка, если запись пуста.
    pub(crate) fn ensure_not_empty(&self) -> SacResult<()> {
        if self.is_empty() {
            return Err(SacError::MissingRequiredFields);
        }

        Ok(())
    }

    /// Ошибка, если запись не в требуемой области.
    pub(crate) fn ensure_domain(
        &self,
        expected: Domain,
    ) -> SacResult<()> {
        let found = self.domain();
        if found != expected {
            return Err(SacError::domain(expected, found));
        }

        Ok(())
    }

    /// Отсчёты во времени или ошибка области.
    pub(crate) fn time_data(&self) -> SacResult<&[f32]> {
        match &self.samples {
            Samples::Time(v) => Ok(v),
            Samples::Spectrum(_) => Err(SacError::domain(Domain::Time, Domain::Frequency)),
        }
    }
}

impl Default for Record {
    fn default() -> Self {
        Self::new()
    }
}

/// Минимум и максимум буфера (`None` для пустого).
///
/// Если в буфере есть NaN, обе границы равны NaN.
pub fn amplitude_bounds(data: &[f32]) -> Option<(f32, f32)> {
    let first = *data.first()?;
    if data.iter().any(|v| v.is_nan()) {
        return Some((f32::NAN, f32::NAN));
    }

    Some(
        data.iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_record() {
        let r = Record::default();

        assert_eq!(r.domain(), Domain::Time);
        assert_eq!(r.len(), 0);
        assert!(r.is_empty());
        assert_eq!(r.header().npts, Some(0));
        assert_eq!(r.header().depmin, None);
        assert_eq!(r.id(), "-12345_-12345_--_-12345");
        assert_eq!(Record::new(), r);
    }

    #[test]
    fn test_from_samples_derives_fields() {
        let r = Record::from_samples(vec![3.0, -1.0, 4.0, 1.0, 5.0], 0.5, 10.0);

        assert_eq!(r.header().npts, Some(5));
        assert_eq!(r.header().e, Some(12.0));
        assert_eq!(r.header().depmin, Some(-1.0));
        assert_eq!(r.header().depmax, Some(5.0));
        assert!(!r.is_empty());
    }

    #[test]
    fn test_set_data_updates_bounds_and_end() {
        let mut r = Record::from_samples(vec![0.0; 4], 1.0, 0.0);
        assert_eq!(r.header().e, Some(3.0));

        r.set_data(vec![2.0, 7.0]);
        assert_eq!(r.header().npts, Some(2));
        assert_eq!(r.header().e, Some(1.0));
        assert_eq!(r.header().depmin, Some(2.0));
        assert_eq!(r.header().depmax, Some(7.0));
    }

    #[test]
    fn test_set_b_and_delta_update_end() {
        let mut r = Record::from_samples(vec![0.0; 11], 1.0, 0.0);

        r.set_b(5.0);
        assert_eq!(r.header().e, Some(15.0));

        r.set_delta(0.5);
        assert_eq!(r.header().e, Some(10.0));
    }

    #[test]
    fn test_edit_header_restores_invariants() {
        let mut r = Record::from_samples(vec![1.0, 2.0, 3.0], 1.0, 0.0);

        r.edit_header(|h| {
            h.kstnm = Some("ANMO".into());
            h.e = Some(999.0);
            h.depmax = Some(-1.0);
            h.npts = Some(42);
        });

        assert_eq!(r.header().kstnm.as_deref(), Some("ANMO"));
        assert_eq!(r.header().e, Some(2.0));
        assert_eq!(r.header().depmax, Some(3.0));
        assert_eq!(r.header().npts, Some(3));
    }

    #[test]
    fn test_is_empty_guards() {
        let mut r = Record::from_samples(vec![1.0], 1.0, 0.0);
        assert!(!r.is_empty());

        r.set_delta(-1.0);
        assert!(r.is_empty());

        let r = Record::from_samples(Vec::new(), 1.0, 0.0);
        assert!(r.is_empty());
        assert!(matches!(
            r.ensure_not_empty(),
            Err(SacError::MissingRequiredFields)
        ));
    }

    #[test]
    fn test_clone_is_deep() {
        let a = Record::from_samples(vec![1.0, 2.0], 1.0, 0.0);
        let mut b = a.clone();

        b.set_data(vec![9.0, 9.0]);
        assert_eq!(a.data().unwrap(), &[1.0, 2.0]);
        assert_eq!(b.data().unwrap(), &[9.0, 9.0]);
    }

    #[test]
    fn test_times() {
        let r = Record::from_samples(vec![0.0; 3], 0.25, -1.0);
        assert_eq!(r.times(), vec![-1.0, -0.75, -0.5]);
    }

    #[test]
    fn test_amplitude_bounds() {
        assert_eq!(amplitude_bounds(&[]), None);
        assert_eq!(amplitude_bounds(&[2.0]), Some((2.0, 2.0)));
        assert_eq!(amplitude_bounds(&[2.0, -3.0, 8.0]), Some((-3.0, 8.0)));
    }

    #[test]
    fn test_amplitude_bounds_nan() {
        for data in [[f32::NAN, 1.0, 2.0], [1.0, f32::NAN, 2.0], [1.0, 2.0, f32::NAN]] {
            let (lo, hi) = amplitude_bounds(&data).unwrap();
            assert!(lo.is_nan() && hi.is_nan());
        }

        let r = Record::from_samples(vec![1.0, f32::NAN, -4.0], 1.0, 0.0);
        assert!(r.header().depmin.unwrap().is_nan());
        assert!(r.header().depmax.unwrap().is_nan());
    }
}
