//! Абсолютное время: опорное время `nz*`, время в очаге и вступления фаз.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use log::trace;
use sacio_types::{SacError, SacResult, SAC_ARRIVAL_SLOTS, SAC_TEXT_WIDTH};

use crate::Record;

/// Максимальная длина метки фазы в `kt`.
pub const SAC_PHASE_LABEL_MAX: usize = SAC_TEXT_WIDTH - 1;

impl Record {
    /// Опорное время из `nzyear`, `nzjday`, `nzhour`, `nzmin`, `nzsec`,
    /// `nzmsec`.
    pub fn reference_time(&self) -> SacResult<NaiveDateTime> {
        let h = self.header();
        let (Some(year), Some(jday), Some(hour), Some(min), Some(sec), Some(msec)) =
            (h.nzyear, h.nzjday, h.nzhour, h.nzmin, h.nzsec, h.nzmsec)
        else {
            return Err(SacError::MissingReferenceTime);
        };

        let to_u32 = |v: i32| u32::try_from(v).map_err(|_| SacError::MissingReferenceTime);
        let jday = to_u32(jday)?;
        if jday == 0 {
            return Err(SacError::MissingReferenceTime);
        }

        let (hour, min, sec, msec) = (to_u32(hour)?, to_u32(min)?, to_u32(sec)?, to_u32(msec)?);

        NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(u64::from(jday - 1))))
            .and_then(|d| d.and_hms_milli_opt(hour, min, sec, msec))
            .ok_or(SacError::MissingReferenceTime)
    }

    /// Записывает опорное время в поля `nz*` (с точностью до миллисекунды).
    pub fn set_reference_time(
        &mut self,
        time: NaiveDateTime,
    ) {
        // високосная секунда в chrono кодируется nanosecond >= 1e9
        let msec = (time.nanosecond() / 1_000_000).min(999);

        self.edit_header(|h| {
            h.nzyear = Some(time.year());
            h.nzjday = Some(time.ordinal() as i32);
            h.nzhour = Some(time.hour() as i32);
            h.nzmin = Some(time.minute() as i32);
            h.nzsec = Some(time.second() as i32);
            h.nzmsec = Some(msec as i32);
        });
    }

    /// `o` = секунды от опорного времени до `time`.
    pub fn set_origin_time(
        &mut self,
        time: NaiveDateTime,
    ) -> SacResult<()> {
        let o = self.seconds_since_reference(time)?;
        self.edit_header(|h| h.o = Some(o));

        Ok(())
    }

    /// Заполняет `kt[i]`/`t[i]` по порядку.
    ///
    /// Метки длиннее 7 байт или с пробелами, а также более 10 вступлений
    /// отвергаются; при ошибке заголовок не меняется.
    pub fn set_arrival_times(
        &mut self,
        picks: &[(&str, NaiveDateTime)],
    ) -> SacResult<()> {
        if picks.len() > SAC_ARRIVAL_SLOTS {
            return Err(SacError::TooManyArrivals {
                max: SAC_ARRIVAL_SLOTS,
            });
        }

        let mut resolved = Vec::with_capacity(picks.len());
        for &(label, time) in picks {
            if label.len() > SAC_PHASE_LABEL_MAX {
                return Err(SacError::LabelTooLong {
                    label: label.to_string(),
                    max: SAC_PHASE_LABEL_MAX,
                });
            }
            if label.bytes().any(|c| c == b' ' || c == 0) {
                return Err(SacError::TextSeparator { field: "kt" });
            }
            resolved.push((label, self.seconds_since_reference(time)?));
        }

        self.edit_header(|h| {
            for (i, (label, t)) in resolved.into_iter().enumerate() {
                h.kt[i] = Some(label.to_string());
                h.t[i] = Some(t);
            }
        });
        trace!("Set {} arrival picks", picks.len());

        Ok(())
    }

    /// Пары `(kt[i], t[i])`, у которых задано время.
    pub fn arrivals(&self) -> Vec<(Option<&str>, f32)> {
        let h = self.header();

        h.kt.iter()
            .zip(h.t.iter())
            .filter_map(|(label, t)| t.map(|t| (label.as_deref(), t)))
            .collect()
    }

    fn seconds_since_reference(
        &self,
        time: NaiveDateTime,
    ) -> SacResult<f32> {
        let span = time - self.reference_time()?;

        span.num_microseconds()
            .map(|us| (us as f64 * 1e-6) as f32)
            .ok_or_else(|| SacError::invalid_parameter(format!("time offset out of range: {span}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(
        y: i32,
        mo: u32,
        d: u32,
        h: u32,
        mi: u32,
        s: u32,
        ms: u32,
    ) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
    }

    fn referenced() -> Record {
        let mut r = Record::from_samples(vec![0.0; 10], 0.05, 0.0);
        r.set_reference_time(dt(2004, 12, 26, 0, 58, 50, 250));
        r
    }

    #[test]
    fn test_reference_time_round_trip() {
        let r = referenced();

        assert_eq!(r.header().nzyear, Some(2004));
        assert_eq!(r.header().nzjday, Some(361));
        assert_eq!(r.header().nzmsec, Some(250));
        assert_eq!(r.reference_time().unwrap(), dt(2004, 12, 26, 0, 58, 50, 250));
    }

    #[test]
    fn test_reference_time_missing() {
        let mut r = Record::from_samples(vec![0.0; 4], 1.0, 0.0);
        assert!(matches!(
            r.reference_time(),
            Err(SacError::MissingReferenceTime)
        ));

        r.edit_header(|h| {
            h.nzyear = Some(2020);
            h.nzjday = Some(0);
            h.nzhour = Some(0);
            h.nzmin = Some(0);
            h.nzsec = Some(0);
            h.nzmsec = Some(0);
        });
        assert!(matches!(
            r.reference_time(),
            Err(SacError::MissingReferenceTime)
        ));
    }

    #[test]
    fn test_set_origin_time() {
        let mut r = referenced();
        r.set_origin_time(dt(2004, 12, 26, 0, 58, 53, 0)).unwrap();
        assert_eq!(r.header().o, Some(2.75));

        // раньше опорного времени
        r.set_origin_time(dt(2004, 12, 26, 0, 58, 49, 250)).unwrap();
        assert_eq!(r.header().o, Some(-1.0));
    }

    #[test]
    fn test_set_origin_requires_reference() {
        let mut r = Record::from_samples(vec![0.0; 4], 1.0, 0.0);
        assert!(r.set_origin_time(dt(2000, 1, 1, 0, 0, 0, 0)).is_err());
        assert_eq!(r.header().o, None);
    }

    #[test]
    fn test_set_arrival_times() {
        let mut r = referenced();
        r.set_arrival_times(&[
            ("P", dt(2004, 12, 26, 1, 0, 50, 250)),
            ("S", dt(2004, 12, 26, 1, 2, 0, 750)),
        ])
        .unwrap();

        assert_eq!(r.header().kt[0].as_deref(), Some("P"));
        assert_eq!(r.header().t[0], Some(120.0));
        assert_eq!(r.header().kt[1].as_deref(), Some("S"));
        assert_eq!(r.header().t[1], Some(190.5));
        assert_eq!(r.header().t[2], None);
        assert_eq!(r.arrivals(), vec![(Some("P"), 120.0), (Some("S"), 190.5)]);
    }

    #[test]
    fn test_arrival_label_too_long() {
        let mut r = referenced();
        let err = r
            .set_arrival_times(&[
                ("P", dt(2004, 12, 26, 1, 0, 0, 0)),
                ("PKIKPPP", dt(2004, 12, 26, 1, 0, 0, 0)),
                ("PKIKPPPP", dt(2004, 12, 26, 1, 0, 0, 0)),
            ])
            .unwrap_err();

        assert!(matches!(err, SacError::LabelTooLong { max: 7, .. }));
        assert_eq!(r.header().kt[0], None);
    }

    #[test]
    fn test_arrival_label_with_space() {
        let mut r = referenced();
        let err = r
            .set_arrival_times(&[
                ("P", dt(2004, 12, 26, 1, 0, 0, 0)),
                ("P S", dt(2004, 12, 26, 1, 0, 1, 0)),
            ])
            .unwrap_err();

        assert!(matches!(err, SacError::TextSeparator { field: "kt" }));
        assert_eq!(r.header().kt[0], None);
    }

    #[test]
    fn test_too_many_arrivals() {
        let mut r = referenced();
        let t = dt(2004, 12, 26, 1, 0, 0, 0);
        let picks: Vec<(&str, NaiveDateTime)> = (0..11).map(|_| ("P", t)).collect();

        assert!(matches!(
            r.set_arrival_times(&picks),
            Err(SacError::TooManyArrivals { max: 10 })
        ));
        assert!(r.arrivals().is_empty());
    }
}
