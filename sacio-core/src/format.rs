//! Спецификация формата SAC (версия заголовка 6)
//!
//! Бинарный файл = фиксированный заголовок 632 байта + `npts` отсчётов по 4
//! байта. Порядок байт не хранится в файле и определяется по полю `npts`.
//!
//! ```text
//! [0..252)    63 × f32   — вещественные поля (включая t[10], resp[10], user[10])
//! [252..280)   7 × f32   — резерв
//! [280..440)  40 × i32   — целочисленные поля и 4 резервные области (1, 1, 8, 1 слов)
//! [440..632)  текст      — kstnm[8], kevnm[16], затем 21 поле по 8 байт
//! [632..)     npts × f32 — отсчёты
//! ```

use log::debug;
use sacio_types::{
    SacError, SacHeader, SacResult, SAC_ARRIVAL_SLOTS, SAC_FLOAT_UNDEF, SAC_INT_UNDEF,
    SAC_KEVNM_WIDTH, SAC_KUSER_SLOTS, SAC_TEXT_WIDTH, SAC_USER_SLOTS,
};

use crate::{
    binary::{
        read::{read_f32_local, read_i32_local, read_text_local},
        write::{write_f32_local, write_i32_local, write_text_local},
    },
    Endian,
};

/// Размер фиксированного заголовка (632 байта)
pub const SAC_HEADER_SIZE: usize = 632;

/// Смещение поля `npts` — по нему определяется порядок байт
pub const SAC_NPTS_OFFSET: usize = 316;

/// Размер одного отсчёта на диске
pub const SAC_SAMPLE_SIZE: usize = 4;

/// Количество вещественных слотов заголовка (включая резерв)
pub const SAC_FLOAT_WORDS: usize = 70;

/// Количество целочисленных слотов заголовка (включая резерв)
pub const SAC_INT_WORDS: usize = 40;

/// Число резервных вещественных слотов после `ymaximum`
const FLOAT_RESERVED: usize = 7;

/// Перевод значения «не задано» в `Option` и обратно.
pub trait Sentinel: Copy + PartialEq {
    const UNDEF: Self;

    fn from_raw(raw: Self) -> Option<Self> {
        if raw == Self::UNDEF {
            None
        } else {
            Some(raw)
        }
    }

    fn to_raw(value: Option<Self>) -> Self {
        value.unwrap_or(Self::UNDEF)
    }
}

impl Sentinel for f32 {
    const UNDEF: Self = SAC_FLOAT_UNDEF;
}

impl Sentinel for i32 {
    const UNDEF: Self = SAC_INT_UNDEF;
}

/// Ожидаемый размер файла для `npts` отсчётов.
pub fn expected_file_size(npts: i64) -> i64 {
    SAC_HEADER_SIZE as i64 + SAC_SAMPLE_SIZE as i64 * npts
}

/// Определяет порядок байт файла по полю `npts` и его размеру.
///
/// Сначала пробуется порядок байт платформы, затем обратный.
pub fn detect_byte_order(
    header: &[u8],
    file_size: u64,
) -> SacResult<Endian> {
    if header.len() < SAC_NPTS_OFFSET + 4 {
        return Err(SacError::Truncated {
            needed: SAC_HEADER_SIZE,
            found: header.len(),
        });
    }

    let raw = [
        header[SAC_NPTS_OFFSET],
        header[SAC_NPTS_OFFSET + 1],
        header[SAC_NPTS_OFFSET + 2],
        header[SAC_NPTS_OFFSET + 3],
    ];
    let npts_native = i32::from_ne_bytes(raw);
    let npts_swapped = npts_native.swap_bytes();
    let size = file_size as i64;

    let endian = if size == expected_file_size(npts_native as i64) {
        Endian::native()
    } else if size == expected_file_size(npts_swapped as i64) {
        Endian::native().swapped()
    } else {
        return Err(SacError::FormatCorruption {
            file_size,
            npts_native,
            npts_swapped,
        });
    };

    debug!("Detected {endian}-endian SAC file ({file_size} bytes)");

    Ok(endian)
}

/// Сериализация [`SacHeader`] в бинарный заголовок.
pub trait SacHeaderExt: Sized {
    /// Сериализация заголовка в 632 байта
    fn serialize(
        &self,
        endian: Endian,
    ) -> SacResult<[u8; SAC_HEADER_SIZE]>;

    /// Десериализация заголовка из 632 байт
    fn deserialize(
        buf: &[u8; SAC_HEADER_SIZE],
        endian: Endian,
    ) -> SacResult<Self>;
}

impl SacHeaderExt for SacHeader {
    fn serialize(
        &self,
        endian: Endian,
    ) -> SacResult<[u8; SAC_HEADER_SIZE]> {
        let mut buf = [0u8; SAC_HEADER_SIZE];
        let mut off = 0;

        {
            let mut f = |v: Option<f32>| write_f32_local(&mut buf, &mut off, endian, f32::to_raw(v));

            f(self.delta);
            f(self.depmin);
            f(self.depmax);
            f(self.scale);
            f(self.odelta);
            f(self.b);
            f(self.e);
            f(self.o);
            f(self.a);
            f(self.internal1);
            self.t.iter().for_each(|v| f(*v));
            f(self.f);
            self.resp.iter().for_each(|v| f(*v));
            f(self.stla);
            f(self.stlo);
            f(self.stel);
            f(self.stdp);
            f(self.evla);
            f(self.evlo);
            f(self.evel);
            f(self.evdp);
            f(self.mag);
            self.user.iter().for_each(|v| f(*v));
            f(self.dist);
            f(self.az);
            f(self.baz);
            f(self.gcarc);
            f(self.internal2);
            f(self.internal3);
            f(self.depmen);
            f(self.cmpaz);
            f(self.cmpinc);
            f(self.xminimum);
            f(self.xmaximum);
            f(self.yminimum);
            f(self.ymaximum);
            (0..FLOAT_RESERVED).for_each(|_| f(None)); // резерв
        }

        {
            let mut i = |v: Option<i32>| write_i32_local(&mut buf, &mut off, endian, i32::to_raw(v));

            i(self.nzyear);
            i(self.nzjday);
            i(self.nzhour);
            i(self.nzmin);
            i(self.nzsec);
            i(self.nzmsec);
            i(self.nvhdr);
            i(self.norid);
            i(self.nevid);
            i(self.npts);
            i(self.internal4);
            i(self.nwfid);
            i(self.nxsize);
            i(self.nysize);
            i(None); // резерв
            i(self.iftype);
            i(self.idep);
            i(self.iztype);
            i(None); // резерв
            i(self.iinst);
            i(self.istreg);
            i(self.ievreg);
            i(self.ievtyp);
            i(self.iqual);
            i(self.isynth);
            i(self.imagtyp);
            i(self.imagsrc);
            (0..8).for_each(|_| i(None)); // резерв
            i(self.leven);
            i(self.lpspol);
            i(self.lovrok);
            i(self.lcalda);
            i(None); // резерв
        }

        let w = SAC_TEXT_WIDTH;
        write_text_local(&mut buf, &mut off, w, false, "kstnm", self.kstnm.as_deref())?;
        write_text_local(&mut buf, &mut off, SAC_KEVNM_WIDTH, true, "kevnm", self.kevnm.as_deref())?;
        write_text_local(&mut buf, &mut off, w, false, "khole", self.khole.as_deref())?;
        write_text_local(&mut buf, &mut off, w, false, "ko", self.ko.as_deref())?;
        write_text_local(&mut buf, &mut off, w, false, "ka", self.ka.as_deref())?;
        for kt in &self.kt {
            write_text_local(&mut buf, &mut off, w, false, "kt", kt.as_deref())?;
        }
        write_text_local(&mut buf, &mut off, w, false, "kf", self.kf.as_deref())?;
        for kuser in &self.kuser {
            write_text_local(&mut buf, &mut off, w, false, "kuser", kuser.as_deref())?;
        }
        write_text_local(&mut buf, &mut off, w, false, "kcmpnm", self.kcmpnm.as_deref())?;
        write_text_local(&mut buf, &mut off, w, false, "knetwk", self.knetwk.as_deref())?;
        write_text_local(&mut buf, &mut off, w, false, "kdatrd", self.kdatrd.as_deref())?;
        write_text_local(&mut buf, &mut off, w, false, "kinst", self.kinst.as_deref())?;

        debug_assert_eq!(off, SAC_HEADER_SIZE);

        Ok(buf)
    }

    fn deserialize(
        buf: &[u8; SAC_HEADER_SIZE],
        endian: Endian,
    ) -> SacResult<Self> {
        let mut off = 0;

        let mut f = || f32::from_raw(read_f32_local(buf, &mut off, endian));

        let delta = f();
        let depmin = f();
        let depmax = f();
        let scale = f();
        let odelta = f();
        let b = f();
        let e = f();
        let o = f();
        let a = f();
        let internal1 = f();
        let t: [Option<f32>; SAC_ARRIVAL_SLOTS] = std::array::from_fn(|_| f());
        let f_ = f();
        let resp: [Option<f32>; SAC_USER_SLOTS] = std::array::from_fn(|_| f());
        let stla = f();
        let stlo = f();
        let stel = f();
        let stdp = f();
        let evla = f();
        let evlo = f();
        let evel = f();
        let evdp = f();
        let mag = f();
        let user: [Option<f32>; SAC_USER_SLOTS] = std::array::from_fn(|_| f());
        let dist = f();
        let az = f();
        let baz = f();
        let gcarc = f();
        let internal2 = f();
        let internal3 = f();
        let depmen = f();
        let cmpaz = f();
        let cmpinc = f();
        let xminimum = f();
        let xmaximum = f();
        let yminimum = f();
        let ymaximum = f();

        off += FLOAT_RESERVED * 4; // резерв

        let mut i = |skip: usize| {
            off += skip * 4;
            i32::from_raw(read_i32_local(buf, &mut off, endian))
        };

        let nzyear = i(0);
        let nzjday = i(0);
        let nzhour = i(0);
        let nzmin = i(0);
        let nzsec = i(0);
        let nzmsec = i(0);
        let nvhdr = i(0);
        let norid = i(0);
        let nevid = i(0);
        let npts = i(0);
        let internal4 = i(0);
        let nwfid = i(0);
        let nxsize = i(0);
        let nysize = i(0);
        let iftype = i(1);
        let idep = i(0);
        let iztype = i(0);
        let iinst = i(1);
        let istreg = i(0);
        let ievreg = i(0);
        let ievtyp = i(0);
        let iqual = i(0);
        let isynth = i(0);
        let imagtyp = i(0);
        let imagsrc = i(0);
        let leven = i(8);
        let lpspol = i(0);
        let lovrok = i(0);
        let lcalda = i(0);

        off += 4; // резерв

        let w = SAC_TEXT_WIDTH;
        let kstnm = read_text_local(buf, &mut off, w, false);
        let kevnm = read_text_local(buf, &mut off, SAC_KEVNM_WIDTH, true);
        let khole = read_text_local(buf, &mut off, w, false);
        let ko = read_text_local(buf, &mut off, w, false);
        let ka = read_text_local(buf, &mut off, w, false);
        let kt: [Option<String>; SAC_ARRIVAL_SLOTS] =
            std::array::from_fn(|_| read_text_local(buf, &mut off, w, false));
        let kf = read_text_local(buf, &mut off, w, false);
        let kuser: [Option<String>; SAC_KUSER_SLOTS] =
            std::array::from_fn(|_| read_text_local(buf, &mut off, w, false));
        let kcmpnm = read_text_local(buf, &mut off, w, false);
        let knetwk = read_text_local(buf, &mut off, w, false);
        let kdatrd = read_text_local(buf, &mut off, w, false);
        let kinst = read_text_local(buf, &mut off, w, false);

        debug_assert_eq!(off, SAC_HEADER_SIZE);

        Ok(SacHeader {
            delta,
            depmin,
            depmax,
            scale,
            odelta,
            b,
            e,
            o,
            a,
            internal1,
            t,
            f: f_,
            resp,
            stla,
            stlo,
            stel,
            stdp,
            evla,
            evlo,
            evel,
            evdp,
            mag,
            user,
            dist,
            az,
            baz,
            gcarc,
            internal2,
            internal3,
            depmen,
            cmpaz,
            cmpinc,
            xminimum,
            xmaximum,
            yminimum,
            ymaximum,
            nzyear,
            nzjday,
            nzhour,
            nzmin,
            nzsec,
            nzmsec,
            nvhdr,
            norid,
            nevid,
            npts,
            internal4,
            nwfid,
            nxsize,
            nysize,
            iftype,
            idep,
            iztype,
            iinst,
            istreg,
            ievreg,
            ievtyp,
            iqual,
            isynth,
            imagtyp,
            imagsrc,
            leven,
            lpspol,
            lovrok,
            lcalda,
            kstnm,
            kevnm,
            khole,
            ko,
            ka,
            kt,
            kf,
            kuser,
            kcmpnm,
            knetwk,
            kdatrd,
            kinst,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> SacHeader {
        let mut h = SacHeader::default();
        h.delta = Some(0.01);
        h.b = Some(0.0);
        h.npts = Some(100);
        h.o = Some(0.5);
        h.t[3] = Some(12.5);
        h.user[9] = Some(-1.0);
        h.nzyear = Some(2011);
        h.nzjday = Some(70);
        h.leven = Some(1);
        h.lcalda = Some(0);
        h.kstnm = Some("SSB".into());
        h.kevnm = Some("TOHOKU OKI".into());
        h.kt[0] = Some("P".into());
        h.kuser[2] = Some("abc".into());
        h.kinst = Some("STS1".into());
        h
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(SAC_FLOAT_WORDS * 4 + SAC_INT_WORDS * 4 + 8 * 22 + 16, SAC_HEADER_SIZE);
        assert_eq!(SAC_NPTS_OFFSET, SAC_FLOAT_WORDS * 4 + 9 * 4);
    }

    #[test]
    fn test_header_round_trip() {
        let h = sample_header();
        for endian in [Endian::Little, Endian::Big] {
            let bytes = h.serialize(endian).unwrap();
            let back = SacHeader::deserialize(&bytes, endian).unwrap();
            assert_eq!(back, h);
        }
    }

    #[test]
    fn test_header_byte_layout() {
        let h = sample_header();
        let bytes = h.serialize(Endian::Big).unwrap();

        // delta в начале
        assert_eq!(&bytes[0..4], &0.01f32.to_be_bytes());
        // npts = 100 по смещению 316
        assert_eq!(&bytes[316..320], &100i32.to_be_bytes());
        // nvhdr = 6 за три слова до npts
        assert_eq!(&bytes[304..308], &6i32.to_be_bytes());
        // резервные float заполнены -12345.0
        for k in 0..7 {
            let off = 252 + 4 * k;
            assert_eq!(&bytes[off..off + 4], &(-12345.0f32).to_be_bytes());
        }
        // iftype сразу после первого резервного слова
        assert_eq!(&bytes[340..344], &1i32.to_be_bytes());
        // kstnm с дополнением пробелами
        assert_eq!(&bytes[440..448], b"SSB     ");
        // kevnm — 16 байт
        assert_eq!(&bytes[448..464], b"TOHOKU OKI      ");
        // незаданный khole
        assert_eq!(&bytes[464..472], b"-12345  ");
        // kinst — последнее поле
        assert_eq!(&bytes[624..632], b"STS1    ");
    }

    #[test]
    fn test_text_trimming() {
        let mut h = SacHeader::default();
        h.kstnm = Some("AB".into());
        let mut bytes = h.serialize(Endian::Little).unwrap();

        // «AB CD» в kstnm обрезается на пробеле, в kevnm — сохраняется
        bytes[440..448].copy_from_slice(b"AB CD   ");
        bytes[448..464].copy_from_slice(b"GREAT QUAKE\0\0\0\0\0");

        let back = SacHeader::deserialize(&bytes, Endian::Little).unwrap();
        assert_eq!(back.kstnm.as_deref(), Some("AB"));
        assert_eq!(back.kevnm.as_deref(), Some("GREAT QUAKE"));
    }

    #[test]
    fn test_text_too_long() {
        let mut h = SacHeader::default();
        h.kcmpnm = Some("TOOLONGNAME".into());

        let err = h.serialize(Endian::Little).unwrap_err();
        assert!(matches!(
            err,
            SacError::TextTooLong {
                field: "kcmpnm",
                width: 8
            }
        ));
    }

    #[test]
    fn test_text_internal_space_rejected() {
        let mut h = SacHeader::default();
        h.kstnm = Some("AB CD".into());
        assert!(matches!(
            h.serialize(Endian::Little),
            Err(SacError::TextSeparator { field: "kstnm" })
        ));

        h.kstnm = Some("AB".into());
        h.kt[4] = Some("P\0".into());
        assert!(matches!(
            h.serialize(Endian::Big),
            Err(SacError::TextSeparator { field: "kt" })
        ));

        // kevnm хранит внутренние пробелы
        h.kt[4] = None;
        h.kevnm = Some("GREAT QUAKE".into());
        let bytes = h.serialize(Endian::Little).unwrap();
        let back = SacHeader::deserialize(&bytes, Endian::Little).unwrap();
        assert_eq!(back.kevnm.as_deref(), Some("GREAT QUAKE"));
        assert_eq!(back.kstnm.as_deref(), Some("AB"));
    }

    #[test]
    fn test_detect_byte_order() {
        let mut h = SacHeader::default();
        h.npts = Some(100);
        let size = expected_file_size(100) as u64;

        for endian in [Endian::Little, Endian::Big] {
            let bytes = h.serialize(endian).unwrap();
            assert_eq!(detect_byte_order(&bytes, size).unwrap(), endian);
        }
    }

    #[test]
    fn test_detect_byte_order_corrupted() {
        let mut h = SacHeader::default();
        h.npts = Some(100);
        let bytes = h.serialize(Endian::Little).unwrap();

        let err = detect_byte_order(&bytes, 1000).unwrap_err();
        assert!(matches!(err, SacError::FormatCorruption { .. }));
        assert!(err.to_string().contains("inconsistent"));
    }

    #[test]
    fn test_detect_byte_order_truncated() {
        let err = detect_byte_order(&[0u8; 100], 100).unwrap_err();
        assert!(matches!(err, SacError::Truncated { .. }));
    }

    #[test]
    fn test_sentinel_conversion() {
        assert_eq!(f32::from_raw(-12345.0), None);
        assert_eq!(f32::from_raw(1.5), Some(1.5));
        assert_eq!(i32::to_raw(None), -12345);
        assert_eq!(i32::to_raw(Some(7)), 7);
    }
}
