use byteorder::{BigEndian, ByteOrder, LittleEndian};
use sacio_types::SAC_TEXT_UNDEF;

use crate::{Endian, SAC_HEADER_SIZE};

pub fn read_f32_local(
    buf: &[u8; SAC_HEADER_SIZE],
    off: &mut usize,
    endian: Endian,
) -> f32 {
    let b = &buf[*off..*off + 4];
    *off += 4;
    match endian {
        Endian::Little => LittleEndian::read_f32(b),
        Endian::Big => BigEndian::read_f32(b),
    }
}

pub fn read_i32_local(
    buf: &[u8; SAC_HEADER_SIZE],
    off: &mut usize,
    endian: Endian,
) -> i32 {
    let b = &buf[*off..*off + 4];
    *off += 4;
    match endian {
        Endian::Little => LittleEndian::read_i32(b),
        Endian::Big => BigEndian::read_i32(b),
    }
}

/// Читает текстовое поле фиксированной ширины.
///
/// `keep_spaces == false`: обрезается на первом пробеле или NUL.
/// `keep_spaces == true`: отбрасываются только хвостовые пробелы/NUL.
pub fn read_text_local(
    buf: &[u8; SAC_HEADER_SIZE],
    off: &mut usize,
    width: usize,
    keep_spaces: bool,
) -> Option<String> {
    let raw = &buf[*off..*off + width];
    *off += width;

    let is_pad = |c: &u8| *c == b' ' || *c == 0;
    let end = if keep_spaces {
        raw.iter().rposition(|c| !is_pad(c)).map_or(0, |p| p + 1)
    } else {
        raw.iter().position(is_pad).unwrap_or(width)
    };

    let text = String::from_utf8_lossy(&raw[..end]).into_owned();
    if text == SAC_TEXT_UNDEF {
        None
    } else {
        Some(text)
    }
}

/// Декодирует отсчёты (4-байтные float) в заданном порядке байт.
pub fn read_samples_local(
    data: &[u8],
    endian: Endian,
) -> Vec<f32> {
    let mut out = vec![0.0f32; data.len() / 4];
    let src = &data[..out.len() * 4];
    match endian {
        Endian::Little => LittleEndian::read_f32_into(src, &mut out),
        Endian::Big => BigEndian::read_f32_into(src, &mut out),
    }
    out
}
