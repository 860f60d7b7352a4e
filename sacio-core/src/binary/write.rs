use byteorder::{BigEndian, ByteOrder, LittleEndian};
use sacio_types::{SacError, SacResult, SAC_TEXT_UNDEF};

use crate::{Endian, SAC_HEADER_SIZE};

pub fn write_f32_local(
    buf: &mut [u8; SAC_HEADER_SIZE],
    off: &mut usize,
    endian: Endian,
    val: f32,
) {
    let b = &mut buf[*off..*off + 4];
    match endian {
        Endian::Little => LittleEndian::write_f32(b, val),
        Endian::Big => BigEndian::write_f32(b, val),
    }
    *off += 4;
}

pub fn write_i32_local(
    buf: &mut [u8; SAC_HEADER_SIZE],
    off: &mut usize,
    endian: Endian,
    val: i32,
) {
    let b = &mut buf[*off..*off + 4];
    match endian {
        Endian::Little => LittleEndian::write_i32(b, val),
        Endian::Big => BigEndian::write_i32(b, val),
    }
    *off += 4;
}

/// Пишет текстовое поле, дополняя пробелами до `width`. `None` пишется как
/// `-12345`.
///
/// При `keep_spaces == false` пробел или NUL внутри значения отвергается:
/// чтение обрезает такие поля на первом разделителе.
pub fn write_text_local(
    buf: &mut [u8; SAC_HEADER_SIZE],
    off: &mut usize,
    width: usize,
    keep_spaces: bool,
    field: &'static str,
    val: Option<&str>,
) -> SacResult<()> {
    let text = val.unwrap_or(SAC_TEXT_UNDEF).as_bytes();
    if text.len() > width {
        return Err(SacError::TextTooLong { field, width });
    }
    if !keep_spaces && text.iter().any(|&c| c == b' ' || c == 0) {
        return Err(SacError::TextSeparator { field });
    }

    let dst = &mut buf[*off..*off + width];
    dst.fill(b' ');
    dst[..text.len()].copy_from_slice(text);
    *off += width;

    Ok(())
}

/// Кодирует отсчёты в 4-байтные float заданного порядка байт.
pub fn write_samples_local(
    data: &[f32],
    endian: Endian,
) -> Vec<u8> {
    let mut out = vec![0u8; data.len() * 4];
    match endian {
        Endian::Little => LittleEndian::write_f32_into(data, &mut out),
        Endian::Big => BigEndian::write_f32_into(data, &mut out),
    }
    out
}
