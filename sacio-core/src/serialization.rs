use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write},
    path::Path,
};

use log::debug;
use sacio_types::{SacError, SacResult};

use crate::{
    binary::{read::read_samples_local, write::write_samples_local},
    codec::{decode_header, samples_to_read},
    ReadOptions, Record, SacHeaderExt, Samples, WriteOptions, SAC_HEADER_SIZE, SAC_SAMPLE_SIZE,
};

/// Читает SAC файл с диска.
///
/// Файл закрывается при выходе из функции, в том числе при ошибке разбора.
pub fn read_sac<P: AsRef<Path>>(
    path: P,
    opts: &ReadOptions,
) -> SacResult<Record> {
    let path = path.as_ref();
    debug!("Reading {}", path.display());

    let file = File::open(path)?;
    read_from(BufReader::new(file), opts)
}

/// Пишет запись в SAC файл (перезаписывая существующий).
pub fn write_sac<P: AsRef<Path>>(
    path: P,
    record: &Record,
    opts: &WriteOptions,
) -> SacResult<()> {
    let path = path.as_ref();
    debug!("Writing {}", path.display());

    // Проверяем до создания файла, чтобы не оставить пустой файл на диске
    let header = record.persistable_header()?;
    let header_bytes = header.serialize(opts.byte_order)?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(&header_bytes)?;
    writer.write_all(&write_samples_local(
        record.time_data()?,
        opts.byte_order,
    ))?;
    writer.flush()?;

    Ok(())
}

/// Читает запись из произвольного источника с произвольным доступом.
///
/// Размер источника определяется через `seek`; при `header_only` читаются
/// только первые 632 байта, при ограничении `npts` — только нужные отсчёты.
pub fn read_from<R: Read + Seek>(
    mut inner: R,
    opts: &ReadOptions,
) -> SacResult<Record> {
    let file_size = inner.seek(SeekFrom::End(0))?;
    inner.seek(SeekFrom::Start(0))?;

    if file_size < SAC_HEADER_SIZE as u64 {
        return Err(SacError::Truncated {
            needed: SAC_HEADER_SIZE,
            found: file_size as usize,
        });
    }

    let mut hdr_buf = [0u8; SAC_HEADER_SIZE];
    inner.read_exact(&mut hdr_buf)?;

    let (header, endian) = decode_header(&hdr_buf, file_size)?;

    if opts.header_only {
        return Ok(Record::header_only(header));
    }

    let count = samples_to_read(&header, opts.npts);
    let mut raw = vec![0u8; count * SAC_SAMPLE_SIZE];
    inner.read_exact(&mut raw)?;

    Ok(Record::from_parts(
        header,
        Samples::Time(read_samples_local(&raw, endian)),
    ))
}

/// Пишет запись в произвольный приёмник.
pub fn write_to<W: Write>(
    mut inner: W,
    record: &Record,
    opts: &WriteOptions,
) -> SacResult<()> {
    inner.write_all(&record.encode(opts)?)?;
    inner.flush()?;

    Ok(())
}
