use log::{debug, warn};
use sacio_types::{Domain, SacError, SacHeader, SacResult};

use crate::{
    binary::{read::read_samples_local, write::write_samples_local},
    detect_byte_order, ReadOptions, Record, SacHeaderExt, Samples, WriteOptions, SAC_HEADER_SIZE,
    SAC_SAMPLE_SIZE,
};

impl Record {
    /// Декодирует запись из содержимого SAC файла.
    ///
    /// Порядок байт определяется автоматически; длина `bytes` должна быть
    /// ровно `632 + 4 * npts`.
    pub fn decode(
        bytes: &[u8],
        opts: &ReadOptions,
    ) -> SacResult<Self> {
        let (header, endian) = decode_header(bytes, bytes.len() as u64)?;

        if opts.header_only {
            return Ok(Record::header_only(header));
        }

        let count = samples_to_read(&header, opts.npts);
        let end = SAC_HEADER_SIZE + count * SAC_SAMPLE_SIZE;
        let data = read_samples_local(&bytes[SAC_HEADER_SIZE..end], endian);

        Ok(Record::from_parts(header, Samples::Time(data)))
    }

    /// Кодирует запись в байты SAC файла.
    ///
    /// Производные поля заголовка пересчитываются по текущему буферу. Спектр
    /// сохранить нельзя.
    pub fn encode(
        &self,
        opts: &WriteOptions,
    ) -> SacResult<Vec<u8>> {
        let header = self.persistable_header()?;
        let data = self.time_data()?;

        let mut out = Vec::with_capacity(SAC_HEADER_SIZE + data.len() * SAC_SAMPLE_SIZE);
        out.extend_from_slice(&header.serialize(opts.byte_order)?);
        out.extend_from_slice(&write_samples_local(data, opts.byte_order));

        debug!(
            "Encoded {} samples ({} bytes, {}-endian)",
            data.len(),
            out.len(),
            opts.byte_order
        );

        Ok(out)
    }

    /// Заголовок для записи на диск.
    pub(crate) fn persistable_header(&self) -> SacResult<SacHeader> {
        self.ensure_domain(Domain::Time)?;

        if self.is_header_only() {
            return Err(SacError::MissingRequiredFields);
        }

        // Инварианты уже выполнены мутаторами, но пересчитываем на копии —
        // на диск всегда уходят согласованные значения.
        let mut copy = self.clone();
        copy.refresh_derived();

        Ok(copy.header().clone())
    }
}

/// Разбирает заголовок: определяет порядок байт, нормализует `khole` и
/// пересчитывает `e`.
pub(crate) fn decode_header(
    bytes: &[u8],
    file_size: u64,
) -> SacResult<(SacHeader, crate::Endian)> {
    if bytes.len() < SAC_HEADER_SIZE {
        return Err(SacError::Truncated {
            needed: SAC_HEADER_SIZE,
            found: bytes.len(),
        });
    }

    let endian = detect_byte_order(bytes, file_size)?;

    let mut buf = [0u8; SAC_HEADER_SIZE];
    buf.copy_from_slice(&bytes[..SAC_HEADER_SIZE]);

    let mut header = SacHeader::deserialize(&buf, endian)?;
    header.e = header.expected_end();
    header.normalize_hole();

    Ok((header, endian))
}

/// Количество отсчётов к чтению с учётом ограничения из [`ReadOptions`].
pub(crate) fn samples_to_read(
    header: &SacHeader,
    requested: Option<usize>,
) -> usize {
    let declared = header.npts.map_or(0, |n| n.max(0) as usize);

    match requested {
        Some(n) if n <= declared => {
            debug!("Reading {n} of {declared} samples");
            n
        }
        Some(n) => {
            warn!("Requested {n} samples but file holds {declared}; reading all");
            declared
        }
        None => declared,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Endian;

    fn ramp_record(n: usize) -> Record {
        let data = (0..n).map(|i| i as f32 * 0.5 - 3.0).collect();
        let mut r = Record::from_samples(data, 0.01, 0.0);
        r.edit_header(|h| {
            h.kstnm = Some("SSB".into());
            h.knetwk = Some("G".into());
            h.kcmpnm = Some("BHZ".into());
            h.o = Some(0.5);
        });
        r
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let r = ramp_record(100);
        let bytes = r.encode(&WriteOptions::default()).unwrap();
        assert_eq!(bytes.len(), 632 + 4 * 100);

        let back = Record::decode(&bytes, &ReadOptions::default()).unwrap();
        assert_eq!(back.data(), r.data());
        assert_eq!(back.header().o, Some(0.5));
        assert_eq!(back.header().npts, Some(100));
        assert_eq!(back.header().khole.as_deref(), Some("--"));
        assert_eq!(back.id(), "G_SSB_--_BHZ");
    }

    #[test]
    fn test_decode_both_byte_orders() {
        let r = ramp_record(100);
        let le = r.encode(&WriteOptions::with_byte_order(Endian::Little)).unwrap();
        let be = r.encode(&WriteOptions::with_byte_order(Endian::Big)).unwrap();
        assert_ne!(le, be);

        let a = Record::decode(&le, &ReadOptions::default()).unwrap();
        let b = Record::decode(&be, &ReadOptions::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_rejects_inconsistent_length() {
        let r = ramp_record(10);
        let mut bytes = r.encode(&WriteOptions::default()).unwrap();
        bytes.push(0);

        let err = Record::decode(&bytes, &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, SacError::FormatCorruption { .. }));
    }

    #[test]
    fn test_decode_truncated() {
        let err = Record::decode(&[0u8; 64], &ReadOptions::default()).unwrap_err();
        assert!(matches!(err, SacError::Truncated { .. }));
    }

    #[test]
    fn test_decode_header_only() {
        let r = ramp_record(50);
        let bytes = r.encode(&WriteOptions::default()).unwrap();

        let h = Record::decode(&bytes, &ReadOptions::header_only()).unwrap();
        assert!(h.is_header_only());
        assert_eq!(h.len(), 0);
        assert_eq!(h.header().npts, Some(50));
        assert_eq!(h.header().e, r.header().e);
        assert!(h.is_empty());
    }

    #[test]
    fn test_decode_npts_clamp() {
        let r = ramp_record(20);
        let bytes = r.encode(&WriteOptions::default()).unwrap();

        let part = Record::decode(&bytes, &ReadOptions::new().with_npts(5)).unwrap();
        assert_eq!(part.header().npts, Some(5));
        assert_eq!(part.data().unwrap(), &r.data().unwrap()[..5]);
        assert_eq!(part.header().depmax, Some(-1.0));

        // вне диапазона — читается всё
        let all = Record::decode(&bytes, &ReadOptions::new().with_npts(21)).unwrap();
        assert_eq!(all.len(), 20);
    }

    #[test]
    fn test_encode_recomputes_derived_fields() {
        let r = ramp_record(8);
        let bytes = r.encode(&WriteOptions::default()).unwrap();
        let back = Record::decode(&bytes, &ReadOptions::default()).unwrap();

        assert_eq!(back.header().depmin, Some(-3.0));
        assert_eq!(back.header().depmax, Some(0.5));
        assert_eq!(back.header().e, back.header().expected_end());
    }

    #[test]
    fn test_encode_rejects_spectrum() {
        let spectrum = ramp_record(16).fft().unwrap();
        let err = spectrum.encode(&WriteOptions::default()).unwrap_err();
        assert!(matches!(err, SacError::DomainState { .. }));
    }

    #[test]
    fn test_encode_rejects_header_only() {
        let bytes = ramp_record(4).encode(&WriteOptions::default()).unwrap();
        let h = Record::decode(&bytes, &ReadOptions::header_only()).unwrap();

        assert!(matches!(
            h.encode(&WriteOptions::default()),
            Err(SacError::MissingRequiredFields)
        ));
    }
}
