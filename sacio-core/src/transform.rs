//! Преобразования записи: интегрирование, дополнение нулями, sinc-интерполяция
//! и переход в частотную область и обратно.
//!
//! Все операции требуют непустой записи ([`Record::is_empty`]) и либо
//! выполняются целиком, либо оставляют запись без изменений.

use std::f64::consts::PI;

use log::debug;
use rustfft::{num_complex::Complex, FftPlanner};
use sacio_types::{Domain, SacError, SacResult};

use crate::{Record, Samples};

/// Наибольшее число отсчётов, которое может получить преобразование:
/// `npts` хранится в заголовке как `i32`.
pub const SAC_MAX_NPTS: usize = i32::MAX as usize;

impl Record {
    /// Интегрирование методом трапеций.
    ///
    /// Длина уменьшается на единицу, `b` сдвигается на `delta / 2`.
    pub fn integrate(&mut self) -> SacResult<()> {
        self.ensure_not_empty()?;
        let w = self.time_data()?;
        let delta = self.delta() as f64;

        let w0 = w[0] as f64;
        let mut cumsum = w0;
        let mut out = Vec::with_capacity(w.len() - 1);

        for &wk in &w[1..] {
            let wk = wk as f64;
            cumsum += wk;
            out.push(((2.0 * cumsum - (w0 + wk)) * delta / 2.0) as f32);
        }

        let b = self.header().b.unwrap_or(0.0) + self.delta() / 2.0;
        self.header_mut_raw().b = Some(b);
        self.set_data(out);

        Ok(())
    }

    /// Дополняет запись нулями так, чтобы она покрывала `[tmin, tmax]`
    /// относительно времени в очаге `o`.
    ///
    /// Если запись уже покрывает интервал, ничего не меняется.
    pub fn pad(
        &mut self,
        tmin: Option<f32>,
        tmax: Option<f32>,
    ) -> SacResult<()> {
        self.ensure_not_empty()?;
        let data = self.time_data()?;
        let o = self.header().o.ok_or(SacError::MissingOriginTime)?;

        let delta = self.delta();
        if !(delta.is_finite() && delta > 0.0) {
            return Err(SacError::invalid_parameter(format!(
                "padding needs a positive sample step, got {delta}"
            )));
        }

        let b = self.header().b.unwrap_or(0.0);
        let e = self.header().e.unwrap_or(b);
        let tb = b - o;
        let te = e - o;

        let nbeg = match tmin {
            Some(tmin) if tmin < tb => sample_count(((tb - tmin) / delta).ceil() as f64)?,
            _ => 0,
        };
        let nend = match tmax {
            Some(tmax) if tmax > te => sample_count(((tmax - te) / delta).ceil() as f64)?,
            _ => 0,
        };

        if nbeg == 0 && nend == 0 {
            return Ok(());
        }

        let total = nbeg
            .checked_add(data.len())
            .and_then(|n| n.checked_add(nend))
            .filter(|&n| n <= SAC_MAX_NPTS)
            .ok_or_else(|| {
                SacError::invalid_parameter(format!(
                    "padded length exceeds {SAC_MAX_NPTS} samples"
                ))
            })?;

        debug!("Padding {nbeg} samples before and {nend} after");

        let mut padded = Vec::with_capacity(total);
        padded.resize(nbeg, 0.0);
        padded.extend_from_slice(data);
        padded.resize(total, 0.0);

        self.header_mut_raw().b = Some(b - nbeg as f32 * delta);
        self.set_data(padded);

        Ok(())
    }

    /// Передискретизация с новым шагом по формуле Уиттекера–Шеннона.
    ///
    /// Сложность O(npts_new × npts).
    pub fn interpolate(
        &mut self,
        delta_new: f32,
    ) -> SacResult<()> {
        self.ensure_not_empty()?;
        if !(delta_new.is_finite() && delta_new > 0.0) {
            return Err(SacError::invalid_parameter(format!(
                "interpolation step must be positive, got {delta_new}"
            )));
        }

        let data = self.time_data()?;
        let delta = self.delta() as f64;
        let npts = data.len();
        if !(delta.is_finite() && delta > 0.0) {
            return Err(SacError::invalid_parameter(format!(
                "interpolation needs a positive sample step, got {delta}"
            )));
        }
        let npts_new = sample_count(((npts as f64 - 1.0) * delta / delta_new as f64).floor())?;

        let out: Vec<f32> = (0..npts_new)
            .map(|i| {
                let t_new = i as f64 * delta_new as f64;
                data.iter()
                    .enumerate()
                    .map(|(j, &x)| x as f64 * sinc((t_new - j as f64 * delta) / delta))
                    .sum::<f64>() as f32
            })
            .collect();

        debug!("Interpolated {npts} → {npts_new} samples (delta {delta} → {delta_new})");

        self.header_mut_raw().delta = Some(delta_new);
        self.set_data(out);

        Ok(())
    }

    /// Полуспектр записи (`npts / 2 + 1` отсчётов) как новая запись в
    /// частотной области. Исходная запись не изменяется.
    pub fn fft(&self) -> SacResult<Record> {
        self.ensure_not_empty()?;
        let data = self.time_data()?;

        let input: Vec<f64> = data.iter().map(|&x| x as f64).collect();
        let spectrum = rfft(&input);

        let mut out = self.clone();
        out.replace_samples(Samples::Spectrum(spectrum));

        Ok(out)
    }

    /// Обратное преобразование полуспектра в новую запись во временной
    /// области.
    ///
    /// Длина восстанавливается по `npts` заголовка; если он не согласуется с
    /// длиной спектра, берётся `2 * (len - 1)`.
    pub fn ifft(&self) -> SacResult<Record> {
        self.ensure_not_empty()?;
        let spectrum = match self.samples() {
            Samples::Spectrum(v) => v,
            Samples::Time(_) => return Err(SacError::domain(Domain::Frequency, Domain::Time)),
        };

        let npts = self.npts();
        let n = if npts / 2 + 1 == spectrum.len() {
            npts
        } else {
            2 * (spectrum.len() - 1)
        };
        if n == 0 {
            return Err(SacError::MissingRequiredFields);
        }

        let data: Vec<f32> = irfft(spectrum, n).into_iter().map(|x| x as f32).collect();

        let mut out = self.clone();
        out.set_data(data);

        Ok(out)
    }

    /// Частоты бинов полуспектра для текущих `npts` и `delta`.
    pub fn freq(&self) -> SacResult<Vec<f64>> {
        self.ensure_not_empty()?;
        Ok(rfft_freqs(self.npts(), self.delta() as f64))
    }
}

/// Число отсчётов из дробной оценки; вне `0..=SAC_MAX_NPTS` — ошибка.
fn sample_count(estimate: f64) -> SacResult<usize> {
    if !(estimate.is_finite() && (0.0..=SAC_MAX_NPTS as f64).contains(&estimate)) {
        return Err(SacError::invalid_parameter(format!(
            "resulting length {estimate} is outside 0..={SAC_MAX_NPTS} samples"
        )));
    }
    Ok(estimate as usize)
}

/// Нормированный sinc: `sin(πx) / (πx)`, `sinc(0) = 1`.
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Частоты `k / (n * d)` для `k = 0..=n/2`.
pub fn rfft_freqs(
    n: usize,
    d: f64,
) -> Vec<f64> {
    let n_freq = n / 2 + 1;
    (0..n_freq).map(|k| k as f64 / (n as f64 * d)).collect()
}

/// Прямое БПФ вещественного сигнала, полуспектр длиной `n / 2 + 1`.
pub(crate) fn rfft(x: &[f64]) -> Vec<Complex<f64>> {
    let n = x.len();
    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buf: Vec<Complex<f64>> = x.iter().map(|&v| Complex::new(v, 0.0)).collect();
    fft.process(&mut buf);

    buf.truncate(n / 2 + 1);
    buf
}

/// Обратное БПФ полуспектра в вещественный сигнал длиной `n`.
///
/// Недостающие бины считаются нулевыми, лишние отбрасываются.
pub(crate) fn irfft(
    half: &[Complex<f64>],
    n: usize,
) -> Vec<f64> {
    let mut planner = FftPlanner::<f64>::new();
    let ifft = planner.plan_fft_inverse(n);
    let mut buf = vec![Complex::new(0.0, 0.0); n];

    let n_freq = n / 2 + 1;
    let copied = n_freq.min(half.len());
    buf[..copied].copy_from_slice(&half[..copied]);

    // эрмитова симметрия
    for k in 1..n.div_ceil(2) {
        buf[n - k] = buf[k].conj();
    }

    ifft.process(&mut buf);
    let scale = 1.0 / n as f64;
    buf.into_iter().map(|c| c.re * scale).collect()
}
