//! Отклик прибора в виде полюсов и нулей и свёртка записи с ним.

use std::f64::consts::PI;

use log::debug;
use rustfft::num_complex::Complex;
use sacio_types::SacResult;

use crate::{
    transform::{irfft, rfft},
    Record,
};

/// Передаточная функция `constant · Π(s - z) / Π(s - p)`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PolesZeros {
    pub constant: f64,
    pub zeros: Vec<Complex<f64>>,
    pub poles: Vec<Complex<f64>>,
}

impl PolesZeros {
    pub fn new(
        constant: f64,
        zeros: Vec<Complex<f64>>,
        poles: Vec<Complex<f64>>,
    ) -> Self {
        Self {
            constant,
            zeros,
            poles,
        }
    }

    /// Из пар `[re, im]`.
    pub fn from_pairs(
        constant: f64,
        zeros: &[[f64; 2]],
        poles: &[[f64; 2]],
    ) -> Self {
        let to_complex = |v: &[[f64; 2]]| -> Vec<Complex<f64>> {
            v.iter().map(|&[re, im]| Complex::new(re, im)).collect()
        };

        Self::new(constant, to_complex(zeros), to_complex(poles))
    }

    /// Значение передаточной функции в точке `s` плоскости Лапласа.
    pub fn eval(
        &self,
        s: Complex<f64>,
    ) -> Complex<f64> {
        let mut resp = Complex::new(self.constant, 0.0);
        for z in &self.zeros {
            resp *= s - z;
        }
        for p in &self.poles {
            resp /= s - p;
        }
        resp
    }
}

impl Record {
    /// Отклик на частотах [`Record::freq`], `s = 2πi·f`.
    pub fn eval_response(
        &self,
        pz: &PolesZeros,
    ) -> SacResult<Vec<Complex<f64>>> {
        let freqs = self.freq()?;

        Ok(freqs
            .into_iter()
            .map(|f| pz.eval(Complex::new(0.0, 2.0 * PI * f)))
            .collect())
    }

    /// Свёртка с откликом прибора.
    ///
    /// Из записи вычитается прямая через первый и последний отсчёты, затем
    /// она дополняется нулями до `2e - b` (через [`Record::pad`], поэтому
    /// нужен `o`), умножается на отклик в частотной области и обрезается до
    /// исходной длины.
    pub fn convolve_response(
        &mut self,
        pz: &PolesZeros,
    ) -> SacResult<()> {
        self.ensure_not_empty()?;
        let data = self.time_data()?;
        let npts = data.len();

        let first = data[0] as f64;
        let last = data[npts - 1] as f64;
        let slope = if npts > 1 {
            (last - first) / (npts - 1) as f64
        } else {
            0.0
        };
        let detrended: Vec<f32> = data
            .iter()
            .enumerate()
            .map(|(k, &x)| (x as f64 - (first + k as f64 * slope)) as f32)
            .collect();

        let b = self.header().b.unwrap_or(0.0);
        let e = self.header().e.unwrap_or(b);

        let mut work = self.clone();
        work.set_data(detrended);
        work.pad(None, Some(2.0 * e - b))?;

        let resp = work.eval_response(pz)?;
        let padded = work.time_data()?;
        let n = padded.len();

        let input: Vec<f64> = padded.iter().map(|&x| x as f64).collect();
        let spectrum: Vec<Complex<f64>> = rfft(&input)
            .into_iter()
            .zip(&resp)
            .map(|(x, r)| x * r)
            .collect();

        let out: Vec<f32> = irfft(&spectrum, n)
            .into_iter()
            .take(npts)
            .map(|x| x as f32)
            .collect();

        debug!("Convolved {npts} samples with response (padded to {n})");

        work.set_data(out);
        *self = work;

        Ok(())
    }
}
