//! Применение внешних цифровых фильтров к записи.
//!
//! Коэффициенты проектируются вне крейта; здесь только их применение.

use log::debug;
use sacio_types::{SacError, SacResult};

use crate::Record;

/// Максимальный коэффициент прореживания одной ступени.
pub const MAX_DECIMATION_FACTOR: usize = 5;

/// Цифровой фильтр над вещественной последовательностью.
pub trait SampleFilter {
    /// Возвращает отфильтрованную последовательность той же длины.
    fn apply(
        &self,
        samples: &[f64],
    ) -> Vec<f64>;
}

/// Каскад биквадратных секций (direct form II transposed).
///
/// Каждая секция задаётся как `[b0, b1, b2, a0, a1, a2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SosCascade {
    sections: Vec<[f64; 6]>,
}

/// Ступень прореживания: КИХ-фильтр и коэффициент.
#[derive(Debug, Clone, PartialEq)]
pub struct FirStage {
    pub factor: usize,
    pub taps: Vec<f64>,
}

impl SosCascade {
    /// Нормирует секции на `a0`; секция с `a0 == 0` недопустима.
    pub fn new(sections: Vec<[f64; 6]>) -> SacResult<Self> {
        let sections = sections
            .into_iter()
            .enumerate()
            .map(|(i, [b0, b1, b2, a0, a1, a2])| {
                if a0 == 0.0 || !a0.is_finite() {
                    return Err(SacError::invalid_parameter(format!(
                        "section {i}: a0 must be non-zero"
                    )));
                }
                Ok([b0 / a0, b1 / a0, b2 / a0, 1.0, a1 / a0, a2 / a0])
            })
            .collect::<SacResult<Vec<_>>>()?;

        Ok(Self { sections })
    }

    pub fn sections(&self) -> &[[f64; 6]] {
        &self.sections
    }
}

impl SampleFilter for SosCascade {
    fn apply(
        &self,
        samples: &[f64],
    ) -> Vec<f64> {
        let mut out = samples.to_vec();

        for &[b0, b1, b2, _, a1, a2] in &self.sections {
            let (mut z1, mut z2) = (0.0, 0.0);
            for x in out.iter_mut() {
                let y = b0 * *x + z1;
                z1 = b1 * *x - a1 * y + z2;
                z2 = b2 * *x - a2 * y;
                *x = y;
            }
        }

        out
    }
}

impl FirStage {
    pub fn new(
        factor: usize,
        taps: Vec<f64>,
    ) -> Self {
        Self { factor, taps }
    }

    fn validate(&self) -> SacResult<()> {
        if self.factor == 0 || self.factor > MAX_DECIMATION_FACTOR {
            return Err(SacError::invalid_parameter(format!(
                "decimation factor must be in 1..={MAX_DECIMATION_FACTOR}, got {}",
                self.factor
            )));
        }
        if self.taps.is_empty() {
            return Err(SacError::invalid_parameter("FIR stage has no taps"));
        }

        Ok(())
    }

    /// Фильтрует с центрированным окном и оставляет каждый `factor`-й отсчёт.
    fn run(
        &self,
        samples: &[f64],
    ) -> Vec<f64> {
        let n = samples.len() as isize;
        let half = (self.taps.len() / 2) as isize;

        (0..samples.len())
            .step_by(self.factor)
            .map(|i| {
                self.taps
                    .iter()
                    .enumerate()
                    .filter_map(|(k, &h)| {
                        let j = i as isize + half - k as isize;
                        (0..n).contains(&j).then(|| h * samples[j as usize])
                    })
                    .sum()
            })
            .collect()
    }
}

impl Record {
    /// Применяет фильтр к отсчётам во времени.
    pub fn filter(
        &mut self,
        filter: &dyn SampleFilter,
    ) -> SacResult<()> {
        self.ensure_not_empty()?;
        let data = self.time_data()?;

        let input: Vec<f64> = data.iter().map(|&x| x as f64).collect();
        let output = filter.apply(&input);
        if output.len() != input.len() {
            return Err(SacError::LengthMismatch {
                expected: input.len(),
                found: output.len(),
            });
        }

        self.set_data(output.into_iter().map(|x| x as f32).collect());

        Ok(())
    }

    /// Многоступенчатое прореживание; ступени с `factor == 1` пропускаются.
    pub fn decimate(
        &mut self,
        stages: &[FirStage],
    ) -> SacResult<()> {
        self.ensure_not_empty()?;
        for stage in stages {
            stage.validate()?;
        }

        let mut work: Vec<f64> = self.time_data()?.iter().map(|&x| x as f64).collect();
        let mut delta = self.delta();

        for stage in stages.iter().filter(|s| s.factor > 1) {
            work = stage.run(&work);
            delta *= stage.factor as f32;
            debug!(
                "Decimated by {} to {} samples ({} taps)",
                stage.factor,
                work.len(),
                stage.taps.len()
            );
        }

        self.header_mut_raw().delta = Some(delta);
        self.set_data(work.into_iter().map(|x| x as f32).collect());

        Ok(())
    }
}
