//! Реализация подкоманд `sac-tool`.
//!
//! Каждая команда читает файл, применяет операцию ядра и сохраняет результат
//! согласно [`OutputConfig`].

use std::{fmt::Write as _, path::Path};

use log::info;
use sacio_core::{
    combine, read_sac, write_sac, ArithOp, Operand, PolesZeros, ReadOptions, Record,
};
use sacio_types::{SacHeader, SacResult};

use crate::{OutputConfig, PzFile, RhsOperand, ToolResult};

/// Краткая сводка заголовка или полный заголовок в JSON.
pub fn info(
    input: &Path,
    json: bool,
) -> ToolResult<String> {
    let record = read_sac(input, &ReadOptions::header_only())?;

    if json {
        return Ok(serde_json::to_string_pretty(record.header())?);
    }

    Ok(summary(&record))
}

/// Перекодирует файл в заданный порядок байт.
pub fn convert(
    input: &Path,
    output: &OutputConfig,
) -> ToolResult<()> {
    transform_file(input, output, |_| Ok(()))
}

pub fn integrate(
    input: &Path,
    output: &OutputConfig,
) -> ToolResult<()> {
    transform_file(input, output, Record::integrate)
}

pub fn pad(
    input: &Path,
    tmin: Option<f32>,
    tmax: Option<f32>,
    output: &OutputConfig,
) -> ToolResult<()> {
    transform_file(input, output, |r| r.pad(tmin, tmax))
}

pub fn interpolate(
    input: &Path,
    delta: f32,
    output: &OutputConfig,
) -> ToolResult<()> {
    transform_file(input, output, |r| r.interpolate(delta))
}

/// `lhs op rhs`, где `rhs` — число или другой SAC файл.
pub fn combine_files(
    op: ArithOp,
    lhs: &Path,
    rhs: &RhsOperand,
    output: &OutputConfig,
) -> ToolResult<()> {
    let rhs_record: Record;
    let operand = match rhs {
        RhsOperand::File(path) => {
            rhs_record = read_sac(path, &ReadOptions::default())?;
            Operand::Record(&rhs_record)
        }
        RhsOperand::Scalar(k) => Operand::Scalar(*k),
    };

    transform_file(lhs, output, |r| {
        *r = combine(op, r, operand)?;
        Ok(())
    })?;

    info!("{op} {} {rhs}", lhs.display());

    Ok(())
}

/// Свёртка с откликом из JSON файла полюсов и нулей.
pub fn convresp(
    input: &Path,
    pz_path: &Path,
    output: &OutputConfig,
) -> ToolResult<()> {
    let pz: PolesZeros = PzFile::load(pz_path)?.into();
    info!(
        "Response: constant={}, {} zeros, {} poles",
        pz.constant,
        pz.zeros.len(),
        pz.poles.len()
    );

    transform_file(input, output, |r| r.convolve_response(&pz))
}

fn transform_file<F>(
    input: &Path,
    output: &OutputConfig,
    op: F,
) -> ToolResult<()>
where
    F: FnOnce(&mut Record) -> SacResult<()>,
{
    let mut record = read_sac(input, &ReadOptions::default())?;
    op(&mut record)?;

    let target = output.resolve(input);
    let opts = output.write_options();
    write_sac(target, &record, &opts)?;

    info!(
        "✓ {} → {} ({} samples, {}-endian)",
        input.display(),
        target.display(),
        record.npts(),
        opts.byte_order
    );

    Ok(())
}

fn summary(record: &Record) -> String {
    let h: &SacHeader = record.header();
    let mut out = String::new();

    let opt = |v: Option<f32>| v.map_or_else(|| "-".to_string(), |v| format!("{v}"));

    let _ = writeln!(out, "  Id            : {}", record.id());
    let _ = writeln!(out, "  Samples       : {}", record.npts());
    let _ = writeln!(out, "  Delta         : {}", opt(h.delta));
    let _ = writeln!(out, "  Begin / End   : {} / {}", opt(h.b), opt(h.e));
    let _ = writeln!(out, "  Origin (o)    : {}", opt(h.o));
    let _ = writeln!(
        out,
        "  Amplitude     : {} .. {}",
        opt(h.depmin),
        opt(h.depmax)
    );
    if let Some(kevnm) = &h.kevnm {
        let _ = writeln!(out, "  Event         : {kevnm}");
    }
    if let Ok(reference) = record.reference_time() {
        let _ = writeln!(out, "  Reference     : {reference}");
    }
    for (label, t) in record.arrivals() {
        let _ = writeln!(out, "  Arrival {:<5} : {t}", label.unwrap_or("?"));
    }

    out
}
