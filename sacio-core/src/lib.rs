//! Библиотека формата SAC
//!
//! Кодек файлов SAC (Seismic Analysis Code), модель записи с согласованными
//! производными полями заголовка и преобразования сейсмограмм.
//!
//! # Быстрый старт
//!
//! ```no_run
//! use sacio_core::{read_sac, write_sac, PolesZeros, ReadOptions, WriteOptions};
//!
//! let mut record = read_sac("station.BHZ.sac", &ReadOptions::default())?;
//! record.integrate()?;
//!
//! let pz = PolesZeros::from_pairs(1.0, &[[0.0, 0.0]], &[[-0.037, 0.037], [-0.037, -0.037]]);
//! record.convolve_response(&pz)?;
//!
//! write_sac("station.BHZ.int.sac", &record, &WriteOptions::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod arithmetic;
pub mod binary;
pub mod codec;
pub mod config;
pub mod filter;
pub mod format;
pub mod record;
pub mod response;
pub mod serialization;
pub mod time;
pub mod transform;

pub use arithmetic::*;
pub use config::*;
pub use filter::*;
pub use format::*;
pub use record::*;
pub use response::*;
pub use serialization::*;
pub use time::*;
pub use transform::*;

/// Версия библиотеки.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
