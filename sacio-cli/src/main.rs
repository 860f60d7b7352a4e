use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use log::{error, LevelFilter};
use sacio_cli::{
    combine_files, convert, convresp, info, integrate, interpolate, pad, OutputConfig, RhsOperand,
    ToolResult,
};
use sacio_core::{ArithOp, Endian};

#[derive(Parser, Debug)]
#[command(
    name = "sac-tool",
    version = env!("CARGO_PKG_VERSION"),
    about = "Inspect, convert and transform SAC seismograms",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    /// Тихий режим (только ошибки)
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Подробный вывод (отладочные сообщения)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Сводка заголовка
    Info {
        input: PathBuf,
        /// Полный заголовок в JSON
        #[arg(long)]
        json: bool,
    },
    /// Перезаписать файл в другом порядке байт
    Convert {
        input: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Интегрирование методом трапеций
    Integrate {
        input: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Дополнение нулями до [tmin, tmax] относительно времени в очаге
    Pad {
        input: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        tmin: Option<f32>,
        #[arg(long, allow_hyphen_values = true)]
        tmax: Option<f32>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Sinc-передискретизация с новым шагом
    Interpolate {
        input: PathBuf,
        /// Новый шаг дискретизации, с
        #[arg(long)]
        delta: f32,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Поэлементная арифметика: lhs <op> rhs (файл или число)
    Combine {
        /// Операция: add, sub, mul
        #[arg(long)]
        op: ArithOp,
        lhs: PathBuf,
        #[arg(allow_hyphen_values = true)]
        rhs: RhsOperand,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Свёртка с откликом прибора (полюса и нули в JSON)
    Convresp {
        input: PathBuf,
        /// JSON: {"constant": .., "zeros": [[re, im]], "poles": [[re, im]]}
        #[arg(long)]
        pz: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Выходной файл (по умолчанию перезаписывается входной)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Порядок байт: little, big, native
    #[arg(long)]
    endian: Option<Endian>,
}

impl From<OutputArgs> for OutputConfig {
    fn from(args: OutputArgs) -> Self {
        OutputConfig {
            path: args.output,
            byte_order: args.endian,
        }
    }
}

fn run(command: Command) -> ToolResult<()> {
    match command {
        Command::Info { input, json } => {
            println!("{}", info(&input, json)?);
            Ok(())
        }
        Command::Convert { input, output } => convert(&input, &output.into()),
        Command::Integrate { input, output } => integrate(&input, &output.into()),
        Command::Pad {
            input,
            tmin,
            tmax,
            output,
        } => pad(&input, tmin, tmax, &output.into()),
        Command::Interpolate {
            input,
            delta,
            output,
        } => interpolate(&input, delta, &output.into()),
        Command::Combine {
            op,
            lhs,
            rhs,
            output,
        } => combine_files(op, &lhs, &rhs, &output.into()),
        Command::Convresp { input, pz, output } => convresp(&input, &pz, &output.into()),
    }
}

fn main() {
    let cli = Cli::parse();
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();

    if let Err(e) = run(cli.command) {
        error!("{e}");
        std::process::exit(1);
    }
}
