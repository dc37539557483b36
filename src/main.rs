use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tank_filling_curve::app::{self, AppError, RunOptions};
use tank_filling_curve::export::DecimalSeparator;
use tank_filling_curve::{config, i18n, logging};

/// 접시형 경판 용기의 액위-용적 표(충전 곡선)를 계산한다.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// vertical | horizontal
    #[arg(long)]
    vessel: Option<String>,

    /// din28011 | din28013
    #[arg(long)]
    head: Option<String>,

    /// Outer diameter [mm]
    #[arg(long)]
    diameter: Option<String>,

    /// Wall thickness [mm]
    #[arg(long)]
    wall: Option<String>,

    /// Overall length [mm]
    #[arg(long)]
    length: Option<String>,

    /// Integration step [mm], must divide 10 mm
    #[arg(long)]
    step: Option<f64>,

    /// Write the table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Decimal separator for CSV volumes (point | comma), defaults to the locale
    #[arg(long)]
    separator: Option<DecimalSeparator>,

    /// UI language: auto | en | de | ko
    #[arg(long, default_value = "auto")]
    lang: String,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// 프로그램의 엔트리 포인트. 설정을 로드한 뒤 한 번 계산한다.
fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    match try_run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            if err.is_validation() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn try_run(cli: Cli) -> Result<(), AppError> {
    let mut cfg = config::load_or_default()?;
    let lang = i18n::resolve_language(&cli.lang, Some(cfg.language.as_str()));
    let tr = i18n::Translator::new_with_pack(&lang, cfg.locale_dir.as_deref());

    let options = RunOptions {
        vessel: cli.vessel,
        head: cli.head,
        diameter: cli.diameter,
        wall: cli.wall,
        length: cli.length,
        step_mm: cli.step,
        csv: cli.csv,
        separator: cli.separator,
    };
    app::run(&options, &mut cfg, &tr)?;
    cfg.save()?;
    Ok(())
}
