use std::path::PathBuf;

use crate::config::{Config, ConfigError};
use crate::error::{CalcError, ValidationError};
use crate::export::{self, DecimalSeparator, ExportError};
use crate::i18n::{keys, Translator};
use crate::integration::{FillingCurve, IntegrationSettings, NoProgress};
use crate::service::FillingCurveService;
use crate::ui_cli;
use crate::vessel::{VesselSpec, VesselType};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 표준 입출력 오류
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl From<ValidationError> for AppError {
    fn from(value: ValidationError) -> Self {
        AppError::Calc(CalcError::Validation(value))
    }
}

impl AppError {
    /// 사용자의 입력 문제인지 여부. CLI 종료 코드를 구분하는 데 쓴다.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Calc(CalcError::Validation(_)))
    }
}

/// CLI 인자로 받은 값. 비어 있는 치수는 대화형으로 입력받는다.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub vessel: Option<String>,
    pub head: Option<String>,
    pub diameter: Option<String>,
    pub wall: Option<String>,
    pub length: Option<String>,
    pub step_mm: Option<f64>,
    pub csv: Option<PathBuf>,
    pub separator: Option<DecimalSeparator>,
}

/// 입력 수집 → 계산 → 표 출력 → (선택) CSV 저장을 한 번 수행한다.
pub fn run(
    options: &RunOptions,
    config: &mut Config,
    tr: &Translator,
) -> Result<FillingCurve, AppError> {
    let settings = IntegrationSettings::new(options.step_mm.unwrap_or(config.step_mm))?;
    let input = ui_cli::collect_input(options, &config.last_input, tr)?;
    let spec = VesselSpec::parse(&input)?;
    let service = FillingCurveService::new(settings);

    ui_cli::print_head_parameters(tr, &spec);
    let curve = match spec.vessel_type() {
        VesselType::Vertical => service.compute(&spec, &mut NoProgress)?,
        VesselType::Horizontal => {
            let mut bar = ui_cli::CliProgress::new(tr.t(keys::PROGRESS));
            let result = service.compute(&spec, &mut bar);
            bar.finish();
            result?
        }
    };

    config.last_input = spec.to_input();
    config.step_mm = settings.step_mm();

    ui_cli::print_table(tr, &curve);
    if let Some(path) = &options.csv {
        let separator = options
            .separator
            .unwrap_or_else(|| config.decimal_separator.resolve(tr.language()));
        export::export_csv(path, &curve, separator)?;
        println!("{} {}", tr.t(keys::STATUS_EXPORT_OK), path.display());
    }
    Ok(curve)
}
