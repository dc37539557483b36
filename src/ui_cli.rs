use std::io::{self, Write};

use indicatif::{ProgressBar, ProgressStyle};

use crate::app::{AppError, RunOptions};
use crate::error::Field;
use crate::export;
use crate::i18n::{keys, Translator};
use crate::integration::{FillingCurve, ProgressSink};
use crate::vessel::{self, HeadType, VesselInput, VesselSpec, VesselType};

/// 인자로 받지 못한 항목만 표준 입력으로 묻는다. 빈 입력은 이전 값을 유지한다.
pub fn collect_input(
    options: &RunOptions,
    defaults: &VesselInput,
    tr: &Translator,
) -> Result<VesselInput, AppError> {
    let vessel_type = match &options.vessel {
        Some(v) => v.clone(),
        None => read_vessel_type(tr, &defaults.vessel_type)?,
    };
    let head_type = match &options.head {
        Some(h) => h.clone(),
        None => read_head_type(tr, &defaults.head_type)?,
    };
    let outer_diameter = match &options.diameter {
        Some(d) => d.clone(),
        None => read_number(
            tr,
            tr.t(keys::PROMPT_OUTER_DIAMETER),
            Field::OuterDiameter,
            &defaults.outer_diameter,
        )?,
    };
    let wall_thickness = match &options.wall {
        Some(s) => s.clone(),
        None => read_number(
            tr,
            tr.t(keys::PROMPT_WALL_THICKNESS),
            Field::WallThickness,
            &defaults.wall_thickness,
        )?,
    };
    let length = match &options.length {
        Some(l) => l.clone(),
        None => read_number(tr, tr.t(keys::PROMPT_LENGTH), Field::Length, &defaults.length)?,
    };
    Ok(VesselInput {
        vessel_type,
        head_type,
        outer_diameter,
        wall_thickness,
        length,
    })
}

fn read_vessel_type(tr: &Translator, default: &str) -> Result<String, AppError> {
    let fallback = default.parse::<VesselType>().ok();
    loop {
        let sel = read_line(&with_default(tr.t(keys::PROMPT_VESSEL_TYPE), default))?;
        let chosen = match sel.trim() {
            "1" => Some(VesselType::Vertical),
            "2" => Some(VesselType::Horizontal),
            "" => fallback,
            other => other.parse().ok(),
        };
        match chosen {
            Some(v) => return Ok(v.as_code().to_string()),
            None => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

fn read_head_type(tr: &Translator, default: &str) -> Result<String, AppError> {
    let fallback = default.parse::<HeadType>().ok();
    loop {
        let sel = read_line(&with_default(tr.t(keys::PROMPT_HEAD_TYPE), default))?;
        let chosen = match sel.trim() {
            "1" => Some(HeadType::Din28011),
            "2" => Some(HeadType::Din28013),
            "" => fallback,
            other => other.parse().ok(),
        };
        match chosen {
            Some(h) => return Ok(h.as_code().to_string()),
            None => println!("{}", tr.t(keys::INVALID_SELECTION_RETRY)),
        }
    }
}

fn read_number(
    tr: &Translator,
    prompt: &str,
    field: Field,
    default: &str,
) -> Result<String, AppError> {
    loop {
        let s = read_line(&with_default(prompt, default))?;
        let text = if s.trim().is_empty() { default } else { s.trim() };
        match vessel::parse_number(field, text) {
            Ok(_) => return Ok(text.to_string()),
            Err(_) => println!("{}", tr.t(keys::ERROR_INVALID_NUMBER)),
        }
    }
}

/// "외경 (mm): " + "2000" → "외경 (mm) [2000]: "
fn with_default(prompt: &str, default: &str) -> String {
    if default.trim().is_empty() {
        return prompt.to_string();
    }
    let body = prompt.trim_end().trim_end_matches(':');
    format!("{body} [{}]: ", default.trim())
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut buf = String::new();
    if io::stdin().read_line(&mut buf)? == 0 {
        return Err(AppError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed",
        )));
    }
    Ok(buf)
}

pub fn print_head_parameters(tr: &Translator, spec: &VesselSpec) {
    let head = spec.head_parameters();
    println!(
        "{} ({}): r1 = {:.1} mm, r2 = {:.1} mm, h2 = {:.2} mm",
        tr.t(keys::RESULT_HEAD_PARAMETERS),
        spec.head_type().standard_name(),
        head.crown_radius,
        head.knuckle_radius,
        head.knuckle_height
    );
}

pub fn print_table(tr: &Translator, curve: &FillingCurve) {
    println!(
        "{:>12}  {:>14}",
        tr.t(keys::COLUMN_LEVEL),
        tr.t(keys::COLUMN_VOLUME)
    );
    for row in export::table_rows(curve) {
        println!("{:>12}  {:>14}", row.level_cm, row.volume_m3);
    }
    println!(
        "{}: {:.3} m³",
        tr.t(keys::RESULT_TOTAL_VOLUME),
        curve.total_volume_m3()
    );
}

/// 수평형 계산용 터미널 진행 막대.
pub struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) = ProgressStyle::with_template("{msg} [{bar:40}] {pos:>3}%") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_message(label.to_string());
        Self { bar }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressSink for CliProgress {
    fn report(&mut self, percent: f64) {
        self.bar.set_position(percent.clamp(0.0, 100.0) as u64);
    }
}
