#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use std::{env, fs};
use tank_filling_curve::{
    config, export,
    i18n::{self, keys, Language},
    integration::HorizontalSweep,
    logging, service, CalcError, FillingCurve, FillingCurveService, HeadType, NoProgress,
    VesselInput, VesselSpec, VesselType,
};

/// 한 프레임에서 수평형 슬랩을 처리할 최대 시간
const FRAME_BUDGET: Duration = Duration::from_millis(30);

fn main() -> Result<(), eframe::Error> {
    // CLI 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en/de/ko), -v/-vv
    let mut cli_lang: Option<String> = None;
    let mut verbosity = 0u8;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if a == "--lang" || a == "-L" {
            if i + 1 < args.len() {
                cli_lang = Some(args[i + 1].clone());
                i += 1;
            }
        } else if a.starts_with("-v") && a.chars().skip(1).all(|c| c == 'v') {
            verbosity = verbosity.saturating_add((a.len() - 1) as u8);
        }
        i += 1;
    }
    logging::init(verbosity);

    let mut app_cfg = config::load_or_default().unwrap_or_else(|e| {
        tracing::warn!("using default settings: {e}");
        config::Config::default()
    });
    if let Some(lang_cli) = cli_lang {
        app_cfg.language = i18n::resolve_language(&lang_cli, Some(app_cfg.language.as_str()));
    }

    let mut viewport = egui::ViewportBuilder::default().with_inner_size([800.0, 700.0]);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "Filling Curve",
        options,
        Box::new(move |cc| {
            let app = GuiApp::new(app_cfg, Some(PathBuf::from(config::CONFIG_FILE)));
            if app.tr.language() == Language::Ko {
                if let Err(e) = setup_korean_font(&cc.egui_ctx) {
                    tracing::warn!("font error: {e}");
                }
            }
            Box::new(app)
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["filling_curve.png", "icon.png", "assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let rgba = img.to_rgba8();
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: rgba.into_raw(),
        width: w,
        height: h,
    })
}

/// 공통: 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 기본 폰트에는 한글이 없으므로 시스템 폰트를 찾아 등록한다.
fn setup_korean_font(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        for name in ["malgun.ttf", "gulim.ttc", "batang.ttc"] {
            candidates.push(fonts.join(name));
        }
    }
    candidates.extend(
        [
            "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/System/Library/Fonts/AppleSDGothicNeo.ttc",
        ]
        .map(PathBuf::from),
    );
    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read system font ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    Err("Korean font not found, falling back to default fonts.".into())
}

enum Status {
    Info(String),
    Error(String),
}

struct GuiApp {
    config: config::Config,
    config_path: Option<PathBuf>,
    tr: i18n::Translator,
    service: FillingCurveService,
    vessel_type: VesselType,
    head_type: HeadType,
    input: VesselInput,
    running: Option<HorizontalSweep>,
    curve: Option<FillingCurve>,
    rows: Vec<export::TableRow>,
    status: Option<Status>,
}

impl GuiApp {
    fn new(config: config::Config, config_path: Option<PathBuf>) -> Self {
        let lang = i18n::resolve_language("auto", Some(config.language.as_str()));
        let tr = i18n::Translator::new_with_pack(&lang, config.locale_dir.as_deref());
        let service = config
            .integration_settings()
            .map(FillingCurveService::new)
            .unwrap_or_else(|e| {
                tracing::warn!("ignoring configured step: {e}");
                FillingCurveService::default()
            });
        let input = config.last_input.clone();
        Self {
            vessel_type: input.vessel_type.parse().unwrap_or(VesselType::Vertical),
            head_type: input.head_type.parse().unwrap_or(HeadType::Din28011),
            input,
            config,
            config_path,
            tr,
            service,
            running: None,
            curve: None,
            rows: Vec::new(),
            status: None,
        }
    }

    fn start_calculation(&mut self) {
        self.input.vessel_type = self.vessel_type.as_code().to_string();
        self.input.head_type = self.head_type.as_code().to_string();
        let spec = match VesselSpec::parse(&self.input) {
            Ok(spec) => spec,
            Err(e) => {
                self.fail(CalcError::Validation(e));
                return;
            }
        };
        self.config.last_input = self.input.clone();
        self.status = None;

        match spec.vessel_type() {
            VesselType::Vertical => match self.service.compute(&spec, &mut NoProgress) {
                Ok(curve) => self.show_curve(curve),
                Err(e) => self.fail(e),
            },
            VesselType::Horizontal => match self.service.horizontal_sweep(&spec) {
                Ok(sweep) => {
                    tracing::info!(slabs = sweep.total_steps(), "horizontal sweep started");
                    self.running = Some(sweep);
                }
                Err(e) => self.fail(CalcError::Validation(e)),
            },
        }
    }

    /// 진행 중인 수평형 계산을 프레임 예산만큼 진행한다. 다시 그려야 하면 true.
    fn advance_running(&mut self, budget: Duration) -> bool {
        let Some(sweep) = self.running.as_mut() else {
            return false;
        };
        let deadline = Instant::now() + budget;
        while sweep.advance().is_some() {
            if Instant::now() >= deadline {
                break;
            }
        }
        if !sweep.is_finished() {
            return true;
        }
        if let Some(sweep) = self.running.take() {
            let curve = sweep.finish();
            service::log_finished(&curve);
            self.show_curve(curve);
        }
        true
    }

    fn cancel(&mut self) {
        if self.running.take().is_some() {
            tracing::warn!("filling curve calculation cancelled");
            self.status = Some(Status::Info(self.tr.t(keys::STATUS_CANCELLED).to_string()));
        }
    }

    fn show_curve(&mut self, curve: FillingCurve) {
        self.rows = export::table_rows(&curve);
        self.curve = Some(curve);
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                tracing::warn!("failed to save settings: {e}");
            }
        }
    }

    fn fail(&mut self, err: CalcError) {
        let msg = match &err {
            CalcError::Validation(_) => {
                format!("{} {err}", self.tr.t(keys::STATUS_INVALID_INPUT))
            }
            CalcError::Cancelled => self.tr.t(keys::STATUS_CANCELLED).to_string(),
        };
        self.status = Some(Status::Error(msg));
    }

    fn export(&mut self) {
        let Some(curve) = &self.curve else {
            self.status = Some(Status::Error(
                self.tr.t(keys::STATUS_NOTHING_TO_EXPORT).to_string(),
            ));
            return;
        };
        let Some(path) = FileDialog::new()
            .set_title(self.tr.t(keys::BUTTON_EXPORT))
            .add_filter("CSV files", &["csv"])
            .add_filter("All files", &["*"])
            .set_file_name("filling_curve.csv")
            .save_file()
        else {
            return;
        };
        let separator = self
            .config
            .decimal_separator
            .resolve(self.tr.language());
        self.status = Some(match export::export_csv(&path, curve, separator) {
            Ok(()) => Status::Info(format!(
                "{} {}",
                self.tr.t(keys::STATUS_EXPORT_OK),
                path.display()
            )),
            Err(e) => Status::Error(format!("{} {e}", self.tr.t(keys::STATUS_EXPORT_FAILED))),
        });
    }

    fn ui_form(&mut self, ui: &mut egui::Ui, tr: &i18n::Translator) {
        let enabled = self.running.is_none();
        ui.add_enabled_ui(enabled, |ui| {
            egui::Grid::new("vessel_form")
                .num_columns(2)
                .spacing([12.0, 6.0])
                .show(ui, |ui| {
                    ui.label(tr.t(keys::LABEL_VESSEL_TYPE));
                    egui::ComboBox::from_id_source("vessel_type")
                        .selected_text(vessel_label(tr, self.vessel_type))
                        .width(260.0)
                        .show_ui(ui, |ui| {
                            for v in VesselType::ALL {
                                ui.selectable_value(&mut self.vessel_type, v, vessel_label(tr, v));
                            }
                        });
                    ui.end_row();

                    ui.label(tr.t(keys::LABEL_HEAD_TYPE));
                    egui::ComboBox::from_id_source("head_type")
                        .selected_text(head_label(tr, self.head_type))
                        .width(260.0)
                        .show_ui(ui, |ui| {
                            for h in HeadType::ALL {
                                ui.selectable_value(&mut self.head_type, h, head_label(tr, h));
                            }
                        });
                    ui.end_row();

                    ui.label(tr.t(keys::LABEL_OUTER_DIAMETER));
                    ui.text_edit_singleline(&mut self.input.outer_diameter);
                    ui.end_row();

                    ui.label(tr.t(keys::LABEL_WALL_THICKNESS));
                    ui.text_edit_singleline(&mut self.input.wall_thickness);
                    ui.end_row();

                    ui.label(tr.t(keys::LABEL_LENGTH));
                    ui.text_edit_singleline(&mut self.input.length);
                    ui.end_row();
                });
        });
    }

    fn ui_actions(&mut self, ui: &mut egui::Ui, tr: &i18n::Translator) {
        let running = self.running.is_some();
        let mut calculate = false;
        let mut cancel = false;
        let mut export = false;
        ui.horizontal(|ui| {
            calculate = ui
                .add_enabled(!running, egui::Button::new(tr.t(keys::BUTTON_CALCULATE)))
                .clicked();
            if let Some(sweep) = &self.running {
                ui.label(tr.t(keys::PROGRESS));
                ui.add(
                    egui::ProgressBar::new((sweep.percent() / 100.0) as f32)
                        .desired_width(200.0)
                        .show_percentage(),
                );
                cancel = ui.button(tr.t(keys::BUTTON_CANCEL)).clicked();
            }
        });
        ui.horizontal(|ui| {
            export = ui
                .add_enabled(
                    self.curve.is_some() && !running,
                    egui::Button::new(tr.t(keys::BUTTON_EXPORT)),
                )
                .clicked();
        });
        if calculate {
            self.start_calculation();
        }
        if cancel {
            self.cancel();
        }
        if export {
            self.export();
        }
    }

    fn ui_status(&self, ui: &mut egui::Ui) {
        match &self.status {
            Some(Status::Info(msg)) => {
                ui.label(msg.as_str());
            }
            Some(Status::Error(msg)) => {
                ui.colored_label(egui::Color32::RED, msg.as_str());
            }
            None => {}
        }
    }

    fn ui_table(&self, ui: &mut egui::Ui, tr: &i18n::Translator) {
        const COL_WIDTH: f32 = 160.0;
        egui::Grid::new("result_header")
            .num_columns(2)
            .min_col_width(COL_WIDTH)
            .show(ui, |ui| {
                ui.strong(tr.t(keys::COLUMN_LEVEL));
                ui.strong(tr.t(keys::COLUMN_VOLUME));
                ui.end_row();
            });
        let row_height = ui.text_style_height(&egui::TextStyle::Body);
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show_rows(ui, row_height, self.rows.len(), |ui, range| {
                egui::Grid::new("result_rows")
                    .num_columns(2)
                    .min_col_width(COL_WIDTH)
                    .striped(true)
                    .show(ui, |ui| {
                        for row in &self.rows[range] {
                            ui.label(row.level_cm.to_string());
                            ui.label(row.volume_m3.as_str());
                            ui.end_row();
                        }
                    });
            });
    }
}

fn vessel_label(tr: &i18n::Translator, v: VesselType) -> String {
    match v {
        VesselType::Vertical => tr.t(keys::VESSEL_VERTICAL),
        VesselType::Horizontal => tr.t(keys::VESSEL_HORIZONTAL),
    }
    .to_string()
}

fn head_label(tr: &i18n::Translator, h: HeadType) -> String {
    match h {
        HeadType::Din28011 => tr.t(keys::HEAD_DIN28011),
        HeadType::Din28013 => tr.t(keys::HEAD_DIN28013),
    }
    .to_string()
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if self.advance_running(FRAME_BUDGET) {
            ctx.request_repaint();
        }

        let tr = self.tr.clone();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.heading(tr.t(keys::APP_TITLE));
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui_form(ui, &tr);
            ui.add_space(6.0);
            self.ui_actions(ui, &tr);
            self.ui_status(ui);
            ui.separator();
            self.ui_table(ui, &tr);
        });
    }
}
