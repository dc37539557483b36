//! 충전 곡선(액위 → 용적) 계산 로직을 라이브러리로 분리하여 CLI 와 GUI 가 함께 사용한다.

pub mod app;
pub mod config;
pub mod error;
pub mod export;
pub mod i18n;
pub mod integration;
pub mod logging;
pub mod service;
pub mod ui_cli;
pub mod vessel;

pub use error::{CalcError, ValidationError};
pub use integration::{CurvePoint, FillingCurve, IntegrationSettings, NoProgress, ProgressSink};
pub use service::FillingCurveService;
pub use vessel::{HeadType, VesselInput, VesselSpec, VesselType};
