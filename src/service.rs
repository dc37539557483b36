//! 입력 검증 → 경판 파라미터 → 반경 함수 → 적분기 순으로 연결한다.

use tracing::{debug, info, warn};

use crate::error::{CalcError, ValidationError};
use crate::integration::{
    integrate_horizontal, integrate_vertical, FillingCurve, HorizontalSweep,
    IntegrationSettings, ProgressSink,
};
use crate::vessel::{RadiusProfile, VesselInput, VesselSpec, VesselType};

/// 충전 곡선 계산기. 호출 사이에 상태를 공유하지 않는다.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillingCurveService {
    settings: IntegrationSettings,
}

impl FillingCurveService {
    pub fn new(settings: IntegrationSettings) -> Self {
        Self { settings }
    }

    /// 간격 [mm] 을 검증한 뒤 계산기를 만든다.
    pub fn with_step(step_mm: f64) -> Result<Self, ValidationError> {
        IntegrationSettings::new(step_mm).map(Self::new)
    }

    pub fn settings(&self) -> IntegrationSettings {
        self.settings
    }

    /// 형상을 만들고 가능한지 검사한다. 적분 전에 실패를 모두 걸러낸다.
    pub fn prepare(&self, spec: &VesselSpec) -> Result<RadiusProfile, ValidationError> {
        let profile = RadiusProfile::new(spec);
        let head = profile.head();
        let bp = profile.breakpoints();
        debug!(
            head = %spec.head_type(),
            r1 = head.crown_radius,
            r2 = head.knuckle_radius,
            h2 = head.knuckle_height,
            x1 = bp.x1,
            x2 = bp.x2,
            x3 = bp.x3,
            x4 = bp.x4,
            crown_joint_step = profile.crown_joint_step(),
            "derived vessel profile"
        );
        if !profile.is_feasible() {
            return Err(ValidationError::InfeasibleHead);
        }
        Ok(profile)
    }

    /// 사양에 맞는 적분기로 충전 곡선을 계산한다.
    ///
    /// 진행률은 수평형에서만 보고된다. 수직형은 곧바로 끝난다.
    pub fn compute(
        &self,
        spec: &VesselSpec,
        progress: &mut dyn ProgressSink,
    ) -> Result<FillingCurve, CalcError> {
        let profile = self.prepare(spec)?;
        info!(
            vessel = %spec.vessel_type(),
            step_mm = self.settings.step_mm(),
            "integrating filling curve"
        );
        let result = match spec.vessel_type() {
            VesselType::Vertical => Ok(integrate_vertical(&profile, &self.settings)),
            VesselType::Horizontal => integrate_horizontal(&profile, &self.settings, progress),
        };
        match result {
            Ok(curve) => {
                log_finished(&curve);
                Ok(curve)
            }
            Err(CalcError::Cancelled) => {
                warn!("filling curve calculation cancelled");
                Err(CalcError::Cancelled)
            }
            Err(e) => Err(e),
        }
    }

    /// 텍스트 입력을 바로 계산한다.
    pub fn compute_input(
        &self,
        input: &VesselInput,
        progress: &mut dyn ProgressSink,
    ) -> Result<FillingCurve, CalcError> {
        let spec = VesselSpec::parse(input)?;
        self.compute(&spec, progress)
    }

    /// 수평형 계산을 호출자가 나누어 진행할 수 있도록 준비한다.
    pub fn horizontal_sweep(&self, spec: &VesselSpec) -> Result<HorizontalSweep, ValidationError> {
        let profile = self.prepare(spec)?;
        Ok(HorizontalSweep::new(&profile, &self.settings))
    }
}

/// 계산 완료 로그. 스텝 단위로 진행한 GUI 계산도 같은 형식으로 남긴다.
pub fn log_finished(curve: &FillingCurve) {
    if curve.degenerate_samples() > 0 {
        warn!(
            samples = curve.degenerate_samples(),
            "knuckle discriminant negative, radius taken as zero"
        );
    }
    info!(
        rows = curve.len(),
        total_m3 = curve.total_volume_m3(),
        "filling curve ready"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::NoProgress;
    use crate::vessel::HeadType;

    #[test]
    fn vertical_reports_no_progress() {
        let spec =
            VesselSpec::new(VesselType::Vertical, HeadType::Din28011, 600.0, 4.0, 1500.0).unwrap();
        let mut calls = 0;
        let mut sink = |_: f64| calls += 1;
        let curve = FillingCurveService::default().compute(&spec, &mut sink).unwrap();
        assert!(!curve.is_empty());
        assert_eq!(calls, 0);
    }

    #[test]
    fn infeasible_head_fails_before_integration() {
        let spec =
            VesselSpec::new(VesselType::Horizontal, HeadType::Din28011, 100.0, 45.0, 500.0)
                .unwrap();
        let mut calls = 0;
        let mut sink = |_: f64| calls += 1;
        let err = FillingCurveService::default().compute(&spec, &mut sink).unwrap_err();
        assert!(matches!(
            err,
            CalcError::Validation(ValidationError::InfeasibleHead)
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn rejects_invalid_step() {
        let err = FillingCurveService::with_step(4.0).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidStep { .. }));
        let service = FillingCurveService::with_step(0.5).unwrap();
        assert_eq!(service.settings().step_mm(), 0.5);
    }

    #[test]
    fn text_input_is_validated_first() {
        let input = VesselInput {
            outer_diameter: "2000".into(),
            wall_thickness: "1000".into(),
            length: "4000".into(),
            ..VesselInput::default()
        };
        let err = FillingCurveService::default()
            .compute_input(&input, &mut NoProgress)
            .unwrap_err();
        assert!(matches!(
            err,
            CalcError::Validation(ValidationError::WallTooThick { .. })
        ));
    }
}
