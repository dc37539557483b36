//! 반경 함수를 적분하여 액위 → 용적 표를 만든다.

pub mod horizontal;
pub mod vertical;

use crate::error::{Field, ValidationError};
use crate::vessel::RadiusProfile;

pub use horizontal::{cross_section_area, integrate_horizontal, HorizontalSweep};
pub use vertical::integrate_vertical;

/// mm³ → m³
pub const MM3_TO_M3: f64 = 1e-9;
pub const MM_PER_CM: f64 = 10.0;

/// 표 한 행. 액위 [cm], 누적 용적 [m³].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub level_cm: f64,
    pub volume_m3: f64,
}

/// 액위가 증가하는 순서로 정렬된 누적 용적 표.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillingCurve {
    points: Vec<CurvePoint>,
    degenerate_samples: usize,
}

impl FillingCurve {
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&CurvePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&CurvePoint> {
        self.points.last()
    }

    /// 마지막 행의 누적 용적. 빈 표면 0.
    pub fn total_volume_m3(&self) -> f64 {
        self.last().map_or(0.0, |p| p.volume_m3)
    }

    /// 너클 판별식이 음수여서 반경 0 으로 대체된 샘플 수.
    pub fn degenerate_samples(&self) -> usize {
        self.degenerate_samples
    }

    /// 액위가 엄격히 증가하고 용적이 감소하지 않는지 확인한다.
    pub fn is_monotone(&self) -> bool {
        self.points
            .windows(2)
            .all(|w| w[1].level_cm > w[0].level_cm && w[1].volume_m3 >= w[0].volume_m3)
    }

    /// 임의 액위 [cm] 의 용적을 선형 보간한다. 표 범위 밖이면 None.
    pub fn volume_at_level(&self, level_cm: f64) -> Option<f64> {
        let first = self.first()?;
        let last = self.last()?;
        if !(level_cm >= first.level_cm && level_cm <= last.level_cm) {
            return None;
        }
        let idx = self.points.partition_point(|p| p.level_cm < level_cm);
        let hi = self.points[idx];
        if idx == 0 || hi.level_cm == level_cm {
            return Some(hi.volume_m3);
        }
        let lo = self.points[idx - 1];
        let t = (level_cm - lo.level_cm) / (hi.level_cm - lo.level_cm);
        Some(lo.volume_m3 + t * (hi.volume_m3 - lo.volume_m3))
    }

    pub(crate) fn with_capacity(rows: usize) -> Self {
        Self {
            points: Vec::with_capacity(rows),
            degenerate_samples: 0,
        }
    }

    pub(crate) fn push(&mut self, level_cm: f64, volume_m3: f64) {
        self.points.push(CurvePoint {
            level_cm,
            volume_m3,
        });
    }

    pub(crate) fn add_degenerate(&mut self, count: usize) {
        self.degenerate_samples += count;
    }
}

/// r(x)² [mm²]. 퇴화 샘플이면 카운터를 올린다.
pub(crate) fn squared_radius(profile: &RadiusProfile, x: f64, degenerate: &mut usize) -> f64 {
    let sample = profile.sample(x);
    if sample.is_degenerate() {
        *degenerate += 1;
    }
    let r = sample.radius();
    r * r
}

/// 두 적분기가 공유하는 해상도 설정.
///
/// `new` 와 `Default` 로만 만들 수 있으므로 적분기에 전달되는 간격은 항상 검증된 값이다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegrationSettings {
    /// 적분 간격 [mm]. 1 cm 마다 한 행을 남기므로 10 mm 를 나누어 떨어뜨려야 한다.
    step_mm: f64,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self { step_mm: 1.0 }
    }
}

impl IntegrationSettings {
    pub fn new(step_mm: f64) -> Result<Self, ValidationError> {
        let settings = Self { step_mm };
        settings.validate()?;
        Ok(settings)
    }

    pub fn step_mm(&self) -> f64 {
        self.step_mm
    }

    fn validate(&self) -> Result<(), ValidationError> {
        let step = self.step_mm;
        if !step.is_finite() {
            return Err(ValidationError::NotFinite { field: Field::Step });
        }
        let per_cm = MM_PER_CM / step;
        if step <= 0.0 || step > MM_PER_CM || (per_cm - per_cm.round()).abs() > 1e-9 {
            return Err(ValidationError::InvalidStep { step });
        }
        Ok(())
    }

    /// 1 cm 에 해당하는 적분 단계 수
    pub fn steps_per_cm(&self) -> usize {
        (MM_PER_CM / self.step_mm).round().max(1.0) as usize
    }
}

/// 오래 걸리는 적분이 진행률을 알리고 취소 여부를 확인하는 지점.
///
/// 수평형 적분기는 z 슬랩 하나를 끝낼 때마다 `report` 를 호출한다.
pub trait ProgressSink {
    /// 진행률 [%], 0 ~ 100 범위에서 감소하지 않는다.
    fn report(&mut self, percent: f64);

    fn is_cancelled(&self) -> bool {
        false
    }
}

/// 진행률을 무시한다.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&mut self, _percent: f64) {}
}

impl<F: FnMut(f64)> ProgressSink for F {
    fn report(&mut self, percent: f64) {
        self(percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(points: &[(f64, f64)]) -> FillingCurve {
        let mut c = FillingCurve::with_capacity(points.len());
        for &(l, v) in points {
            c.push(l, v);
        }
        c
    }

    #[test]
    fn step_must_divide_a_centimetre() {
        assert!(IntegrationSettings::new(1.0).is_ok());
        assert!(IntegrationSettings::new(0.5).is_ok());
        assert!(IntegrationSettings::new(2.5).is_ok());
        assert_eq!(IntegrationSettings::new(2.5).unwrap().steps_per_cm(), 4);
        assert!(matches!(
            IntegrationSettings::new(3.0),
            Err(ValidationError::InvalidStep { .. })
        ));
        assert!(IntegrationSettings::new(0.0).is_err());
        assert!(IntegrationSettings::new(-1.0).is_err());
        assert!(IntegrationSettings::new(20.0).is_err());
        assert!(IntegrationSettings::new(f64::INFINITY).is_err());
    }

    #[test]
    fn interpolates_between_rows() {
        let c = curve(&[(0.0, 0.0), (1.0, 0.2), (2.0, 0.6)]);
        assert_eq!(c.volume_at_level(0.0), Some(0.0));
        assert_eq!(c.volume_at_level(2.0), Some(0.6));
        let mid = c.volume_at_level(1.5).unwrap();
        assert!((mid - 0.4).abs() < 1e-12);
        assert_eq!(c.volume_at_level(2.5), None);
        assert_eq!(c.volume_at_level(-0.1), None);
        assert_eq!(FillingCurve::default().volume_at_level(0.0), None);
    }

    #[test]
    fn monotone_check() {
        assert!(curve(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.5)]).is_monotone());
        assert!(!curve(&[(0.0, 0.1), (1.0, 0.0)]).is_monotone());
        assert!(!curve(&[(0.0, 0.0), (0.0, 0.1)]).is_monotone());
    }

    #[test]
    fn closures_are_progress_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |p: f64| seen.push(p);
            let sink: &mut dyn ProgressSink = &mut sink;
            sink.report(50.0);
            assert!(!sink.is_cancelled());
        }
        assert_eq!(seen, vec![50.0]);
    }
}
