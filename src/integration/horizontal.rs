use super::{
    squared_radius, FillingCurve, IntegrationSettings, ProgressSink, MM3_TO_M3, MM_PER_CM,
};
use crate::error::CalcError;
use crate::vessel::RadiusProfile;

/// 높이 z 인 수평면이 용기를 자르는 면적 [mm²].
///
/// `squared_radii[i]` 는 x = i·dx 에서의 r(x)² 이다. 각 x 에서 현의 길이
/// 2·√(r² − z²) 를 더하며, r² < z² 인 위치는 평면과 만나지 않는다.
pub fn cross_section_area(squared_radii: &[f64], z: f64, dx: f64) -> f64 {
    let z2 = z * z;
    squared_radii
        .iter()
        .filter(|&&r2| r2 >= z2)
        .map(|&r2| 2.0 * (r2 - z2).sqrt() * dx)
        .sum()
}

/// 수평형 적분을 z 슬랩 단위로 나누어 진행한다.
///
/// 호출자가 `advance` 를 원하는 만큼만 호출하고 제어권을 돌려받을 수 있어
/// GUI 는 프레임마다 일부 슬랩만 처리하고 다시 그린다.
#[derive(Debug, Clone)]
pub struct HorizontalSweep {
    step: f64,
    steps_per_cm: usize,
    shell_radius: f64,
    z_min: f64,
    total_steps: usize,
    next: usize,
    volume_m3: f64,
    squared_radii: Vec<f64>,
    curve: FillingCurve,
}

impl HorizontalSweep {
    pub fn new(profile: &RadiusProfile, settings: &IntegrationSettings) -> Self {
        let step = settings.step_mm();
        let steps_per_cm = settings.steps_per_cm();
        let shell_radius = profile.shell_radius();
        let z_max = shell_radius.floor();
        let z_min = -z_max;
        let total_steps = ((z_max - z_min) / step).floor() as usize + 1;

        // r(x) 는 z 와 무관하므로 한 번만 계산해 둔다.
        let nx = (profile.integration_length() / step).floor() as usize;
        let mut degenerate = 0;
        let squared_radii: Vec<f64> = (0..=nx)
            .map(|i| squared_radius(profile, i as f64 * step, &mut degenerate))
            .collect();

        let mut curve = FillingCurve::with_capacity(total_steps / steps_per_cm + 1);
        curve.add_degenerate(degenerate);
        Self {
            step,
            steps_per_cm,
            shell_radius,
            z_min,
            total_steps,
            next: 0,
            volume_m3: 0.0,
            squared_radii,
            curve,
        }
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn completed_steps(&self) -> usize {
        self.next
    }

    pub fn is_finished(&self) -> bool {
        self.next >= self.total_steps
    }

    /// 진행률 [%]
    pub fn percent(&self) -> f64 {
        if self.total_steps == 0 {
            return 100.0;
        }
        self.next as f64 / self.total_steps as f64 * 100.0
    }

    /// 다음 슬랩 하나를 적분하고 진행률[%]을 반환한다. 이미 끝났으면 None.
    pub fn advance(&mut self) -> Option<f64> {
        if self.is_finished() {
            return None;
        }
        let idx = self.next;
        let z = self.z_min + idx as f64 * self.step;
        let area = cross_section_area(&self.squared_radii, z, self.step);
        self.volume_m3 += area * self.step * MM3_TO_M3;
        if idx % self.steps_per_cm == 0 {
            // 액위 0 = 용기 최저점
            let level_mm = z + self.shell_radius;
            self.curve.push(level_mm / MM_PER_CM, self.volume_m3);
        }
        self.next += 1;
        Some(self.percent())
    }

    /// 남은 슬랩을 모두 처리하고 결과 표를 돌려준다.
    pub fn finish(mut self) -> FillingCurve {
        while self.advance().is_some() {}
        self.curve
    }
}

/// 수평형: 수평면을 아래에서 위로 올리며 젖은 단면적을 적분한다.
///
/// 슬랩마다 `progress.report` 를 호출하고, 취소가 요청되면 부분 결과 없이
/// `CalcError::Cancelled` 를 반환한다.
pub fn integrate_horizontal(
    profile: &RadiusProfile,
    settings: &IntegrationSettings,
    progress: &mut dyn ProgressSink,
) -> Result<FillingCurve, CalcError> {
    let mut sweep = HorizontalSweep::new(profile, settings);
    while let Some(percent) = sweep.advance() {
        progress.report(percent);
        if progress.is_cancelled() {
            return Err(CalcError::Cancelled);
        }
    }
    Ok(sweep.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::NoProgress;
    use crate::vessel::{HeadType, VesselSpec, VesselType};

    fn profile(head: HeadType, da: f64, s: f64, l: f64) -> RadiusProfile {
        let spec = VesselSpec::new(VesselType::Horizontal, head, da, s, l).unwrap();
        RadiusProfile::new(&spec)
    }

    #[test]
    fn chord_area_of_uniform_cylinder() {
        // 반경 5 인 원통을 z = 3 에서 자르면 현 길이 8
        let radii = vec![25.0; 11];
        assert!((cross_section_area(&radii, 3.0, 1.0) - 88.0).abs() < 1e-12);
        assert_eq!(cross_section_area(&radii, 6.0, 1.0), 0.0);
        assert!((cross_section_area(&radii, 5.0, 1.0)).abs() < 1e-12);
    }

    #[test]
    fn levels_start_at_the_bottom() {
        let p = profile(HeadType::Din28011, 1000.0, 5.0, 2500.0);
        let curve = integrate_horizontal(&p, &Default::default(), &mut NoProgress).unwrap();
        // z = -495..=495 → 991 슬랩, 10 개마다 한 행
        assert_eq!(curve.len(), 100);
        assert_eq!(curve.first().unwrap().level_cm, 0.0);
        assert_eq!(curve.last().unwrap().level_cm, 99.0);
        assert!(curve.is_monotone());
    }

    #[test]
    fn progress_is_reported_per_slab() {
        let p = profile(HeadType::Din28013, 600.0, 4.0, 1500.0);
        let mut reports = Vec::new();
        let mut sink = |pct: f64| reports.push(pct);
        integrate_horizontal(&p, &Default::default(), &mut sink).unwrap();
        // z = -296..=296
        assert_eq!(reports.len(), 593);
        assert!(reports.windows(2).all(|w| w[1] >= w[0]));
        assert!((reports[0] - 100.0 / 593.0).abs() < 1e-9);
        assert!((reports.last().unwrap() - 100.0).abs() < 1e-9);
    }

    struct CancelAfter {
        calls: usize,
        limit: usize,
    }

    impl ProgressSink for CancelAfter {
        fn report(&mut self, _percent: f64) {
            self.calls += 1;
        }

        fn is_cancelled(&self) -> bool {
            self.calls >= self.limit
        }
    }

    #[test]
    fn cancellation_stops_at_the_next_slab() {
        let p = profile(HeadType::Din28011, 600.0, 4.0, 1500.0);
        let mut sink = CancelAfter { calls: 0, limit: 5 };
        let result = integrate_horizontal(&p, &Default::default(), &mut sink);
        assert!(matches!(result, Err(CalcError::Cancelled)));
        assert_eq!(sink.calls, 5);
    }

    #[test]
    fn stepping_matches_one_shot_run() {
        let p = profile(HeadType::Din28011, 600.0, 4.0, 1500.0);
        let settings = IntegrationSettings::default();
        let mut sweep = HorizontalSweep::new(&p, &settings);
        for _ in 0..100 {
            sweep.advance();
        }
        assert_eq!(sweep.completed_steps(), 100);
        assert!(!sweep.is_finished());
        let stepped = sweep.finish();
        let direct = integrate_horizontal(&p, &settings, &mut NoProgress).unwrap();
        assert_eq!(stepped, direct);
    }

    #[test]
    fn halving_step_barely_changes_total() {
        let p = profile(HeadType::Din28013, 1000.0, 5.0, 2500.0);
        let coarse =
            integrate_horizontal(&p, &IntegrationSettings::new(1.0).unwrap(), &mut NoProgress)
                .unwrap();
        let fine =
            integrate_horizontal(&p, &IntegrationSettings::new(0.5).unwrap(), &mut NoProgress)
                .unwrap();
        let rel = (coarse.total_volume_m3() - fine.total_volume_m3()).abs() / fine.total_volume_m3();
        assert!(rel < 1e-3, "rel={rel}");
    }
}
