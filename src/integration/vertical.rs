use std::f64::consts::PI;

use super::{squared_radius, FillingCurve, IntegrationSettings, MM3_TO_M3, MM_PER_CM};
use crate::vessel::RadiusProfile;

/// 수직형: 축을 따라 원판을 쌓아 올린다.
///
/// 단면적 π·r(x)² 를 사다리꼴 공식으로 적분하고 1 cm 마다 누적 용적을 기록한다.
/// 액위는 아래쪽 경판 정점으로부터의 높이이다. 각 행은 해당 단계의 원판을
/// 더한 뒤의 값이므로 첫 행 (0 cm) 에는 첫 원판 하나의 용적이 들어간다.
pub fn integrate_vertical(profile: &RadiusProfile, settings: &IntegrationSettings) -> FillingCurve {
    let h = settings.step_mm();
    let per_cm = settings.steps_per_cm();
    let steps = (profile.integration_length() / h).floor() as usize;

    let mut curve = FillingCurve::with_capacity(steps / per_cm + 1);
    let mut degenerate = 0;
    let mut volume = 0.0;
    let mut lower = squared_radius(profile, 0.0, &mut degenerate);
    for i in 0..=steps {
        let x = i as f64 * h;
        let upper = squared_radius(profile, x + h, &mut degenerate);
        volume += PI * 0.5 * (lower + upper) * h * MM3_TO_M3;
        lower = upper;

        if i % per_cm == 0 {
            curve.push(x / MM_PER_CM, volume);
        }
    }
    curve.add_degenerate(degenerate);
    curve
}
