//! 축 방향 위치 x 에서의 내부 반경 r(x).
//!
//! 앞쪽 경판 정점을 x = 0 으로 두고 뒤쪽 경판 정점 x = L - s 까지 정의한다.
//! 구간은 구면부 / 너클부 / 원통부 / 너클부 / 구면부의 다섯 개이며
//! 앞뒤가 대칭이다.

use super::{HeadParameters, VesselSpec};

/// 구간 경계 x1 ≤ x2 ≤ x3 ≤ x4 [mm].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoints {
    /// 앞쪽 구면부 → 너클부
    pub x1: f64,
    /// 앞쪽 너클부 → 원통부 (= h2)
    pub x2: f64,
    /// 원통부 → 뒤쪽 너클부
    pub x3: f64,
    /// 뒤쪽 너클부 → 구면부
    pub x4: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    FrontCrown,
    FrontKnuckle,
    Shell,
    RearKnuckle,
    RearCrown,
    /// [0, L - s] 밖
    Outside,
}

/// 반경 샘플. 너클 판별식이 음수인 지점은 `Degenerate` 로 표시하고 반경 0 으로 취급한다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RadiusSample {
    Radius(f64),
    Degenerate,
}

impl RadiusSample {
    pub fn radius(self) -> f64 {
        match self {
            RadiusSample::Radius(r) => r,
            RadiusSample::Degenerate => 0.0,
        }
    }

    pub fn is_degenerate(self) -> bool {
        matches!(self, RadiusSample::Degenerate)
    }
}

/// 경판 파라미터와 동체 치수로 만든 반경 함수. 값 타입이라 복사해서 넘겨도 된다.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusProfile {
    head: HeadParameters,
    shell_radius: f64,
    length: f64,
    wall_thickness: f64,
    breakpoints: Breakpoints,
}

impl RadiusProfile {
    pub fn new(spec: &VesselSpec) -> Self {
        Self::from_dimensions(
            spec.head_parameters(),
            spec.outer_diameter(),
            spec.wall_thickness(),
            spec.length(),
        )
    }

    /// da: 외경, s: 두께, length: 전장 [mm]
    pub fn from_dimensions(head: HeadParameters, da: f64, s: f64, length: f64) -> Self {
        let HeadParameters {
            crown_radius: r1,
            knuckle_radius: r2,
            knuckle_height: h2,
        } = head;
        let alpha = (r1 - h2) / (r1 - r2);
        let x1 = h2 - r2 * alpha.sin();
        let end = length - s;
        Self {
            head,
            shell_radius: da / 2.0 - s,
            length,
            wall_thickness: s,
            breakpoints: Breakpoints {
                x1,
                x2: h2,
                x3: end - h2,
                x4: end - x1,
            },
        }
    }

    pub fn head(&self) -> HeadParameters {
        self.head
    }

    pub fn breakpoints(&self) -> Breakpoints {
        self.breakpoints
    }

    /// 원통부 내부 반경 da/2 - s
    pub fn shell_radius(&self) -> f64 {
        self.shell_radius
    }

    /// 뒤쪽 경판 정점 위치 L - s
    pub fn axis_end(&self) -> f64 {
        self.length - self.wall_thickness
    }

    /// 적분 구간 길이 L - 2s
    pub fn integration_length(&self) -> f64 {
        self.length - 2.0 * self.wall_thickness
    }

    pub fn segment(&self, x: f64) -> Segment {
        let Breakpoints { x1, x2, x3, x4 } = self.breakpoints;
        if !(x >= 0.0 && x <= self.axis_end()) {
            Segment::Outside
        } else if x < x1 {
            Segment::FrontCrown
        } else if x < x2 {
            Segment::FrontKnuckle
        } else if x <= x3 {
            Segment::Shell
        } else if x <= x4 {
            Segment::RearKnuckle
        } else {
            Segment::RearCrown
        }
    }

    pub fn sample(&self, x: f64) -> RadiusSample {
        let r1 = self.head.crown_radius;
        match self.segment(x) {
            Segment::FrontCrown => RadiusSample::Radius(self.crown(x - r1)),
            Segment::FrontKnuckle => self.knuckle(x - self.breakpoints.x2),
            Segment::Shell => RadiusSample::Radius(self.shell_radius),
            Segment::RearKnuckle => self.knuckle(x - self.breakpoints.x3),
            Segment::RearCrown => RadiusSample::Radius(self.crown(x - (self.axis_end() - r1))),
            Segment::Outside => RadiusSample::Radius(0.0),
        }
    }

    /// r(x) [mm]. 축 범위 밖과 퇴화 샘플은 0.
    pub fn radius_at(&self, x: f64) -> f64 {
        self.sample(x).radius()
    }

    /// x1 에서 너클 쪽 반경과 구면 쪽 반경의 차이 [mm].
    ///
    /// 규격 계수(h2 의 두께 항 포함)가 기하학적 접선 조건을 정확히 만족하지 않아
    /// 0 이 아니다. 원통 반경의 수 % 수준이다.
    pub fn crown_joint_step(&self) -> f64 {
        let x1 = self.breakpoints.x1;
        let knuckle = self.knuckle(x1 - self.breakpoints.x2).radius();
        knuckle - self.crown(x1 - self.head.crown_radius)
    }

    /// 형상이 물리적으로 가능한지 확인한다.
    ///
    /// [x1, x2) 안에서는 |x - x2| ≤ r2·sin(alpha) 이므로 너클 판별식
    /// 4·(r2² - offset²) 은 음수가 되지 않는다. 남는 불가능한 경우는
    /// 구간 순서가 깨지거나 너클 중심 da/2 - s - r2 가 축 반대편으로 넘어가
    /// 반경이 음수가 되는 두꺼운 벽 조합이다. 경판 공식 자체는 이 조건을
    /// 다루지 않는다.
    pub fn is_feasible(&self) -> bool {
        let Breakpoints { x1, x2, .. } = self.breakpoints;
        x1.is_finite() && (0.0..=x2).contains(&x1) && self.knuckle_center() >= 0.0
    }

    fn knuckle_center(&self) -> f64 {
        self.shell_radius - self.head.knuckle_radius
    }

    fn crown(&self, offset: f64) -> f64 {
        let r1 = self.head.crown_radius;
        (r1 * r1 - offset * offset).max(0.0).sqrt()
    }

    /// 너클 원 (r - c)² + offset² = r2² 의 큰 근. c = da/2 - s - r2.
    fn knuckle(&self, offset: f64) -> RadiusSample {
        let r2 = self.head.knuckle_radius;
        let center = self.knuckle_center();
        let b = -2.0 * center;
        let c = center * center + offset * offset - r2 * r2;
        let disc = b * b - 4.0 * c;
        if disc < 0.0 {
            RadiusSample::Degenerate
        } else {
            RadiusSample::Radius((-b + disc.sqrt()) / 2.0)
        }
    }
}
