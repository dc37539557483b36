//! 계산 경로에서 공통으로 사용하는 오류 타입.

use std::fmt;

/// 수치 입력 필드를 식별한다. 오류 메시지와 UI 강조 표시에 사용한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    OuterDiameter,
    WallThickness,
    Length,
    Step,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::OuterDiameter => "outer diameter",
            Field::WallThickness => "wall thickness",
            Field::Length => "length",
            Field::Step => "integration step",
        };
        f.write_str(name)
    }
}

/// 적분 시작 전에 검출되는 입력/형상 오류.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// 알 수 없는 용기 형식 문자열
    #[error("unknown vessel type: {0:?}")]
    UnknownVesselType(String),
    /// 알 수 없는 경판 규격 문자열
    #[error("unknown head type: {0:?}")]
    UnknownHeadType(String),
    /// 숫자로 해석할 수 없는 입력
    #[error("{field}: {text:?} is not a number")]
    InvalidNumber { field: Field, text: String },
    #[error("{field} must be a finite number")]
    NotFinite { field: Field },
    #[error("{field} must be greater than zero (got {value} mm)")]
    NonPositive { field: Field, value: f64 },
    #[error("wall thickness must not be negative (got {0} mm)")]
    NegativeWallThickness(f64),
    /// 두께가 외경의 절반 이상이면 내부 공간이 없다.
    #[error("wall thickness {wall} mm must be less than half the outer diameter {diameter} mm")]
    WallTooThick { wall: f64, diameter: f64 },
    #[error("length {length} mm is too short, it must exceed {minimum:.1} mm")]
    LengthTooShort { length: f64, minimum: f64 },
    /// 앞/뒤 경판의 너클 영역이 서로 겹치는 경우
    #[error("length {length} mm leaves no room for both heads, at least {minimum:.1} mm is needed")]
    HeadsOverlap { length: f64, minimum: f64 },
    /// 너클 판별식이 모든 샘플에서 음수인 불가능한 경판/직경 조합
    #[error("head geometry is infeasible for this diameter and wall thickness")]
    InfeasibleHead,
    #[error("integration step {step} mm must be positive and divide 10 mm evenly")]
    InvalidStep { step: f64 },
}

/// 충전 곡선 계산 오류.
#[derive(Debug, thiserror::Error)]
pub enum CalcError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// 진행 콜백이 취소를 요청한 경우. 부분 결과는 반환하지 않는다.
    #[error("calculation cancelled")]
    Cancelled,
}
