//! 용기 입력값과 형상 모델.

pub mod head;
pub mod profile;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Field, ValidationError};

pub use head::{derive_head_parameters, HeadParameters};
pub use profile::{Breakpoints, RadiusProfile, RadiusSample, Segment};

/// 용기 설치 방향.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VesselType {
    /// 축이 수직. 액위는 축 방향 좌표와 같다.
    Vertical,
    /// 축이 수평. 액위는 축에 직교하는 높이 좌표이다.
    Horizontal,
}

impl VesselType {
    pub const ALL: [VesselType; 2] = [VesselType::Vertical, VesselType::Horizontal];

    pub fn as_code(&self) -> &'static str {
        match self {
            VesselType::Vertical => "vertical",
            VesselType::Horizontal => "horizontal",
        }
    }
}

impl fmt::Display for VesselType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

impl FromStr for VesselType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let norm = s.trim().to_lowercase();
        let norm = norm.strip_suffix(" tank").unwrap_or(&norm).trim();
        match norm {
            "vertical" | "v" => Ok(VesselType::Vertical),
            "horizontal" | "h" => Ok(VesselType::Horizontal),
            _ => Err(ValidationError::UnknownVesselType(s.to_string())),
        }
    }
}

/// 지원하는 접시형(torispherical) 경판 규격.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeadType {
    /// DIN 28011 Klöpperboden
    #[serde(rename = "din28011")]
    Din28011,
    /// DIN 28013 Korbbogenboden
    #[serde(rename = "din28013")]
    Din28013,
}

impl HeadType {
    pub const ALL: [HeadType; 2] = [HeadType::Din28011, HeadType::Din28013];

    pub fn as_code(&self) -> &'static str {
        match self {
            HeadType::Din28011 => "din28011",
            HeadType::Din28013 => "din28013",
        }
    }

    pub fn standard_name(&self) -> &'static str {
        match self {
            HeadType::Din28011 => "DIN 28011 (Klöpperboden)",
            HeadType::Din28013 => "DIN 28013 (Korbbogenboden)",
        }
    }
}

impl fmt::Display for HeadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.standard_name())
    }
}

impl FromStr for HeadType {
    type Err = ValidationError;

    /// "din28011", "DIN 28011", "Torospherical Head (DIN 28011)" 등을 모두 허용한다.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
        match digits.as_str() {
            "28011" => Ok(HeadType::Din28011),
            "28013" => Ok(HeadType::Din28013),
            _ => Err(ValidationError::UnknownHeadType(s.to_string())),
        }
    }
}

/// UI/CLI 에서 받은 원본 텍스트 입력. 검증 전 상태로 설정 파일에도 저장된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VesselInput {
    pub vessel_type: String,
    pub head_type: String,
    /// 외경 [mm]
    pub outer_diameter: String,
    /// 벽 두께 [mm]
    pub wall_thickness: String,
    /// 전장 [mm]
    pub length: String,
}

impl Default for VesselInput {
    fn default() -> Self {
        Self {
            vessel_type: VesselType::Vertical.as_code().to_string(),
            head_type: HeadType::Din28011.as_code().to_string(),
            outer_diameter: String::new(),
            wall_thickness: String::new(),
            length: String::new(),
        }
    }
}

/// 검증을 마친 용기 사양. 생성 이후 변경할 수 없다. 모든 길이는 mm 단위.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselSpec {
    vessel_type: VesselType,
    head_type: HeadType,
    outer_diameter: f64,
    wall_thickness: f64,
    length: f64,
}

impl VesselSpec {
    /// 수치 조건을 검사한 뒤 사양을 생성한다.
    pub fn new(
        vessel_type: VesselType,
        head_type: HeadType,
        outer_diameter: f64,
        wall_thickness: f64,
        length: f64,
    ) -> Result<Self, ValidationError> {
        require_positive(Field::OuterDiameter, outer_diameter)?;
        if !wall_thickness.is_finite() {
            return Err(ValidationError::NotFinite {
                field: Field::WallThickness,
            });
        }
        if wall_thickness < 0.0 {
            return Err(ValidationError::NegativeWallThickness(wall_thickness));
        }
        if wall_thickness >= outer_diameter / 2.0 {
            return Err(ValidationError::WallTooThick {
                wall: wall_thickness,
                diameter: outer_diameter,
            });
        }
        require_positive(Field::Length, length)?;

        let head = derive_head_parameters(head_type, outer_diameter, wall_thickness);
        let min_length = 2.0 * wall_thickness + head.knuckle_height;
        if length <= min_length {
            return Err(ValidationError::LengthTooShort {
                length,
                minimum: min_length,
            });
        }
        // 뒤쪽 너클 시작점(x3)이 앞쪽 너클 끝(x2)보다 앞에 오면 안 된다.
        let no_overlap = wall_thickness + 2.0 * head.knuckle_height;
        if length < no_overlap {
            return Err(ValidationError::HeadsOverlap {
                length,
                minimum: no_overlap,
            });
        }

        Ok(Self {
            vessel_type,
            head_type,
            outer_diameter,
            wall_thickness,
            length,
        })
    }

    /// 텍스트 입력을 해석하고 검증한다.
    pub fn parse(input: &VesselInput) -> Result<Self, ValidationError> {
        let vessel_type: VesselType = input.vessel_type.parse()?;
        let head_type: HeadType = input.head_type.parse()?;
        let da = parse_number(Field::OuterDiameter, &input.outer_diameter)?;
        let s = parse_number(Field::WallThickness, &input.wall_thickness)?;
        let l = parse_number(Field::Length, &input.length)?;
        Self::new(vessel_type, head_type, da, s, l)
    }

    pub fn vessel_type(&self) -> VesselType {
        self.vessel_type
    }

    pub fn head_type(&self) -> HeadType {
        self.head_type
    }

    pub fn outer_diameter(&self) -> f64 {
        self.outer_diameter
    }

    pub fn wall_thickness(&self) -> f64 {
        self.wall_thickness
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn head_parameters(&self) -> HeadParameters {
        derive_head_parameters(self.head_type, self.outer_diameter, self.wall_thickness)
    }

    /// 같은 치수로 설치 방향만 바꾼 사양.
    pub fn with_vessel_type(self, vessel_type: VesselType) -> Self {
        Self {
            vessel_type,
            ..self
        }
    }

    /// 텍스트 입력 형태로 되돌린다. 설정 파일 저장용.
    pub fn to_input(&self) -> VesselInput {
        VesselInput {
            vessel_type: self.vessel_type.as_code().to_string(),
            head_type: self.head_type.as_code().to_string(),
            outer_diameter: self.outer_diameter.to_string(),
            wall_thickness: self.wall_thickness.to_string(),
            length: self.length.to_string(),
        }
    }
}

fn require_positive(field: Field, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field });
    }
    if value <= 0.0 {
        return Err(ValidationError::NonPositive { field, value });
    }
    Ok(())
}

/// 소수점으로 쉼표 하나만 쓴 입력("2000,5")도 허용한다.
pub(crate) fn parse_number(field: Field, text: &str) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    let normalized = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    normalized
        .parse::<f64>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            text: text.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(da: &str, s: &str, l: &str) -> VesselInput {
        VesselInput {
            vessel_type: "Vertical Tank".into(),
            head_type: "Torospherical Head (DIN 28011)".into(),
            outer_diameter: da.into(),
            wall_thickness: s.into(),
            length: l.into(),
        }
    }

    #[test]
    fn parses_form_labels() {
        let spec = VesselSpec::parse(&input("2000", "10", "4000")).unwrap();
        assert_eq!(spec.vessel_type(), VesselType::Vertical);
        assert_eq!(spec.head_type(), HeadType::Din28011);
        assert_eq!(spec.length(), 4000.0);
    }

    #[test]
    fn accepts_decimal_comma_and_whitespace() {
        let spec = VesselSpec::parse(&input(" 2000,5 ", "10", "4000")).unwrap();
        assert!((spec.outer_diameter() - 2000.5).abs() < 1e-12);
    }

    #[test]
    fn rejects_non_numeric_text() {
        let err = VesselSpec::parse(&input("abc", "10", "4000")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNumber {
                field: Field::OuterDiameter,
                text: "abc".into()
            }
        );
    }

    #[test]
    fn rejects_unknown_types() {
        let mut raw = input("2000", "10", "4000");
        raw.vessel_type = "spherical".into();
        assert!(matches!(
            VesselSpec::parse(&raw),
            Err(ValidationError::UnknownVesselType(_))
        ));
        let mut raw = input("2000", "10", "4000");
        raw.head_type = "ellipsoidal 2:1".into();
        assert!(matches!(
            VesselSpec::parse(&raw),
            Err(ValidationError::UnknownHeadType(_))
        ));
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = VesselSpec::parse(&input("NaN", "10", "4000")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotFinite {
                field: Field::OuterDiameter
            }
        );
    }

    #[test]
    fn rejects_wall_as_thick_as_radius() {
        let err = VesselSpec::new(
            VesselType::Vertical,
            HeadType::Din28011,
            2000.0,
            1000.0,
            4000.0,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::WallTooThick { .. }));
    }

    #[test]
    fn rejects_negative_wall() {
        let err =
            VesselSpec::new(VesselType::Vertical, HeadType::Din28013, 2000.0, -1.0, 4000.0)
                .unwrap_err();
        assert_eq!(err, ValidationError::NegativeWallThickness(-1.0));
    }

    #[test]
    fn rejects_length_shorter_than_heads() {
        // h2 = 0.1935 * 2000 + 0.455 * 10 = 391.55 mm
        let err = VesselSpec::new(VesselType::Vertical, HeadType::Din28011, 2000.0, 10.0, 400.0)
            .unwrap_err();
        assert!(matches!(err, ValidationError::LengthTooShort { .. }));
        let err = VesselSpec::new(VesselType::Vertical, HeadType::Din28011, 2000.0, 10.0, 700.0)
            .unwrap_err();
        assert!(matches!(err, ValidationError::HeadsOverlap { .. }));
    }

    #[test]
    fn round_trips_through_text_input() {
        let spec =
            VesselSpec::new(VesselType::Horizontal, HeadType::Din28013, 1200.0, 6.0, 3000.0)
                .unwrap();
        assert_eq!(VesselSpec::parse(&spec.to_input()).unwrap(), spec);
    }
}
