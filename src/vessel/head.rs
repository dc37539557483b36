use super::HeadType;

/// 경판 형상 파라미터 [mm].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadParameters {
    /// 구면부(crown) 반경 r1
    pub crown_radius: f64,
    /// 너클부 반경 r2
    pub knuckle_radius: f64,
    /// 너클 전이 높이 h2
    pub knuckle_height: f64,
}

/// 외경 da, 두께 s 와 규격으로부터 경판 파라미터를 구한다.
///
/// - DIN 28011: r1 = da, r2 = 0.1·da, h2 = 0.1935·da + 0.455·s
/// - DIN 28013: r1 = 0.8·da, r2 = 0.154·da, h2 = 0.255·da + 0.635·s
pub fn derive_head_parameters(head: HeadType, da: f64, s: f64) -> HeadParameters {
    match head {
        HeadType::Din28011 => HeadParameters {
            crown_radius: da,
            knuckle_radius: 0.1 * da,
            knuckle_height: 0.1935 * da + 0.455 * s,
        },
        HeadType::Din28013 => HeadParameters {
            crown_radius: 0.8 * da,
            knuckle_radius: 0.154 * da,
            knuckle_height: 0.255 * da + 0.635 * s,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn din28011_coefficients() {
        let p = derive_head_parameters(HeadType::Din28011, 2000.0, 10.0);
        assert_eq!(p.crown_radius, 2000.0);
        assert!((p.knuckle_radius - 200.0).abs() < 1e-9);
        assert!((p.knuckle_height - 391.55).abs() < 1e-9);
    }

    #[test]
    fn din28013_coefficients() {
        let p = derive_head_parameters(HeadType::Din28013, 2000.0, 10.0);
        assert!((p.crown_radius - 1600.0).abs() < 1e-9);
        assert!((p.knuckle_radius - 308.0).abs() < 1e-9);
        assert!((p.knuckle_height - 516.35).abs() < 1e-9);
    }

    #[test]
    fn crown_never_smaller_than_knuckle() {
        for head in HeadType::ALL {
            for da in [100.0, 850.0, 3200.0] {
                let p = derive_head_parameters(head, da, 5.0);
                assert!(p.crown_radius >= p.knuckle_radius && p.knuckle_radius > 0.0);
            }
        }
    }
}
