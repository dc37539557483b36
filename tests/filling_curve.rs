use tank_filling_curve::{
    CalcError, FillingCurve, FillingCurveService, HeadType, NoProgress, ValidationError,
    VesselInput, VesselSpec, VesselType,
};

fn assert_close(actual: f64, expected: f64, rel_tol: f64) {
    let scale = expected.abs().max(1e-12);
    assert!(
        ((actual - expected) / scale).abs() <= rel_tol,
        "actual={actual} expected={expected} rel_tol={rel_tol}"
    );
}

fn compute(vessel: VesselType, head: HeadType, da: f64, s: f64, l: f64) -> FillingCurve {
    let spec = VesselSpec::new(vessel, head, da, s, l).expect("valid vessel");
    FillingCurveService::default()
        .compute(&spec, &mut NoProgress)
        .expect("filling curve")
}

#[test]
fn vertical_klopper_reference_vessel() {
    let curve = compute(VesselType::Vertical, HeadType::Din28011, 2000.0, 10.0, 4000.0);
    let first = curve.first().unwrap();
    assert_eq!(first.level_cm, 0.0);
    assert_eq!(format!("{:.2}", first.volume_m3), "0.00");

    let last = curve.last().unwrap();
    assert_eq!(last.level_cm, 398.0);
    assert_eq!(curve.len(), 399);
    // 원통부 + 두 경판 (≈ 0.1·di³ 씩) ≈ 11.43 m³
    assert_close(last.volume_m3, 11.43, 0.01);
    assert!(curve.is_monotone());
}

#[test]
fn horizontal_matches_vertical_total() {
    let service = FillingCurveService::default();
    for head in HeadType::ALL {
        let vertical = VesselSpec::new(VesselType::Vertical, head, 1000.0, 5.0, 2500.0).unwrap();
        let horizontal = vertical.with_vessel_type(VesselType::Horizontal);
        assert_eq!(horizontal.outer_diameter(), vertical.outer_diameter());
        let v = service.compute(&vertical, &mut NoProgress).unwrap();
        let h = service.compute(&horizontal, &mut NoProgress).unwrap();
        assert_close(h.total_volume_m3(), v.total_volume_m3(), 1e-3);
        assert!(v.is_monotone() && h.is_monotone(), "{head:?}");
    }
}

#[test]
fn horizontal_reference_vessel_agrees_with_vertical() {
    let v = compute(VesselType::Vertical, HeadType::Din28011, 2000.0, 10.0, 4000.0);
    let h = compute(VesselType::Horizontal, HeadType::Din28011, 2000.0, 10.0, 4000.0);
    assert_eq!(h.last().unwrap().level_cm, 198.0);
    assert_close(h.total_volume_m3(), v.total_volume_m3(), 1e-3);
}

#[test]
fn korbbogen_head_holds_less_than_klopper() {
    let klopper = compute(VesselType::Vertical, HeadType::Din28011, 2000.0, 10.0, 4000.0);
    let korb = compute(VesselType::Vertical, HeadType::Din28013, 2000.0, 10.0, 4000.0);
    assert!(korb.total_volume_m3() < klopper.total_volume_m3());
    assert_close(korb.total_volume_m3(), 11.21, 0.01);
}

#[test]
fn small_vessel_values() {
    let v = compute(VesselType::Vertical, HeadType::Din28011, 600.0, 4.0, 1500.0);
    assert_eq!(v.len(), 150);
    assert_close(v.total_volume_m3(), 0.3897, 1e-3);

    let h = compute(VesselType::Horizontal, HeadType::Din28013, 600.0, 4.0, 1500.0);
    assert_eq!(h.len(), 60);
    assert_eq!(h.last().unwrap().level_cm, 59.0);
    assert_close(h.total_volume_m3(), 0.3829, 1e-3);
}

#[test]
fn half_full_horizontal_holds_half() {
    let h = compute(VesselType::Horizontal, HeadType::Din28011, 1000.0, 5.0, 2500.0);
    let total = h.total_volume_m3();
    // 액위 49.5 cm 가 축 높이
    let mid = h.volume_at_level(49.5).unwrap();
    assert_close(mid, total / 2.0, 0.02);
}

#[test]
fn wall_of_half_diameter_is_rejected_before_integration() {
    let input = VesselInput {
        vessel_type: "horizontal".into(),
        head_type: "din28011".into(),
        outer_diameter: "2000".into(),
        wall_thickness: "1000".into(),
        length: "4000".into(),
    };
    let mut reports = 0;
    let mut sink = |_: f64| reports += 1;
    let err = FillingCurveService::default()
        .compute_input(&input, &mut sink)
        .unwrap_err();
    assert!(matches!(
        err,
        CalcError::Validation(ValidationError::WallTooThick { .. })
    ));
    assert_eq!(reports, 0);
}

#[test]
fn text_input_with_decimal_comma() {
    let input = VesselInput {
        vessel_type: "vertical".into(),
        head_type: "DIN 28013".into(),
        outer_diameter: "1000,0".into(),
        wall_thickness: " 5 ".into(),
        length: "2500".into(),
    };
    let curve = FillingCurveService::default()
        .compute_input(&input, &mut NoProgress)
        .unwrap();
    assert_eq!(curve.len(), 250);
    assert_close(curve.total_volume_m3(), 1.786, 1e-3);
}

#[test]
fn unparsable_number_names_the_field() {
    let input = VesselInput {
        vessel_type: "vertical".into(),
        head_type: "din28011".into(),
        outer_diameter: "2000".into(),
        wall_thickness: "ten".into(),
        length: "4000".into(),
    };
    let err = VesselSpec::parse(&input).unwrap_err();
    assert!(matches!(err, ValidationError::InvalidNumber { .. }));
    assert!(err.to_string().contains("ten"), "{err}");
}
