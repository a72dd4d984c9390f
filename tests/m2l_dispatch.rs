//! Test capability dispatch of single M2L translations
use approx::assert_relative_eq;
use fmm_m2l::traits::{Context, Expansion, M2lOperator, Unsupported};
use fmm_m2l::{ExpansionTraits, FmmContext, FmmError, Laplace3dExpansion, M2l, Point};

/// An expansion that only supports direct evaluation
struct NearField;

impl Expansion for NearField {
    type Multipole = [f64; 4];
    type Local = [f64; 4];
    type Point = Point<f64>;
    type M2l = Unsupported;
}

#[test]
fn test_evaluate_matches_operator() {
    let expansion = Laplace3dExpansion::<f64>::new();
    let mut context = FmmContext::new(expansion);

    let multipole = [1.5, 0.1, -0.05, 0.2];
    let source = context.add_region(Point::new(0.5, 0.5, 0.5), multipole);
    let target = context.add_region_with_local(
        Point::new(3.5, -1.5, 2.5),
        [0.0; 4],
        [0.1, 0.2, 0.3, 0.4],
    );

    M2l::evaluate(&mut context, &source, &target).unwrap();

    let mut expected = [0.1, 0.2, 0.3, 0.4];
    expansion.m2l(
        &multipole,
        &mut expected,
        &(Point::new(3.5, -1.5, 2.5) - Point::new(0.5, 0.5, 0.5)),
    );

    let local = context.local_value(&target);
    for (value, expected) in local.iter().zip(expected.iter()) {
        assert_relative_eq!(*value, *expected, epsilon = 1e-15);
    }
}

#[test]
fn test_translate_matches_evaluate() {
    let mut context = FmmContext::new(Laplace3dExpansion::<f64>::new());
    let source = context.add_region(Point::new(0.0, 0.0, 0.0), [1.0, 0.0, 0.0, 0.1]);
    let via_evaluate = context.add_region(Point::new(0.0, 4.0, 0.0), [0.0; 4]);
    let via_translate = context.add_region(Point::new(0.0, 4.0, 0.0), [0.0; 4]);

    M2l::evaluate(&mut context, &source, &via_evaluate).unwrap();
    M2l::translate(&mut context, &source, &via_translate);

    assert_eq!(
        context.local_value(&via_evaluate),
        context.local_value(&via_translate)
    );
}

#[test]
fn test_unsupported_expansion() {
    let mut context = FmmContext::new(NearField);
    let source = context.add_region(Point::new(0.0, 0.0, 0.0), [1.0, 2.0, 3.0, 4.0]);
    let target = context.add_region_with_local(
        Point::new(10.0, 0.0, 0.0),
        [0.0; 4],
        [5.0, 6.0, 7.0, 8.0],
    );

    let err = M2l::evaluate(&mut context, &source, &target).unwrap_err();

    assert!(matches!(
        err,
        FmmError::UnsupportedOperation {
            operation: "M2L",
            ..
        }
    ));
    assert!(err.to_string().contains("NearField"));
    assert_eq!(context.local_value(&target), [5.0, 6.0, 7.0, 8.0]);
    assert_eq!(*context.multipole(&source), [1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn test_expansion_traits_display() {
    assert!(ExpansionTraits::<Laplace3dExpansion<f64>>::has_m2l());
    assert!(!ExpansionTraits::<NearField>::has_m2l());

    let description = ExpansionTraits::<NearField>::new().to_string();
    assert!(description.contains("NearField"));
    assert!(description.contains("has_M2L: false"));
    assert!(description.contains("point_type"));
}
