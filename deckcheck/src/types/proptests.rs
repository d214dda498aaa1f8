//! Property-based tests for value coercion.

use super::coerce::coerce;
use super::complex::Complex;
use super::declared::{DeclaredType, ScalarType};
use super::value::Value;
use proptest::prelude::*;

fn finite() -> impl Strategy<Value = f64> {
    prop::num::f64::NORMAL | prop::num::f64::ZERO
}

proptest! {
    // Complex numbers survive a display/parse round trip exactly
    #[test]
    fn complex_display_parses_back(re in finite(), im in finite()) {
        let z = Complex::new(re, im);
        let parsed: Complex = z.to_string().parse().unwrap();
        prop_assert_eq!(parsed, z);
    }

    // Any integer is accepted by int, float and complex declarations
    #[test]
    fn integers_widen(i in any::<i64>()) {
        let raw = serde_yaml::Value::from(i);
        prop_assert_eq!(coerce(&raw, ScalarType::Int.into()).unwrap(), Value::Int(i));
        #[allow(clippy::cast_precision_loss)]
        let widened = i as f64;
        prop_assert_eq!(coerce(&raw, ScalarType::Float.into()).unwrap(), Value::Float(widened));
        prop_assert_eq!(
            coerce(&raw, ScalarType::Complex.into()).unwrap(),
            Value::Complex(Complex::from_real(widened))
        );
        prop_assert!(coerce(&raw, ScalarType::Bool.into()).is_err());
        prop_assert!(coerce(&raw, ScalarType::Str.into()).is_err());
    }

    // Strings are only ever accepted as str (or as a complex literal)
    #[test]
    fn strings_are_not_reinterpreted(s in "[a-zA-Z ]{0,16}") {
        let raw = serde_yaml::Value::from(s.as_str());
        prop_assert_eq!(coerce(&raw, ScalarType::Str.into()).unwrap(), Value::Str(s.clone()));
        prop_assert!(coerce(&raw, ScalarType::Int.into()).is_err());
        prop_assert!(coerce(&raw, ScalarType::Float.into()).is_err());
        prop_assert!(coerce(&raw, ScalarType::Bool.into()).is_err());
    }

    // Re-expressing a coerced value as raw input coerces to the same value
    #[test]
    fn to_raw_is_stable(items in prop::collection::vec(finite(), 0..8)) {
        let ty = DeclaredType::List(ScalarType::Float);
        let raw = serde_yaml::Value::Sequence(items.iter().map(|x| serde_yaml::Value::from(*x)).collect());
        let first = coerce(&raw, ty).unwrap();
        let second = coerce(&first.to_raw(), ty).unwrap();
        prop_assert_eq!(first, second);
    }
}
