/// Floating point type used for every reading and derived quantity.
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-9,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

/// `part / whole * 100`, or exactly `0.0` when `whole <= 0`.
///
/// Every percentage and efficiency figure in the workspace goes through here,
/// so none of them can come out as NaN or infinite.
pub fn percent_of(part: Real, whole: Real) -> Real {
    if whole <= 0.0 || !whole.is_finite() || !part.is_finite() {
        return 0.0;
    }
    let pct = part * 100.0 / whole;
    if pct.is_finite() { pct } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn percent_of_basic() {
        assert_eq!(percent_of(250.0, 1000.0), 25.0);
        assert_eq!(percent_of(-10.0, 100.0), -10.0);
    }

    #[test]
    fn percent_of_guards_non_positive_whole() {
        assert_eq!(percent_of(10.0, 0.0), 0.0);
        assert_eq!(percent_of(10.0, -5.0), 0.0);
        assert_eq!(percent_of(0.0, 0.0), 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn percent_of_is_zero_for_any_non_positive_whole(
            part in -1.0e9_f64..1.0e9_f64,
            whole in -1.0e9_f64..=0.0_f64,
        ) {
            prop_assert_eq!(percent_of(part, whole), 0.0);
        }

        #[test]
        fn percent_of_is_always_finite(part in any::<f64>(), whole in any::<f64>()) {
            prop_assert!(percent_of(part, whole).is_finite());
        }
    }
}
