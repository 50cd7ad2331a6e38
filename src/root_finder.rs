//! Bracketing root finder shared by every event-refinement step.
//!
//! The event engine refines crossings of many small scalar predicates (coordinate
//! sign changes, limb contacts, mutual contacts). Each predicate is a value
//! implementing [`ScalarFn`], holding only the immutable inputs it needs, so the
//! solver can be nested and called from several places with different functions.
//!
//! A missing sign change is not an error: [`find_root`] returns `None` and the
//! caller simply discards its candidate.

/// A scalar function of one variable (here always a Julian day).
pub trait ScalarFn {
    fn eval(&self, x: f64) -> f64;
}

impl<F> ScalarFn for F
where
    F: Fn(f64) -> f64,
{
    #[inline]
    fn eval(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Find a zero of `f` inside `[a, b]` by bisection.
///
/// Arguments
/// ---------
/// * `f`: the function to solve.
/// * `a`, `b`: bracket ends (`a < b` is not required).
/// * `eps`: stop when the bracket width falls below this value.
///
/// Return
/// ------
/// * `Some(x)` with `x` the midpoint of the final bracket,
/// * `None` when `f(a)` and `f(b)` share the same sign, or when `f` is not finite
///   at an evaluated point.
pub fn find_root<F: ScalarFn + ?Sized>(f: &F, a: f64, b: f64, eps: f64) -> Option<f64> {
    let (mut lo, mut hi) = (a, b);
    let mut f_lo = f.eval(lo);
    let f_hi = f.eval(hi);

    if !f_lo.is_finite() || !f_hi.is_finite() || f_lo * f_hi > 0.0 {
        return None;
    }

    // Upper bound on halvings; reached only if eps underflows the bracket resolution
    const MAX_ITER: usize = 200;

    for _ in 0..MAX_ITER {
        if (hi - lo).abs() < eps {
            break;
        }
        let mid = 0.5 * (lo + hi);
        let f_mid = f.eval(mid);
        if !f_mid.is_finite() {
            return None;
        }
        if f_lo * f_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    Some(0.5 * (lo + hi))
}
