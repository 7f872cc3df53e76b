/// Assert that two scalars are equal within the given epsilon.
#[cfg(test)]
macro_rules! assert_scalar_eq {
    ($a:expr, $b:expr, $eps:expr, $debug:expr) => {{
        // Evaluate each expression once.
        let a: f64 = $a;
        let b: f64 = $b;
        let eps: f64 = $eps;
        let error = (a - b).abs();
        if error > eps {
            eprintln!("{:?}", $debug);
        }
        assert!(
            error <= eps,
            "Assertion failed: |({}) - ({})| = {:e} <= {:e}",
            a,
            b,
            error,
            eps
        );
    }};
    ($a:expr, $b:expr, $eps:expr) => {
        $crate::macros::assert_scalar_eq!($a, $b, $eps, "")
    };
    ($a:expr, $b:expr) => {
        $crate::macros::assert_scalar_eq!($a, $b, 1e-12)
    };
}

#[cfg(test)]
pub(crate) use assert_scalar_eq;
