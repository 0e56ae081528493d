//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Wrap an angle into the half-open range (-pi, pi].
///
/// NaN is passed through unchanged.
pub fn wrap_angle<T>(angle: T) -> T
where
    T: Float + FloatConst
{
    let pi_t = T::PI();
    let tau_t = pi_t + pi_t;

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    // rem_euclid lands on [-pi, pi], fold the lower bound onto +pi
    if wrapped <= -pi_t {
        wrapped + tau_t
    }
    else {
        wrapped
    }
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Arithmetic mean of the values, or `None` if there are none.
pub fn mean<T>(values: &[T]) -> Option<T>
where
    T: Float
{
    if values.is_empty() {
        return None;
    }

    let sum = values.iter().fold(T::zero(), |acc, v| acc + *v);

    Some(sum / T::from(values.len())?)
}

/// Population standard deviation of the values, or `None` if there are none.
pub fn std_dev<T>(values: &[T]) -> Option<T>
where
    T: Float
{
    let mu = mean(values)?;

    let sq_dev = values
        .iter()
        .fold(T::zero(), |acc, v| acc + (*v - mu).powi(2));

    Some((sq_dev / T::from(values.len())?).sqrt())
}

/// Integrate `y` over the sample points `x` using the trapezoidal rule.
///
/// Returns `None` if the slices differ in length. Fewer than two samples
/// integrate to zero.
pub fn trapz<T>(y: &[T], x: &[T]) -> Option<T>
where
    T: Float
{
    if y.len() != x.len() {
        return None;
    }

    let two = T::one() + T::one();

    Some(
        y.windows(2)
            .zip(x.windows(2))
            .fold(T::zero(), |acc, (yw, xw)| {
                acc + (xw[1] - xw[0]) * (yw[0] + yw[1]) / two
            })
    )
}
