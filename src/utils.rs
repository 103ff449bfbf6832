use ndarray::{parallel::prelude::*, Array2, ArrayView2, Axis};
use num_traits::{Float, Zero};

/// non-negative frequencies of a real fft of length `n` with sample spacing `d`
pub fn rfftfreq<T>(n: usize, d: T) -> Vec<T>
where
    T: Float,
{
    let nd = T::from(n).unwrap() * d;
    (0..=n / 2).map(|i| T::from(i).unwrap() / nd).collect()
}

pub fn transpose_par<T>(x: ArrayView2<T>) -> Array2<T>
where
    T: Copy + Send + Sync + Zero,
{
    let mut result = Array2::<T>::zeros((x.shape()[1], x.shape()[0]));
    x.axis_iter(Axis(1))
        .into_par_iter()
        .zip(result.axis_iter_mut(Axis(0)).into_par_iter())
        .for_each(|(x_c, mut y_r)| {
            y_r.assign(&x_c);
        });
    result
}

/// largest finite value, NaN if there is none
pub fn finite_max<'a, I>(x: I) -> f64
where
    I: IntoIterator<Item = &'a f64>,
{
    x.into_iter()
        .cloned()
        .filter(|v| v.is_finite())
        .fold(f64::NAN, f64::max)
}
