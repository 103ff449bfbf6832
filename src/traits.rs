use num_complex::Complex;

/// the part of a sample that enters a real-valued spectrogram
pub trait ToReal<Output> {
    fn to_real(&self) -> Output;
}

impl<T> ToReal<T> for Complex<T>
where
    T: Copy,
{
    /// plus polarisation of h = h+ - i hx
    fn to_real(&self) -> T {
        self.re
    }
}

impl<T> ToReal<T> for T
where
    T: Copy,
{
    fn to_real(&self) -> T {
        *self
    }
}
