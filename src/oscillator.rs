//! digital oscillator for complex signals with a slowly varying frequency

use num_complex::Complex;
use num_traits::Float;

/// Complex oscillator
pub struct COscillator<T> {
    /// current phase
    phi: T,
    /// phase difference between points
    dphi_dpt: T,
}

impl<T> COscillator<T>
where
    T: Float,
{
    /// constructor
    pub fn new(phi: T, dphi_dpt: T) -> COscillator<T> {
        COscillator { phi, dphi_dpt }
    }

    pub fn phase(&self) -> T {
        self.phi
    }

    /// change the phase step, used to follow a chirp
    pub fn set_rate(&mut self, dphi_dpt: T) {
        self.dphi_dpt = dphi_dpt;
    }

    /// get the next value
    pub fn get(&mut self) -> Complex<T> {
        let y = (Complex::<T>::new(T::zero(), T::one()) * self.phi).exp();
        self.phi = self.phi + self.dphi_dpt;
        y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_follows_rate_changes() {
        let mut osc = COscillator::new(0.0, 0.5);
        let y0 = osc.get();
        assert!((y0 - Complex::new(1.0, 0.0)).norm() < 1e-12);
        osc.get();
        osc.set_rate(1.0);
        osc.get();
        assert!((osc.phase() - 2.0).abs() < 1e-12);
    }
}
