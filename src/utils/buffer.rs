use object_pool::{Pool, Reusable};
use rustfft::num_complex::Complex;
use rustfft::num_traits::Zero;

use crate::float::Float;

pub fn new_real_buffer<T: Float>(size: usize) -> Vec<T> {
    vec![T::zero(); size]
}

pub fn new_complex_buffer<T: Float>(size: usize) -> Vec<Complex<T>> {
    vec![Complex::zero(); size]
}

/// Copy `input` into the real part of `output` and zero the rest of `output`.
pub fn copy_real_to_complex<T: Float>(input: &[T], output: &mut [Complex<T>]) {
    assert!(input.len() <= output.len());
    input.iter().zip(output.iter_mut()).for_each(|(i, o)| {
        o.re = *i;
        o.im = T::zero();
    });
    output[input.len()..]
        .iter_mut()
        .for_each(|o| *o = Complex::zero())
}

/// Copy the real part of `input` into `output`, which may be shorter.
pub fn copy_complex_to_real<T: Float>(input: &[Complex<T>], output: &mut [T]) {
    input
        .iter()
        .map(|c| c.re)
        .zip(output.iter_mut())
        .for_each(|(i, o)| *o = i);
}

/// Computes |x|^2 for each complex value x in `arr`. This function
/// modifies `arr` in place and leaves the complex component zero.
pub fn modulus_squared<T: Float>(arr: &mut [Complex<T>]) {
    for s in arr {
        s.re = s.re * s.re + s.im * s.im;
        s.im = T::zero();
    }
}

/// Compute the sum of the square of each element of `arr`.
pub fn square_sum<T: Float>(arr: &[T]) -> T {
    arr.iter().map(|&s| s * s).sum::<T>()
}

/// Root mean square of `arr`; zero for an empty slice.
pub fn rms<T: Float>(arr: &[T]) -> T {
    if arr.is_empty() {
        return T::zero();
    }
    (square_sum(arr) / T::from_index(arr.len())).sqrt()
}

/// A pool of real/complex buffer objects. Buffers are dynamically created as needed
/// and reused if previously `Drop`ed. Buffers are never freed. Instead buffers are kept
/// in reserve and reused when a new buffer is requested.
///
/// Real and complex buffers have different lengths: a detector needs a real
/// working copy of the window and zero-padded complex buffers for the FFT.
///
/// ```rust
/// use pitch_estimator::utils::buffer::BufferPool;
///
/// let buffers = BufferPool::<f32>::new(3, 6);
/// {
///     let mut buf = buffers.get_real_buffer();
///     buf[1] = 6.6;
/// }
/// // The same buffer comes back, contents and all.
/// let buf = buffers.get_real_buffer();
/// assert_eq!(&buf[..], &[0.0, 6.6, 0.0]);
/// assert_eq!(buffers.get_complex_buffer().len(), 6);
/// ```
pub struct BufferPool<T> {
    real_buffers: Pool<Vec<T>>,
    complex_buffers: Pool<Vec<Complex<T>>>,
    pub real_size: usize,
    pub complex_size: usize,
}

impl<T: Float> BufferPool<T> {
    /// Create a pool with one real and one complex buffer allocated up front.
    pub fn new(real_size: usize, complex_size: usize) -> Self {
        BufferPool {
            real_buffers: Pool::new(1, || new_real_buffer(real_size)),
            complex_buffers: Pool::new(1, || new_complex_buffer(complex_size)),
            real_size,
            complex_size,
        }
    }
    /// Get a reference to a buffer that can be used until it is `Drop`ed.
    pub fn get_real_buffer(&self) -> Reusable<'_, Vec<T>> {
        self.real_buffers.pull(|| new_real_buffer(self.real_size))
    }
    /// Get a reference to a buffer that can be used until it is `Drop`ed.
    pub fn get_complex_buffer(&self) -> Reusable<'_, Vec<Complex<T>>> {
        self.complex_buffers
            .pull(|| new_complex_buffer(self.complex_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_and_complex_pools_have_their_own_sizes() {
        let buffers = BufferPool::<f64>::new(4, 8);
        let real = buffers.get_real_buffer();
        let complex = buffers.get_complex_buffer();
        assert_eq!(real.len(), 4);
        assert_eq!(complex.len(), 8);

        // A second pull while the first is held allocates a fresh buffer.
        let mut extra = buffers.get_real_buffer();
        extra[0] = 1.5;
        assert_eq!(extra.len(), buffers.real_size);
        drop(extra);
        assert_eq!(buffers.get_real_buffer()[0], 1.5);
    }

    #[test]
    fn complex_copies_pad_with_zero() {
        let mut complex = vec![Complex::new(9.0, 9.0); 4];
        copy_real_to_complex(&[1.0, 2.0], &mut complex);
        assert_eq!(
            complex,
            vec![
                Complex::new(1.0, 0.0),
                Complex::new(2.0, 0.0),
                Complex::zero(),
                Complex::zero()
            ]
        );

        modulus_squared(&mut complex);
        let mut real = vec![0.0; 2];
        copy_complex_to_real(&complex, &mut real);
        assert_eq!(real, vec![1.0, 4.0]);
    }

    #[test]
    fn rms_of_known_signals() {
        assert_eq!(rms::<f64>(&[]), 0.0);
        assert_eq!(rms(&[3.0f64, -3.0, 3.0, -3.0]), 3.0);
        let sine: Vec<f64> = (0..1000)
            .map(|i| (2.0 * std::f64::consts::PI * i as f64 / 100.0).sin())
            .collect();
        assert!((rms(&sine) - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }
}
