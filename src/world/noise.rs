//! Seeded 2D gradient noise
//!
//! Deterministic for a fixed seed and continuous in (x, y). The permutation
//! table is shuffled by a `Mulberry32` stream and stored twice over so
//! lattice lookups never need to wrap.

use crate::core::rng::Mulberry32;

/// Smoothing curve 6t⁵ − 15t⁴ + 10t³
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of (x, y) with one of four diagonal gradients
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    let h = hash & 3;
    let gx = if h & 1 != 0 { -x } else { x };
    let gy = if h & 2 != 0 { -y } else { y };
    gx + gy
}

#[derive(Debug, Clone)]
pub struct GradientNoise {
    perm: [u8; 512],
}

impl GradientNoise {
    pub fn new(seed: u32) -> Self {
        let mut rng = Mulberry32::new(seed);
        let mut perm = [0u8; 512];
        for (i, p) in perm.iter_mut().take(256).enumerate() {
            *p = i as u8;
        }

        for i in 0..256 {
            let j = i + (rng.next_unit() * (256 - i) as f64) as usize;
            perm.swap(i, j);
            perm[i + 256] = perm[i];
        }

        Self { perm }
    }

    fn p(&self, index: usize) -> usize {
        self.perm[index] as usize
    }

    /// Sample the noise field; always in [-1, 1]
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;
        let x = x - xf;
        let y = y - yf;

        let u = fade(x);
        let v = fade(y);

        let a = self.p(xi) + yi;
        let b = self.p(xi + 1) + yi;

        let value = lerp(
            v,
            lerp(u, grad(self.perm[a], x, y), grad(self.perm[b], x - 1.0, y)),
            lerp(
                u,
                grad(self.perm[a + 1], x, y - 1.0),
                grad(self.perm[b + 1], x - 1.0, y - 1.0),
            ),
        );

        value.clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permutation_is_a_shuffle() {
        let noise = GradientNoise::new(1234);
        let mut seen = [false; 256];
        for &p in &noise.perm[..256] {
            seen[p as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert_eq!(&noise.perm[..256], &noise.perm[256..]);
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = GradientNoise::new(77);
        let b = GradientNoise::new(77);
        for i in 0..50 {
            let x = i as f64 * 0.37;
            let y = i as f64 * 0.11;
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let noise = GradientNoise::new(5);
        assert_eq!(noise.sample(3.0, 4.0), 0.0);
        assert_eq!(noise.sample(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_range_and_continuity() {
        let noise = GradientNoise::new(2024);
        let step = 0.01;
        for i in 0..500 {
            let x = i as f64 * 0.053;
            let y = i as f64 * 0.029;
            let v = noise.sample(x, y);
            assert!((-1.0..=1.0).contains(&v));
            let near = noise.sample(x + step, y);
            assert!((v - near).abs() < 0.1, "jump at ({}, {}): {} -> {}", x, y, v, near);
        }
    }
}
