/// Trait for types that can be animated by interpolating between values
pub trait Animatable: Clone + PartialEq + 'static {
    /// Interpolation between two values
    /// t = 0.0 returns exactly `from`, t = 1.0 returns exactly `to`
    fn lerp(from: &Self, to: &Self, t: f32) -> Self;
}

impl Animatable for f32 {
    // Weighted form rather than `from + (to - from) * t` so both endpoints are exact.
    fn lerp(from: &Self, to: &Self, t: f32) -> Self {
        from * (1.0 - t) + to * t
    }
}

/// Whole-record interpolation, usually derived with `#[derive(Interpolate)]`
pub trait Interpolate: Sized {
    fn interpolate(from: &Self, to: &Self, t: f32) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_f32_lerp() {
        assert_eq!(f32::lerp(&0.0, &10.0, 0.0), 0.0);
        assert_eq!(f32::lerp(&0.0, &10.0, 0.5), 5.0);
        assert_eq!(f32::lerp(&0.0, &10.0, 1.0), 10.0);
    }

    #[test]
    fn test_f32_lerp_endpoints_exact() {
        let from = 0.1f32;
        let to = 123.456f32;
        assert_eq!(f32::lerp(&from, &to, 0.0).to_bits(), from.to_bits());
        assert_eq!(f32::lerp(&from, &to, 1.0).to_bits(), to.to_bits());
    }

    #[test]
    fn test_f32_lerp_descending() {
        assert_eq!(f32::lerp(&90.0, &0.0, 0.5), 45.0);
    }
}
