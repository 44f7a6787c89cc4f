//! Shared motion formulas.

/// Damped harmonic force toward a target.
///
/// `tension * displacement - dampening * speed`, the per-channel force a
/// spring applies each tick. Pure; also usable standalone by host-side
/// consumers such as ride-height suspension.
#[inline]
pub fn simple_harmonic_motion(tension: f32, displacement: f32, dampening: f32, speed: f32) -> f32 {
    tension * displacement - dampening * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn force_balances_tension_against_damping() {
        assert_eq!(simple_harmonic_motion(50.0, 2.0, 10.0, 0.0), 100.0);
        assert_eq!(simple_harmonic_motion(50.0, 0.0, 10.0, 3.0), -30.0);
        // At equilibrium both terms cancel.
        assert_eq!(simple_harmonic_motion(50.0, 1.0, 10.0, 5.0), 0.0);
    }
}
