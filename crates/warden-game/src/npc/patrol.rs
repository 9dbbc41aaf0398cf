//! Random waypoint patrol

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use warden_core::heading::horizontal_distance;

/// Uniform sample from a horizontal disc. The result keeps `center.y`.
pub fn random_point_in_disc<R: Rng + ?Sized>(rng: &mut R, center: Vec3, radius: f32) -> Vec3 {
    if radius <= 0.0 {
        return center;
    }
    // sqrt keeps the density uniform over the area instead of clumping at the center
    let r = radius * rng.gen::<f32>().sqrt();
    let angle = rng.gen_range(0.0..TAU);
    center + Vec3::new(r * angle.cos(), 0.0, r * angle.sin())
}

/// Waypoint bookkeeping for a patrolling NPC
#[derive(Debug, Clone)]
pub struct PatrolRoute {
    /// Center of the patrol disc
    pub origin: Vec3,
    pub radius: f32,
    /// Where the NPC is currently heading
    pub waypoint: Vec3,
    /// Seconds since the waypoint last changed
    pub since_change: f32,
}

impl PatrolRoute {
    /// Start a route with a first waypoint already drawn
    pub fn new<R: Rng + ?Sized>(rng: &mut R, origin: Vec3, radius: f32) -> Self {
        Self {
            origin,
            radius,
            waypoint: random_point_in_disc(rng, origin, radius),
            since_change: 0.0,
        }
    }

    /// Pick a new waypoint now
    pub fn redraw<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.waypoint = random_point_in_disc(rng, self.origin, self.radius);
        self.since_change = 0.0;
    }

    /// Advance the timer and redraw the waypoint if it was reached or has gone
    /// stale. Returns true when a new waypoint was drawn.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        position: Vec3,
        dt: f32,
        reach_distance: f32,
        interval: f32,
        rng: &mut R,
    ) -> bool {
        self.since_change += dt;
        let reached = horizontal_distance(position, self.waypoint) < reach_distance;
        if reached || self.since_change > interval {
            self.redraw(rng);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_samples_stay_inside_disc() {
        let mut rng = StdRng::seed_from_u64(7);
        let center = Vec3::new(5.0, 1.0, -3.0);
        for _ in 0..1000 {
            let p = random_point_in_disc(&mut rng, center, 10.0);
            assert!(horizontal_distance(p, center) <= 10.0 + 1e-4);
            assert_eq!(p.y, 1.0);
        }
    }

    #[test]
    fn test_samples_cover_the_disc() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut outer = 0;
        for _ in 0..2000 {
            let p = random_point_in_disc(&mut rng, Vec3::ZERO, 10.0);
            if horizontal_distance(p, Vec3::ZERO) > 7.07 {
                outer += 1;
            }
        }
        // The outer ring beyond r/√2 holds half of the area
        assert!(outer > 800 && outer < 1200, "outer ring got {outer} of 2000");
    }

    #[test]
    fn test_zero_radius_returns_center() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(random_point_in_disc(&mut rng, Vec3::ONE, 0.0), Vec3::ONE);
    }

    #[test]
    fn test_waypoint_redrawn_when_reached() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut route = PatrolRoute::new(&mut rng, Vec3::ZERO, 10.0);
        let at_waypoint = route.waypoint;
        assert!(route.advance(at_waypoint, 0.1, 1.0, 3.0, &mut rng));
        assert_eq!(route.since_change, 0.0);
    }

    #[test]
    fn test_waypoint_redrawn_after_interval() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut route = PatrolRoute::new(&mut rng, Vec3::ZERO, 10.0);
        // Far away so the waypoint is never reached
        let far = Vec3::new(100.0, 0.0, 100.0);
        assert!(!route.advance(far, 2.0, 1.0, 3.0, &mut rng));
        assert!(!route.advance(far, 1.0, 1.0, 3.0, &mut rng));
        assert!(route.advance(far, 0.5, 1.0, 3.0, &mut rng));
    }
}
