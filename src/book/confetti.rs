use std::time::Duration;

pub const CONFETTI_COLORS: [&str; 6] = [
    "#e74c3c", "#e67e22", "#f1c40f", "#2ecc71", "#3498db", "#9b59b6",
];
pub const DEFAULT_BURST_SIZE: usize = 100;

const MIN_FALL_MS: u64 = 1500;
const FALL_SPREAD_MS: u64 = 2000;
const START_TOP_PX: f32 = -10.0;
/// `cubic-bezier(0.25, 0.46, 0.45, 0.94)`
const FALL_EASING: (f32, f32, f32, f32) = (0.25, 0.46, 0.45, 0.94);

/// One decorative particle. Nothing reads state back from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfettiParticle {
    pub id: u64,
    pub color: &'static str,
    /// Horizontal start in viewport-width percent.
    pub left_vw: f32,
    pub top_px: f32,
    pub opacity: f32,
    pub rotation_deg: f32,
    /// Horizontal drift reached at the end of the fall.
    pub drift_px: f32,
    pub spin_x_deg: f32,
    pub spin_y_deg: f32,
    pub spawned_at: Duration,
    pub duration: Duration,
}

impl ConfettiParticle {
    pub fn finishes_at(&self) -> Duration {
        self.spawned_at.saturating_add(self.duration)
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        now >= self.finishes_at()
    }

    /// Eased animation progress in `[0, 1]`.
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.spawned_at).as_secs_f32();
        let linear = (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0);
        let (x1, y1, x2, y2) = FALL_EASING;
        cubic_bezier(x1, y1, x2, y2, linear)
    }

    /// Position as fractions of the viewport (`x`, `y`), plus the pixel drift
    /// already applied. `y` reaches 1.0 when the particle leaves the bottom.
    pub fn position(&self, now: Duration) -> (f32, f32, f32) {
        let progress = self.progress(now);
        (self.left_vw / 100.0, progress, self.drift_px * progress)
    }
}

#[derive(Debug, Clone)]
pub struct ConfettiField {
    particles: Vec<ConfettiParticle>,
    rng: fastrand::Rng,
    next_id: u64,
}

impl Default for ConfettiField {
    fn default() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }
}

impl ConfettiField {
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            particles: Vec::new(),
            rng,
            next_id: 0,
        }
    }

    pub fn burst(&mut self, now: Duration, count: usize) {
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = self.spawn_particle(now);
            self.particles.push(particle);
        }
    }

    fn spawn_particle(&mut self, now: Duration) -> ConfettiParticle {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        let rng = &mut self.rng;
        ConfettiParticle {
            id,
            color: CONFETTI_COLORS[rng.usize(..CONFETTI_COLORS.len())],
            left_vw: rng.f32() * 100.0,
            top_px: START_TOP_PX,
            opacity: rng.f32(),
            rotation_deg: rng.f32() * 360.0,
            drift_px: rng.f32() * 100.0 - 50.0,
            spin_x_deg: rng.f32() * 360.0,
            spin_y_deg: rng.f32() * 360.0,
            spawned_at: now,
            duration: Duration::from_millis(MIN_FALL_MS + rng.u64(..FALL_SPREAD_MS)),
        }
    }

    /// Drops every particle whose own animation has completed.
    pub fn prune(&mut self, now: Duration) -> usize {
        let before = self.particles.len();
        self.particles.retain(|particle| !particle.is_finished(now));
        before - self.particles.len()
    }

    pub fn particles(&self) -> &[ConfettiParticle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn next_finish(&self) -> Option<Duration> {
        self.particles
            .iter()
            .map(ConfettiParticle::finishes_at)
            .min()
    }
}

/// CSS-style cubic bezier timing function with fixed end points (0,0) and
/// (1,1).
pub fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    let axis = |p1: f32, p2: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
    };

    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    let mut s = t;
    for _ in 0..32 {
        let x = axis(x1, x2, s);
        if (x - t).abs() < 1e-5 {
            break;
        }
        if x < t {
            low = s;
        } else {
            high = s;
        }
        s = (low + high) / 2.0;
    }
    axis(y1, y2, s)
}
