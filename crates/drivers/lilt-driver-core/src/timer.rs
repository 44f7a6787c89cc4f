//! Minimal accumulating timer used for tween delays and wobble auto-stop.

/// Counts elapsed seconds toward a fixed duration.
#[derive(Clone, Debug, Default)]
pub struct Timer {
    duration: f32,
    elapsed: f32,
    running: bool,
    complete: bool,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            elapsed: 0.0,
            running: false,
            complete: false,
        }
    }

    /// A timer already counting down.
    pub fn started(duration: f32) -> Self {
        let mut timer = Self::new(duration);
        timer.start();
        timer
    }

    /// Begin (or restart) counting from zero.
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
        self.complete = self.duration <= 0.0;
        if self.complete {
            self.running = false;
        }
    }

    pub fn set_duration(&mut self, duration: f32) {
        self.duration = duration;
    }

    /// Advance by `dt` seconds. Returns true on the tick the timer finishes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.running = false;
            self.complete = true;
            return true;
        }
        false
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_to_completion_once() {
        let mut timer = Timer::started(0.5);
        assert!(timer.is_running());
        assert!(!timer.tick(0.25));
        assert!(timer.tick(0.3));
        assert!(timer.is_complete());
        assert!(!timer.is_running());
        // Further ticks do not re-fire.
        assert!(!timer.tick(1.0));
    }

    #[test]
    fn zero_duration_completes_immediately_on_start() {
        let mut timer = Timer::new(0.0);
        timer.start();
        assert!(timer.is_complete());
        assert!(!timer.is_running());
    }

    #[test]
    fn restart_clears_elapsed_time() {
        let mut timer = Timer::started(1.0);
        timer.tick(0.9);
        timer.start();
        assert!(!timer.tick(0.5));
        assert!(timer.tick(0.6));
    }
}
