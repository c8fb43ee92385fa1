//! Per-operator ADSR envelope generator

use super::tables::ATTENUATION_INCREMENT;

/// Silence, in 10-bit attenuation units
pub const MAX_ATTENUATION: f64 = 1023.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum EnvelopePhase {
    Attack = 0,
    Decay = 1,
    Sustain = 2,
    Release = 3,
}

impl EnvelopePhase {
    fn next(self) -> Self {
        match self {
            Self::Attack => Self::Decay,
            Self::Decay => Self::Sustain,
            other => other,
        }
    }
}

/// Rate and end point of one envelope phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseParams {
    /// 5-bit rate
    pub rate: u8,
    /// Attenuation at which the phase stops moving
    pub target: f64,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    phase: EnvelopePhase,
    params: [PhaseParams; 4],
    attenuation: f64,
    counter: u32,
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

impl Envelope {
    pub fn new() -> Self {
        Self {
            phase: EnvelopePhase::Release,
            params: [
                PhaseParams { rate: 0, target: 0.0 },
                PhaseParams { rate: 0, target: MAX_ATTENUATION },
                PhaseParams { rate: 0, target: MAX_ATTENUATION },
                PhaseParams { rate: 0, target: MAX_ATTENUATION },
            ],
            attenuation: MAX_ATTENUATION,
            counter: 0,
        }
    }

    pub fn phase(&self) -> EnvelopePhase {
        self.phase
    }

    pub fn attenuation(&self) -> f64 {
        self.attenuation
    }

    pub fn params(&self, phase: EnvelopePhase) -> PhaseParams {
        self.params[phase as usize]
    }

    /// Restart the attack from the current level. The attack step only moves whole units,
    /// so a fractional level left by Decay or Release is dropped first.
    pub fn key_on(&mut self) {
        self.attenuation = self.attenuation.trunc();
        self.phase = EnvelopePhase::Attack;
    }

    pub fn key_off(&mut self) {
        self.phase = EnvelopePhase::Release;
    }

    pub fn set_rate(&mut self, phase: EnvelopePhase, rate: u8) {
        self.params[phase as usize].rate = rate & 0x1f;
    }

    /// Decay end point, 0-120 after the register's x8 scaling
    pub fn set_sustain_level(&mut self, level: u8) {
        self.params[EnvelopePhase::Decay as usize].target = level as f64;
    }

    /// Advance the generator by one envelope clock.
    ///
    /// `key_scaling_note` raises the effective rate of higher notes; `key_scaling_factor`
    /// (0-3) controls by how much.
    pub fn step(&mut self, key_scaling_note: u8, key_scaling_factor: u8) {
        let current = self.params[self.phase as usize];

        let mut rate = current.rate as u32;
        if rate > 0 {
            rate *= 2;
            rate += (key_scaling_note as u32) >> (3 - (key_scaling_factor as u32 & 3));
            rate = rate.min(63);
        }

        let shift = 11u32.saturating_sub(rate >> 2);
        self.counter = self.counter.wrapping_add(1);
        if self.counter % (1 << shift) != 0 {
            return;
        }

        let increment = ATTENUATION_INCREMENT[rate as usize] as f64 / 8.0;
        if self.phase == EnvelopePhase::Attack {
            // Exponential approach: the step shrinks with the remaining attenuation
            let att = self.attenuation as i32;
            let delta = (((!att) as f64 * increment) as i32) >> 4;
            self.attenuation = (self.attenuation + delta as f64).max(0.0);

            if self.attenuation <= current.target {
                self.attenuation = current.target;
                self.phase = self.phase.next();
            }
        } else {
            self.attenuation += increment;

            if self.attenuation >= current.target {
                self.attenuation = current.target;
                if self.phase == EnvelopePhase::Decay {
                    self.phase = self.phase.next();
                }
            }
        }
        self.attenuation = self.attenuation.clamp(0.0, MAX_ATTENUATION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_until<F: Fn(&Envelope) -> bool>(env: &mut Envelope, limit: usize, done: F) -> usize {
        for i in 0..limit {
            if done(env) {
                return i;
            }
            env.step(0, 0);
        }
        limit
    }

    #[test]
    fn test_initial_state() {
        let env = Envelope::new();
        assert_eq!(env.phase(), EnvelopePhase::Release);
        assert_eq!(env.attenuation(), MAX_ATTENUATION);
    }

    #[test]
    fn test_key_on_off_from_any_phase() {
        let mut env = Envelope::new();
        for _ in 0..3 {
            env.key_on();
            assert_eq!(env.phase(), EnvelopePhase::Attack);
            env.key_on();
            assert_eq!(env.phase(), EnvelopePhase::Attack);
            env.key_off();
            assert_eq!(env.phase(), EnvelopePhase::Release);
            env.key_off();
            assert_eq!(env.phase(), EnvelopePhase::Release);
        }
    }

    #[test]
    fn test_attack_is_monotonic_and_enters_decay_once() {
        let mut env = Envelope::new();
        env.set_rate(EnvelopePhase::Attack, 20);
        env.set_rate(EnvelopePhase::Decay, 0);
        env.set_sustain_level(0x7f);
        env.key_on();

        let mut previous = env.attenuation();
        let mut transitions = 0;
        for _ in 0..200_000 {
            let was_attack = env.phase() == EnvelopePhase::Attack;
            env.step(0, 0);
            if was_attack {
                assert!(env.attenuation() <= previous);
                if env.phase() == EnvelopePhase::Decay {
                    transitions += 1;
                    assert_eq!(env.attenuation(), 0.0);
                } else {
                    assert!(env.attenuation() > 0.0);
                }
            }
            previous = env.attenuation();
        }
        assert_eq!(transitions, 1);
        assert_eq!(env.phase(), EnvelopePhase::Decay);
    }

    #[test]
    fn test_attack_rate_zero_never_moves() {
        let mut env = Envelope::new();
        env.key_on();
        for _ in 0..10_000 {
            env.step(31, 3);
        }
        assert_eq!(env.phase(), EnvelopePhase::Attack);
        assert_eq!(env.attenuation(), MAX_ATTENUATION);
    }

    #[test]
    fn test_decay_reaches_sustain_level_then_holds() {
        let mut env = Envelope::new();
        env.set_rate(EnvelopePhase::Attack, 31);
        env.set_rate(EnvelopePhase::Decay, 16);
        env.set_rate(EnvelopePhase::Sustain, 0);
        env.set_sustain_level(15 * 8);
        env.key_on();

        run_until(&mut env, 100_000, |e| e.phase() == EnvelopePhase::Decay);
        assert_eq!(env.phase(), EnvelopePhase::Decay);

        let mut previous = env.attenuation();
        while env.phase() == EnvelopePhase::Decay {
            env.step(0, 0);
            assert!(env.attenuation() >= previous);
            if env.phase() == EnvelopePhase::Decay {
                assert!(env.attenuation() < 120.0);
            }
            previous = env.attenuation();
        }
        assert_eq!(env.phase(), EnvelopePhase::Sustain);
        assert_eq!(env.attenuation(), 120.0);

        for _ in 0..100_000 {
            env.step(0, 0);
        }
        assert_eq!(env.phase(), EnvelopePhase::Sustain);
        assert_eq!(env.attenuation(), 120.0);
    }

    #[test]
    fn test_release_saturates_at_silence() {
        let mut env = Envelope::new();
        env.set_rate(EnvelopePhase::Attack, 31);
        env.set_rate(EnvelopePhase::Release, 31);
        env.key_on();
        run_until(&mut env, 100_000, |e| e.phase() != EnvelopePhase::Attack);
        env.key_off();
        for _ in 0..100_000 {
            env.step(0, 0);
        }
        assert_eq!(env.phase(), EnvelopePhase::Release);
        assert_eq!(env.attenuation(), MAX_ATTENUATION);
    }

    #[test]
    fn test_retrigger_mid_decay_reaches_decay() {
        let mut env = Envelope::new();
        env.set_rate(EnvelopePhase::Attack, 31);
        env.set_rate(EnvelopePhase::Decay, 9);
        env.set_sustain_level(15 * 8);
        env.key_on();
        run_until(&mut env, 100_000, |e| e.phase() == EnvelopePhase::Decay);

        // Decay rate 9 moves in 0.75 steps
        run_until(&mut env, 100_000, |e| {
            e.attenuation() > 30.0 && e.attenuation().fract() != 0.0
        });
        assert_eq!(env.phase(), EnvelopePhase::Decay);
        assert_ne!(env.attenuation().fract(), 0.0);

        env.set_rate(EnvelopePhase::Attack, 10);
        env.key_on();
        let steps = run_until(&mut env, 1_000_000, |e| e.phase() != EnvelopePhase::Attack);
        assert!(steps < 1_000_000, "attack stalled at {}", env.attenuation());
        assert_eq!(env.phase(), EnvelopePhase::Decay);
        assert_eq!(env.attenuation(), 0.0);
    }

    #[test]
    fn test_key_scaling_speeds_up_rate() {
        let mut slow = Envelope::new();
        let mut fast = Envelope::new();
        for env in [&mut slow, &mut fast] {
            env.set_rate(EnvelopePhase::Attack, 8);
            env.key_on();
        }
        let slow_steps = run_until(&mut slow, 1_000_000, |e| e.phase() != EnvelopePhase::Attack);
        let mut fast_steps = 0;
        while fast.phase() == EnvelopePhase::Attack && fast_steps < 1_000_000 {
            fast.step(31, 3);
            fast_steps += 1;
        }
        assert!(fast_steps < slow_steps);
    }
}
