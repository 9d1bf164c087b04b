//! Deterministic spawn stream.
//!
//! Each run stage gets its own [`SpawnRng`], seeded from the run seed and the
//! stage number. Spawns draw from it in order, so a replay with the same seed
//! and the same frame timing sees the same obstacle sequence, and stage 2 of
//! a run never repeats stage 1.

/// Golden-ratio increment of the SplitMix64 sequence.
const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 stream used to pick what spawns next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnRng {
    state: u64,
}

impl SpawnRng {
    /// Stream for one stage of a run.
    pub fn for_stage(run_seed: u64, stage: u32) -> Self {
        let mut rng = Self {
            state: run_seed ^ u64::from(stage).rotate_left(32),
        };
        // Burn one value so neighbouring seeds do not start in lockstep.
        rng.next_u64();
        rng
    }

    /// Next raw value.
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform value in `0..bound`. A zero bound yields zero.
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            return 0;
        }
        ((self.next_u64() >> 32) * u64::from(bound) >> 32) as u32
    }

    /// Picks one entry with probability proportional to its weight.
    ///
    /// Returns `None` when every weight is zero.
    pub fn pick_weighted<T: Copy>(&mut self, choices: &[(T, u32)]) -> Option<T> {
        let total: u32 = choices.iter().map(|(_, weight)| weight).sum();
        let mut roll = self.below(total);
        for &(choice, weight) in choices {
            if roll < weight {
                return Some(choice);
            }
            roll -= weight;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_and_stage_replay_the_same_stream() {
        let mut a = SpawnRng::for_stage(42, 1);
        let mut b = SpawnRng::for_stage(42, 1);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn stages_get_distinct_streams() {
        let first: Vec<_> = {
            let mut rng = SpawnRng::for_stage(7, 1);
            (0..8).map(|_| rng.next_u64()).collect()
        };
        let second: Vec<_> = {
            let mut rng = SpawnRng::for_stage(7, 2);
            (0..8).map(|_| rng.next_u64()).collect()
        };
        assert_ne!(first, second);
    }

    #[test]
    fn below_stays_in_bounds() {
        let mut rng = SpawnRng::for_stage(3, 1);
        assert_eq!(rng.below(0), 0);
        for _ in 0..1_000 {
            assert!(rng.below(100) < 100);
        }
        assert_eq!(rng.below(1), 0);
    }

    #[test]
    fn weighted_pick_skips_zero_weights() {
        let mut rng = SpawnRng::for_stage(9, 1);
        for _ in 0..200 {
            assert_eq!(rng.pick_weighted(&[('a', 0), ('b', 5), ('c', 0)]), Some('b'));
        }
        assert_eq!(rng.pick_weighted::<char>(&[('a', 0)]), None);
        assert_eq!(rng.pick_weighted::<char>(&[]), None);
    }

    #[test]
    fn weighted_pick_roughly_follows_weights() {
        let mut rng = SpawnRng::for_stage(11, 1);
        let heavy = (0..10_000)
            .filter(|_| rng.pick_weighted(&[(true, 80), (false, 20)]) == Some(true))
            .count();
        assert!((7_500..8_500).contains(&heavy), "{heavy}");
    }
}
