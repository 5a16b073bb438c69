//! Property tests for the circular arithmetic behind both decoders.

use proptest::prelude::*;
use rotor_position::{EncoderState, QepState, exceeds_circular_tolerance, wrap_to_revolution};

const TICKS: u32 = 8192;
const MAX_DELTA: u16 = 1365;

#[allow(clippy::cast_possible_truncation)]
fn to_position(value: i64) -> i16 {
    wrap_to_revolution(value, TICKS) as i16
}

proptest! {
    #[test]
    fn small_circular_steps_are_always_stable(
        start in -4096i64..4096,
        steps in prop::collection::vec(-i64::from(MAX_DELTA)..=i64::from(MAX_DELTA), 1..200),
    ) {
        let mut state = EncoderState::default();
        let mut position = start;
        state.adopt(to_position(position), TICKS, MAX_DELTA);

        for step in steps {
            position += step;
            prop_assert!(state.adopt(to_position(position), TICKS, MAX_DELTA));
        }
    }

    #[test]
    fn latest_sample_is_always_adopted(samples in prop::collection::vec(-4096i16..4096, 1..100)) {
        let mut state = EncoderState::default();
        for sample in samples {
            state.adopt(sample, TICKS, MAX_DELTA);
            prop_assert_eq!(state.position(), sample);
        }
    }

    #[test]
    fn far_jumps_are_unstable(
        old in -4096i16..4096,
        offset in i32::from(MAX_DELTA) + 1..=4096,
    ) {
        let new = to_position(i64::from(old) + i64::from(offset));
        let mut state = EncoderState::default();
        state.adopt(old, TICKS, MAX_DELTA);

        prop_assert!(exceeds_circular_tolerance(-offset, TICKS, MAX_DELTA));
        prop_assert!(!state.adopt(new, TICKS, MAX_DELTA));
        prop_assert_eq!(state.position(), new);
    }

    #[test]
    fn wrapped_value_is_congruent_and_in_range(value in -(1i64 << 62)..(1i64 << 62), ticks in 1u32..100_000) {
        let wrapped = i64::from(wrap_to_revolution(value, ticks));
        let ticks = i64::from(ticks);

        prop_assert!(wrapped >= -(ticks / 2));
        prop_assert!(wrapped < ticks - ticks / 2);
        prop_assert_eq!((value - wrapped).rem_euclid(ticks), 0);
    }

    #[test]
    fn continuous_position_tracks_every_step(
        steps in prop::collection::vec(-32767i64..=32767, 1..300),
    ) {
        let mut state = QepState::default();
        let mut expected = 0i64;

        for step in steps {
            expected += step;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let raw = expected.rem_euclid(1 << 16) as u16;
            let diff = state.update(raw);

            prop_assert_eq!(i64::from(diff), step);
            prop_assert_eq!(state.continuous_position(), expected);
        }
    }

    #[test]
    fn one_revolution_of_unit_steps_round_trips(start in any::<u16>(), ticks in 1u32..2048) {
        let mut state = QepState::default();
        state.update(start);
        let first = wrap_to_revolution(state.continuous_position(), ticks);

        let mut raw = start;
        for _ in 0..ticks {
            raw = raw.wrapping_add(1);
            state.update(raw);
        }

        prop_assert_eq!(wrap_to_revolution(state.continuous_position(), ticks), first);
    }
}
