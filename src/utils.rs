/// Fold a multi-turn position into `[-ticks_per_rev / 2, ticks_per_rev / 2)`
///
/// `ticks_per_rev` must be non-zero
#[allow(clippy::cast_possible_truncation)]
pub fn wrap_to_revolution(position: i64, ticks_per_rev: u32) -> i32 {
    let ticks = i64::from(ticks_per_rev);
    let folded = position.rem_euclid(ticks);
    // ticks / 2 rounds down, so odd resolutions get one more positive value
    let wrapped = if folded >= ticks - ticks / 2 {
        folded - ticks
    } else {
        folded
    };
    wrapped as i32
}

/// Check whether `delta` is implausibly large on a circle of `ticks_per_rev`
///
/// Returns `true` only when the raw delta and both of its one-revolution
/// neighbours lie outside `[-max_delta, max_delta]`
pub fn exceeds_circular_tolerance(delta: i32, ticks_per_rev: u32, max_delta: u16) -> bool {
    let ticks = i64::from(ticks_per_rev);
    let max = i64::from(max_delta);
    let delta = i64::from(delta);

    [delta, delta + ticks, delta - ticks]
        .iter()
        .all(|d| d.abs() > max)
}
