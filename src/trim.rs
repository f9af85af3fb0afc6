//! Envelope trimmer: normalises ragged `(levels, times)` envelope inputs
//! to the phase-defined partial duration (spec §4.4, component C4).

/// Relative tolerance used when comparing cumulative segment time against
/// the target duration (spec §9's open question on the source's fragile
/// float-equality trim comparison).
fn nearly_eq(a: f64, b: f64, target_duration: f64) -> bool {
    (a - b).abs() <= 1e-12 * target_duration.max(1.0)
}

/// Trim a raw `(levels, times)` pair to exactly span `target_duration`
/// seconds, per spec §4.4's seven-step procedure.
///
/// Pre-condition: `levels` is non-empty. Post-condition:
/// `levels.len() == times.len() + 1` and `times.iter().sum() ==
/// target_duration` within the tolerance above.
pub fn trim(mut levels: Vec<f64>, mut times: Vec<f64>, target_duration: f64) -> (Vec<f64>, Vec<f64>) {
    // Step 1: drop redundant trailing times until |times| < |levels|.
    while times.len() >= levels.len() {
        times.pop();
    }
    // Step 2: drop redundant trailing levels until |levels| <= |times| + 1.
    while levels.len() > times.len() + 1 {
        levels.pop();
    }

    let sum: f64 = times.iter().sum();

    if nearly_eq(sum, target_duration, target_duration) {
        return (levels, times);
    }

    if sum < target_duration {
        // Step 5: constant extension.
        times.push(target_duration - sum);
        let last = *levels.last().expect("levels non-empty");
        levels.push(last);
        return (levels, times);
    }

    // Step 6: sum > target_duration. Drop tail segments whose end is past
    // the target, then fix up the last remaining segment.
    let mut cumulative = 0.0;
    let mut keep_segments = 0;
    for &t in &times {
        if cumulative + t > target_duration && !nearly_eq(cumulative + t, target_duration, target_duration) {
            break;
        }
        cumulative += t;
        keep_segments += 1;
    }

    if keep_segments == times.len() {
        // The only segment past target_duration was already excluded by
        // the nearly_eq check above; nothing further to trim.
        return (levels, times);
    }

    let remaining_time = target_duration - cumulative;
    let original_segment_time = times[keep_segments];
    let fraction = if original_segment_time > 0.0 {
        remaining_time / original_segment_time
    } else {
        0.0
    };
    let segment_start_level = levels[keep_segments];
    let segment_end_level = levels[keep_segments + 1];
    let interpolated_level = segment_start_level + (segment_end_level - segment_start_level) * fraction;

    times.truncate(keep_segments + 1);
    levels.truncate(keep_segments + 2);
    let last_time_index = times.len() - 1;
    times[last_time_index] = remaining_time;
    let last_level_index = levels.len() - 1;
    levels[last_level_index] = interpolated_level;

    (levels, times)
}
