//! FSRS-5 core formulas
//!
//! Pure functions over difficulty, stability and retrievability. Nothing here
//! touches a clock, a random source or shared state; callers pass every input.
//!
//! All outputs are rounded to two decimals. Difficulty is clamped to
//! [`MIN_DIFFICULTY`, `MAX_DIFFICULTY`] and stability never drops below
//! [`MIN_STABILITY`].

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default FSRS-5 weights (19 parameters)
pub const FSRS5_WEIGHTS: [f64; 19] = [
    0.40255, 1.18385, 3.173, 15.69105, // w0-w3: initial stability per grade
    7.1949, 0.5345, // w4-w5: initial difficulty
    1.4604, 0.0046, // w6-w7: difficulty delta, mean reversion
    1.54575, 0.1192, 1.01925, // w8-w10: recall stability
    1.9395, 0.11, 0.29605, 2.2698, // w11-w14: forget stability
    0.2315, // w15: hard penalty (unused by this rating scale)
    2.9898, // w16: easy bonus
    0.51655, 0.6621, // w17-w18: short-term stability
];

/// Forgetting curve exponent
pub const DECAY: f64 = -0.5;

/// `0.9^(1/DECAY) - 1`, chosen so that R(t = S) = 0.9
pub const FACTOR: f64 = 19.0 / 81.0;

/// Default target probability of recall
pub const DEFAULT_RETENTION: f64 = 0.9;

/// Default cap on scheduled days
pub const DEFAULT_MAXIMUM_INTERVAL: i64 = 36500;

pub const MIN_DIFFICULTY: f64 = 1.0;
pub const MAX_DIFFICULTY: f64 = 10.0;

/// Stability floor (days)
pub const MIN_STABILITY: f64 = 0.1;

/// Intervals below this many days are never fuzzed
pub const FUZZ_THRESHOLD: f64 = 2.5;

// ============================================================================
// HELPERS
// ============================================================================

/// Round to two decimal places
#[inline]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[inline]
fn constrain_difficulty(d: f64) -> f64 {
    round2(d.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY))
}

#[inline]
fn constrain_stability(s: f64) -> f64 {
    round2(s).max(MIN_STABILITY)
}

// ============================================================================
// DIFFICULTY
// ============================================================================

/// Initial difficulty after the first rating: `w4 - e^(w5 * (G - 1)) + 1`
pub fn initial_difficulty(w: &[f64; 19], grade: f64) -> f64 {
    constrain_difficulty(w[4] - (w[5] * (grade - 1.0)).exp() + 1.0)
}

/// Initial stability after the first rating, looked up by grade
pub fn initial_stability(w: &[f64; 19], grade: f64) -> f64 {
    let index = (grade as usize).saturating_sub(1).min(3);
    round2(w[index].max(MIN_STABILITY))
}

/// Next difficulty with linear damping and mean reversion toward D0(Easy)
pub fn next_difficulty(w: &[f64; 19], difficulty: f64, grade: f64) -> f64 {
    let delta = -w[6] * (grade - 3.0);
    let damped = difficulty + delta * (MAX_DIFFICULTY - difficulty) / 9.0;
    let target = initial_difficulty(w, 4.0);
    constrain_difficulty(w[7] * target + (1.0 - w[7]) * damped)
}

// ============================================================================
// RETRIEVABILITY
// ============================================================================

/// Probability of recall after `elapsed_days` for a memory of `stability`
///
/// Equals 1.0 at zero elapsed time and decays toward 0.
pub fn forgetting_curve(elapsed_days: f64, stability: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    (1.0 + FACTOR * elapsed_days.max(0.0) / stability).powf(DECAY)
}

// ============================================================================
// STABILITY
// ============================================================================

/// Stability after a successful recall
///
/// `S * (1 + e^w8 * (11 - D) * S^-w9 * (e^(w10 * (1 - R)) - 1) * bonus)`
/// where the bonus is `w16` for Easy and 1 otherwise. Never below `S`.
pub fn next_recall_stability(
    w: &[f64; 19],
    difficulty: f64,
    stability: f64,
    retrievability: f64,
    grade: f64,
) -> f64 {
    let easy_bonus = if grade >= 4.0 { w[16] } else { 1.0 };
    let growth = w[8].exp()
        * (11.0 - difficulty)
        * stability.powf(-w[9])
        * ((w[10] * (1.0 - retrievability)).exp() - 1.0)
        * easy_bonus;
    constrain_stability(stability * (1.0 + growth.max(0.0)))
}

/// Stability after a lapse, never above the prior stability
///
/// The cap is applied after flooring and rounding, so a prior stability below
/// the floor or between 2-decimal steps is not raised.
pub fn next_forget_stability(
    w: &[f64; 19],
    difficulty: f64,
    stability: f64,
    retrievability: f64,
) -> f64 {
    let forgotten = w[11]
        * difficulty.powf(-w[12])
        * ((stability + 1.0).powf(w[13]) - 1.0)
        * (w[14] * (1.0 - retrievability)).exp();
    constrain_stability(forgotten).min(stability)
}

/// Short-term (same-day) stability used in learning and relearning
pub fn next_short_term_stability(w: &[f64; 19], stability: f64, grade: f64) -> f64 {
    constrain_stability(stability * (w[17] * (grade - 3.0 + w[18])).exp())
}

// ============================================================================
// INTERVALS
// ============================================================================

/// Raw interval in days for a target retention, before fuzz and clamping
pub fn next_interval(stability: f64, request_retention: f64) -> f64 {
    stability / FACTOR * (request_retention.powf(1.0 / DECAY) - 1.0)
}

/// Inclusive fuzz window `[min, max]` for a rounded interval
///
/// `[floor(0.95 * ivl) - 1, ceil(1.05 * ivl) + 1]`, never starting below 2 days.
pub fn fuzz_range(interval: f64) -> (f64, f64) {
    let ivl = interval.round();
    let min = ((ivl * 0.95).floor() - 1.0).max(2.0);
    let max = ((ivl * 1.05).ceil() + 1.0).max(min);
    (min, max)
}

/// Fuzz an interval using a uniform sample from `[0, 1)`
pub fn fuzz_interval(interval: f64, sample: f64) -> f64 {
    if interval < FUZZ_THRESHOLD {
        return interval;
    }
    let (min, max) = fuzz_range(interval);
    (sample.clamp(0.0, 1.0) * (max - min + 1.0) + min)
        .floor()
        .min(max)
}

// ============================================================================
// TESTS
// ============================================================================
