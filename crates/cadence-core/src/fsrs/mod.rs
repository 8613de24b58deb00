//! FSRS-5 (Free Spaced Repetition Scheduler) Module
//!
//! Reference: https://github.com/open-spaced-repetition/fsrs4anki
//!
//! ## Core Formulas:
//! - Retrievability: R = (1 + FACTOR * t / S)^DECAY where DECAY = -0.5
//!   and FACTOR = 0.9^(1/DECAY) - 1
//! - Interval: t = S/FACTOR * (R^(1/DECAY) - 1)
//!
//! `algorithm` holds the pure formulas; `scheduler` wraps them in the
//! `new -> learning/relearning -> review` state machine.

mod algorithm;
mod scheduler;

pub use algorithm::{
    // Core functions
    forgetting_curve,
    fuzz_interval,
    fuzz_range,
    initial_difficulty,
    initial_stability,
    next_difficulty,
    next_forget_stability,
    next_interval,
    next_recall_stability,
    next_short_term_stability,
    round2,
    // Constants
    DECAY,
    DEFAULT_MAXIMUM_INTERVAL,
    DEFAULT_RETENTION,
    FACTOR,
    FSRS5_WEIGHTS,
    FUZZ_THRESHOLD,
    MAX_DIFFICULTY,
    MIN_DIFFICULTY,
    MIN_STABILITY,
};

pub use scheduler::{
    FSRSParameters, FSRSScheduler, LearningState, MemoryState, PreviewResults, Rating,
    ReviewResult, SHORT_TERM_DELAY_MINUTES,
};
