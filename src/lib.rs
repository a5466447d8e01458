//! Polar-ring clock core: recurring-alarm scheduling, next-occurrence math,
//! and the Tools-view engines (countdown timer, stopwatch, pomodoro).
//!
//! The engines are pure over supplied instants or frame deltas; the binary
//! in `main.rs` is one thin consumer, a presentation layer is another.

pub mod alarm;
pub mod tools;
