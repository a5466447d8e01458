pub mod pomodoro;
pub mod stopwatch;
pub mod timer;
