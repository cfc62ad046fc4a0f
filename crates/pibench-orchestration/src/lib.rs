//! # pibench-orchestration
//!
//! Chunk scheduling, single-core and multi-core benchmark runs, CPU
//! detection, and repeated-run statistics.

pub mod cpu;
pub mod interfaces;
pub mod orchestrator;
pub mod scheduler;
pub mod stats;

pub use cpu::{CpuProbe, FixedProbe, SystemProbe};
pub use interfaces::{BenchmarkReport, BenchmarkResult, NullPresenter, ResultPresenter};
pub use orchestrator::{BenchmarkConfig, CoreBenchmark, Mode};
pub use scheduler::{partition, run_chunks, Chunk, SchedulerOptions};
pub use stats::RunStatistics;
