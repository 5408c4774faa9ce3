/// Contains functionality to create representative light path fields.
///
/// Provides shared functionality for tests and benchmarks.
pub mod mirror;
