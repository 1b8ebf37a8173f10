// ABOUTME: Rollout state marker types for the type state pattern.
// ABOUTME: Zero-sized types enforce the push, verify, retire ordering at compile time.

/// Initial state: plan chosen, nothing pushed yet.
/// Available actions: `free_name()`, `retire_after()`, `push()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Planned;

/// New release pushed.
/// Available actions: `verify()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Pushed;

/// Cutover verified, or deliberately unverified for a big-bang deploy.
/// Available actions: `retire()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Verified;

/// Superseded instance deleted (if there was one).
/// Available actions: `finish()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Completed;
