//! Workspace-level integration tests for pibench. See `tests/`.
