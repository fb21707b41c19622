//! Tests for the cleanup scheduler
