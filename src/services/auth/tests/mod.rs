//! Tests for the login facade
