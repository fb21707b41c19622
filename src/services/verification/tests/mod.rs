//! Tests for the verification code store
