//! Tests for document loading, saving and format round trips.

mod roundtrip_tests;
