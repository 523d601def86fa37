//! Unit tests for delivery channels

mod create_channel_tests;
