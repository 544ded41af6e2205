//! Service scenario tests
//!
//! End-to-end flows through the services over both store adapters, plus
//! store-failure and concurrency behaviour.

mod scenarios;
