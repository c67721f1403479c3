//! Shared fixtures for the integration tests.
#![allow(dead_code)]

pub mod definition_fixtures;
pub mod table_assertions;
