//! Common test utilities for integration tests.
//!
//! - [`http_mock::MockHttpServer`] - wiremock wrapper for stubbing the
//!   geocoder, geographies endpoint, and directory pages
//! - [`fixtures`] - upstream response bodies shaped like the real services

#![allow(dead_code)]

pub mod fixtures;
pub mod http_mock;
