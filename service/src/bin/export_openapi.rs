//! Export the lookup API's `OpenAPI` document as JSON.
//!
//! Usage: `cargo run --bin export_openapi > openapi.json`

#![allow(clippy::print_stdout, clippy::expect_used)]

use tnlegis_api::rest::ApiDoc;
use utoipa::OpenApi;

fn main() {
    print!(
        "{}",
        ApiDoc::openapi()
            .to_pretty_json()
            .expect("OpenAPI JSON serialization failed")
    );
}
