//! Integration tests across storage, the page engine and the HTTP API.

mod server_tests;
mod store_tests;
