// Library root
// -----------
// The binary (`main.rs`) is a thin wrapper; everything it does lives here so
// the pipeline can be driven from tests.
//
// Module responsibilities:
// - `config`: fixed endpoint and viewer URLs.
// - `error`: the `ImportError` taxonomy shared by every step.
// - `records`: CSV parsing and the recipe-name presence check.
// - `api`: the blocking HTTP client for the bulk import endpoint.
// - `ui`: argument handling, the import pipeline and console reporting.
pub mod api;
pub mod config;
pub mod error;
pub mod records;
pub mod ui;
