//! `stocktrace-api` — HTTP boundary over the registry + ledger services.

pub mod app;
