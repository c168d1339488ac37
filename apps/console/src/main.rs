//! # Milka Shop Console Entry Point
//!
//! ## Application Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Milka Shop Console                               │
//! │                                                                         │
//! │  $ milka sales record --product 3 --quantity 2                          │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    Rust Frontend (this crate)                    │  │
//! │  │                                                                  │  │
//! │  │  main.rs ────► Starts the runtime, exits with the command code  │  │
//! │  │                                                                  │  │
//! │  │  lib.rs ─────► CLI definition, logging, dispatch                │  │
//! │  │                                                                  │  │
//! │  │  commands/ ──► one module per page of the admin UI             │  │
//! │  │                                                                  │  │
//! │  │  views/ ─────► tables, stat cards and bar charts as text        │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 Shop REST API  +  local_storage.json             │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    milka_console::run().await
}
