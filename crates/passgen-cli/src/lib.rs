//! passgen CLI - Command-line interface library
//!
//! This library provides the CLI functionality for passgen:
//! - Console: answer prompts one by one
//! - Form: typed flags, behind the shared access key
//!
//! # Library Usage
//!
//! ```ignore
//! use passgen_cli::{console_command, load_settings};
//!
//! let settings = load_settings(None)?;
//! console_command(settings, std::io::stdin().lock(), std::io::stdout(), std::io::stdout(), true)?;
//! ```
//!
//! # Binary Usage
//!
//! ```bash
//! # Interactive prompts
//! passgen console
//!
//! # One-shot, for a hosting UI (prints a JSON download descriptor)
//! PASSGEN_ACCESS_KEY=... passgen form --pass-type foh --event-name "Summer Fest" \
//!     --dates 07/24/2025 --cell-phone 555-1234 --count 3 --format pdf --key ...
//! ```

pub mod app;

// Re-export main entry point and types
pub use app::{console_command, form_command, init_logging, load_settings};
pub use app::{run_cli, FormatArg, PassTypeArg};
