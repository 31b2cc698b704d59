//! Flow command-line driver.
//!
//! The binary (`flow`) is a thin argument dispatcher over this library:
//! [`Session`] owns an interner and one persistent interpreter, and the
//! [`commands`] module implements `run`, `repl`, `lex` and `parse` on top
//! of it. Lex and parse errors are rendered as labelled source snippets
//! by [`render_parse_error`].

pub mod commands;
mod options;
mod report;
mod session;

pub use options::{parse_options, Options};
pub use report::render_parse_error;
pub use session::{Outcome, Session};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the `tracing` subscriber.
///
/// Only does anything when `RUST_LOG` is set, so normal runs print nothing
/// but program output. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .with(filter)
                .init();
        }
    });
}
