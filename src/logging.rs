//! Logging setup.
//!
//! Events go to stderr so stdout only ever carries the JSON result. The level is
//! taken from `RUST_LOG` and defaults to `info`.

use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Install the global subscriber, writing to stderr
pub fn setup_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    let ansi = std::io::IsTerminal::is_terminal(&std::io::stderr());
    build_subscriber(std::io::stderr, ansi).try_init()?;
    Ok(())
}

/// Build a subscriber writing to a custom writer
pub fn build_subscriber<W>(
    writer: W,
    ansi: bool,
) -> impl tracing::Subscriber + Send + Sync + 'static
where
    W: for<'writer> fmt::MakeWriter<'writer> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(writer)
            .with_ansi(ansi)
            .event_format(
                fmt::format()
                    .with_level(true)
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_thread_names(false)
                    .compact(),
            ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io::Write,
        sync::{Arc, Mutex},
    };

    // Captures formatted events in memory
    #[derive(Clone)]
    struct CaptureWriter {
        buffer: Arc<Mutex<Vec<u8>>>,
    }

    impl CaptureWriter {
        fn new() -> Self {
            Self {
                buffer: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn captured_output(&self) -> String {
            String::from_utf8(self.buffer.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.buffer.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> fmt::MakeWriter<'a> for CaptureWriter {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_events_are_structured() {
        let writer = CaptureWriter::new();
        let subscriber = build_subscriber(writer.clone(), false);

        tracing::subscriber::with_default(subscriber, || {
            tracing::error!(address = "0xabc", data_type = "evm-balances", "Fetch failed");
        });

        let output = writer.captured_output();
        assert!(output.contains("ERROR"));
        assert!(output.contains("Fetch failed"));
        assert!(output.contains("address=\"0xabc\""));
        assert!(output.contains("data_type=\"evm-balances\""));
    }
}
