use std::any::Any;
use std::panic::{self, Location};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs the stderr logger. `RUST_LOG` wins over `-v`.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("mailverdict_lib={level},warn")));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}

/// Sends panic reports through the logger. Stage panics are already turned
/// into `status = Error` rows, so the default hook's stderr dump is noise.
pub fn route_panics() {
    panic::set_hook(Box::new(|info| {
        let report = describe_panic(info.payload(), info.location());
        #[cfg(feature = "with-tracing")]
        tracing::warn!("{report}");
        #[cfg(not(feature = "with-tracing"))]
        eprintln!("warning: {report}");
    }));
}

fn describe_panic(payload: &dyn Any, location: Option<&Location<'_>>) -> String {
    let message = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string payload");
    match location {
        Some(at) => format!("panic at {}:{}: {message}", at.file(), at.line()),
        None => format!("panic: {message}"),
    }
}
