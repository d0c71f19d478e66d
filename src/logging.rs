use std::path::Path;

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt};

use crate::terminal;

static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Log to `log_file`; stdout belongs to the game screen.
///
/// Filter from `RUST_LOG`, default `info`.
pub fn init(log_file: &Path) -> std::io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let dir = match log_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let file_name = log_file
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new("garage-tui.log"));

    let (nb_writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    let _ = FILE_GUARD.set(guard);

    let file_layer = fmt::layer()
        .with_writer(nb_writer)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .init();

    // Leave the alternate screen first, or the panic message is lost with it.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = terminal::restore();
        tracing::error!("{info}");
        default_hook(info);
    }));

    Ok(())
}
