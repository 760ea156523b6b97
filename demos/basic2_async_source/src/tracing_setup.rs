use tracing::Level;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;

pub fn tracing_init() {
    let subscriber = tracing_subscriber::fmt()
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(true)
        .with_target(false)
        .with_max_level(Level::DEBUG)
        .with_timer(Elapsed::default())
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already set");
    }
}

/// Wall clock time plus milliseconds since start, so delay windows are visible.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Elapsed {
    start: chrono::DateTime<chrono::Local>,
}

impl Default for Elapsed {
    fn default() -> Self {
        Self {
            start: chrono::Local::now(),
        }
    }
}

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        let elapsed = now.signed_duration_since(self.start).num_milliseconds();
        write!(w, "{} +{:>5}ms", now.format("%H:%M:%S"), elapsed)
    }
}
