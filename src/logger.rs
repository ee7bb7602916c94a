use std::io::{self, IsTerminal};

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

static TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn init() {
    let tracing_subscriber = tracing_subscriber::registry();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // ERROR 写到 stderr，其余进度写到 stdout；输出被重定向时关闭颜色，方便 grep "fix:"
    let writer = io::stderr.with_max_level(Level::ERROR).or_else(io::stdout);
    let fmt = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_timer(ChronoLocal::new(TIME_FORMAT.to_owned()))
        .with_ansi(io::stdout().is_terminal() && io::stderr().is_terminal())
        .with_target(false);
    tracing_subscriber.with(filter).with(fmt).init();
}
