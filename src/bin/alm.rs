extern crate almanac as lib;

use flexi_logger::{FileSpec, Logger};
use lib::events::Dispatcher;
use lib::provider::{source, DataSource};
use lib::ui::app::App;
use lib::ui::layout::{plain_text, CalendarLayout};
use lib::ui::Context;
use nix::sys::{signal, termios};
use std::io::stdout;
use std::path::PathBuf;
use structopt::StructOpt;
use unsegen::base::Terminal;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "alm",
    about = "Almanac - month calendar of school events for the terminal."
)]
pub struct Args {
    #[structopt(
        name = "SOURCE",
        help = "calendar document: a JSON file path or an http(s) URL"
    )]
    pub source: Option<String>,

    #[structopt(
        name = "CONFIG",
        short = "c",
        long = "config",
        help = "path to config file",
        parse(from_os_str)
    )]
    pub configfile: Option<PathBuf>,

    #[structopt(
        short = "s",
        long = "show",
        help = "only print the calendar non-interactively"
    )]
    pub show: bool,

    #[structopt(long = "log-file", help = "path to log file", parse(from_os_str))]
    pub log_file: Option<PathBuf>,
}

fn show(mut context: Context, source: Option<DataSource>, timeout: std::time::Duration) {
    let result = match source {
        Some(source) => source::load(&source, timeout),
        None => Ok(lib::provider::CalendarDataset::empty()),
    };
    if let Err(e) = &result {
        eprintln!("{}", e);
    }
    context.finish_loading(result);

    let render = context.render();
    let layout = CalendarLayout::new(context.labels(), context.theme());
    let mut lines = layout.calendar_lines(&render);
    lines.extend(layout.event_list_lines(&render, None));

    println!("{}", plain_text(&lines));
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::from_args();

    const DEFAULT_LOG_LEVEL: &str = if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    };

    let mut logger = Logger::try_with_env_or_str(DEFAULT_LOG_LEVEL)?;

    if let Some(log_file) = args.log_file {
        logger = logger
            .log_to_file(FileSpec::try_from(log_file)?)
            .print_message();
    }

    logger.start()?;

    let config = lib::config::load_suitable_config(args.configfile.as_deref())?;
    let source = args
        .source
        .map(DataSource::from)
        .or_else(|| config.source.clone());

    if source.is_none() {
        log::error!("No calendar source given on the command line or in the config");
    }

    if args.show {
        show(Context::new(&config), source, config.fetch_timeout());
        return Ok(());
    }

    const STDIN: std::os::unix::io::RawFd = 0;
    let orig_attr = std::sync::Mutex::new(termios::tcgetattr(STDIN)?);

    std::panic::set_hook(Box::new(move |info| {
        // Switch to main terminal screen
        println!("{}{}", termion::screen::ToMainScreen, termion::cursor::Show);

        if let Ok(attr) = orig_attr.lock() {
            let _ = termios::tcsetattr(STDIN, termios::SetArg::TCSANOW, &attr);
        }

        println!("Almanac ran into a fatal error!");
        println!("{}", info);
        println!("{:?}", backtrace::Backtrace::new());
    }));

    let mut signals_to_wait = signal::SigSet::empty();
    signals_to_wait.add(signal::SIGWINCH);
    signals_to_wait.thread_block()?;

    let dispatcher = Dispatcher::from_config(&config, signals_to_wait);
    let sink = dispatcher.event_sink();
    match source {
        Some(source) => {
            source::spawn_load(source, config.fetch_timeout(), sink)?;
        }
        None => {
            source::deliver(&sink, Ok(lib::provider::CalendarDataset::empty()));
        }
    }

    // Setup unsegen terminal
    let stdout = stdout();
    let term = Terminal::new(stdout.lock())?;

    let mut app = App::new(&config);

    app.run(dispatcher, term)
}
