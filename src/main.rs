use chrono::{Local, TimeZone, Utc};
use clap::builder::TypedValueParser;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use std::error::Error;
use std::io::{self, Write};
use std::time::Duration;

use typometer::aggregate::{aggregate, Aggregates};
use typometer::corpus::Corpus;
use typometer::generator::TextGenerator;
use typometer::runtime::{KeyboardSource, Runner, TrainerEvent};
use typometer::sampler::Sampler;
use typometer::session::Session;
use typometer::store::{JsonFileStore, MemoryStore, SessionStore, StoreError};
use typometer::TICK_RATE_MS;

/// minimal terminal typing trainer with live metrics and history aggregates
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimal terminal typing trainer. Presents random words, tracks live wpm/accuracy/cpm while you type, samples wpm once per second, and keeps a session log aggregated over the last hour, day, and all time."
)]
pub struct Cli {
    /// number of words per practice text (at least 1)
    #[clap(short = 'w', long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    words: usize,

    /// embedded corpus to pull words from
    #[clap(short = 'c', long, default_value = "common")]
    corpus: String,

    /// do not read or write the on-disk session log
    #[clap(long)]
    no_history: bool,

    /// print the stored session log and exit
    #[clap(long)]
    list_history: bool,
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Load history, tolerating a corrupt log with a warning. The trainer
/// starts from an empty history rather than refusing to run.
fn load_history(store: &mut dyn SessionStore) {
    if let Err(e) = store.load() {
        match e {
            StoreError::Corrupt(_) => eprintln!("warning: {e}; continuing with empty history"),
            _ => eprintln!("warning: {e}"),
        }
    }
}

fn print_history(store: &dyn SessionStore) {
    if store.records().is_empty() {
        println!("no recorded sessions");
        return;
    }
    for record in store.records() {
        let when = Local
            .timestamp_millis_opt(record.timestamp)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| record.timestamp.to_string());
        println!(
            "{when}  {:>6.1} wpm  {:>5.1}% accuracy",
            record.wpm, record.accuracy
        );
    }
}

fn format_aggregates(agg: &Aggregates) -> Vec<String> {
    vec![
        format!(
            "  last hour: {:.1} wpm, {:.1}% acc",
            agg.hourly.avg_wpm, agg.hourly.avg_accuracy
        ),
        format!(
            "  last day:  {:.1} wpm, {:.1}% acc",
            agg.daily.avg_wpm, agg.daily.avg_accuracy
        ),
        format!(
            "  all time:  {:.1} wpm, {:.1}% acc",
            agg.overall.avg_wpm, agg.overall.avg_accuracy
        ),
    ]
}

fn status_line(session: &Session, now: i64) -> String {
    let m = session.live_metrics(now);
    let elapsed = session.elapsed_seconds(now);
    format!(
        "wpm {:>5.1} | acc {:>5.1}% | cpm {:>6.1} | {:02}:{:02} | {}/{} chars",
        m.adjusted_wpm.max(0.0),
        m.accuracy,
        m.cpm,
        elapsed / 60,
        elapsed % 60,
        session.input().chars().count(),
        session.target().chars().count(),
    )
}

fn run_trainer(cli: &Cli, store: &mut dyn SessionStore) -> Result<(), Box<dyn Error>> {
    let corpus = Corpus::named(&cli.corpus)?;
    let generator = TextGenerator::new(corpus);

    let mut session = Session::new(generator.generate(cli.words));
    let mut sampler = Sampler::new();
    let mut handle = sampler.start(&session);
    let mut typed = String::new();

    println!("{}", session.target());
    println!("(start typing; esc restarts, ctrl-c quits)");

    enable_raw_mode()?;
    let runner = Runner::new(
        KeyboardSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    let result = (|| -> Result<(), Box<dyn Error>> {
        loop {
            match runner.step() {
                TrainerEvent::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    match key.code {
                        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            return Ok(());
                        }
                        KeyCode::Char(c) => {
                            typed.push(c);
                            session.set_input(&typed, now_ms());
                        }
                        KeyCode::Backspace => {
                            typed.pop();
                            session.set_input(&typed, now_ms());
                        }
                        KeyCode::Esc => {
                            sampler.cancel(handle);
                            session.reset(generator.generate(cli.words));
                            typed.clear();
                            handle = sampler.start(&session);
                            print!("\r\n\r\n{}\r\n", session.target());
                        }
                        _ => {}
                    }
                }
                TrainerEvent::Tick => {
                    sampler.tick(handle, &mut session, now_ms());
                }
            }

            let now = now_ms();
            print!("\r{}", status_line(&session, now));
            io::stdout().flush()?;

            if session.is_complete() {
                sampler.cancel(handle);
                let record = session.finalize(now);

                print!("\r\n\r\nsession complete: {:.1} wpm, {:.1}% accuracy\r\n", record.wpm, record.accuracy);
                if !session.samples.is_empty() {
                    let series = session
                        .samples
                        .iter()
                        .map(|s| format!("{}s:{:.0}", s.at_second, s.wpm))
                        .collect::<Vec<_>>()
                        .join(" ");
                    print!("wpm series: {series}\r\n");
                }

                if let Err(e) = store.append(record) {
                    eprint!("\rwarning: {e}; this result may not survive a restart\r\n");
                }
                print!("aggregates:\r\n");
                for line in format_aggregates(&aggregate(store.records(), now)) {
                    print!("{line}\r\n");
                }

                session.reset(generator.generate(cli.words));
                typed.clear();
                handle = sampler.start(&session);
                print!("\r\n{}\r\n", session.target());
            }
        }
    })();

    disable_raw_mode()?;
    println!();
    result
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut store: Box<dyn SessionStore> = if cli.no_history {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::new())
    };
    load_history(store.as_mut());

    if cli.list_history {
        print_history(store.as_ref());
        println!("aggregates:");
        for line in format_aggregates(&aggregate(store.records(), now_ms())) {
            println!("{line}");
        }
        return Ok(());
    }

    run_trainer(&cli, store.as_mut())
}
