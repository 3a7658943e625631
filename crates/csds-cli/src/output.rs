use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

/// Human-oriented line; suppressed in JSON mode so stdout stays parseable.
pub fn line(msg: &str) {
    if !is_json() {
        println!("{msg}");
    }
}

/// Print a status table, with its header line in bold.
pub fn table(text: &str) -> anyhow::Result<()> {
    let mut out = stdout();
    let mut lines = text.lines();
    if let Some(header) = lines.next() {
        out.set_color(ColorSpec::new().set_bold(true).set_fg(Some(Color::Cyan)))?;
        writeln!(out, "{header}")?;
        out.reset()?;
    }
    for l in lines {
        writeln!(out, "{l}")?;
    }
    Ok(())
}

pub fn eprintln_line(msg: &str) {
    let _ = writeln!(io::stderr(), "{msg}");
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(ColorChoice::Auto)
}
