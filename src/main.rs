//! 2A03 CPU runner.
//!
//! Loads an NROM cartridge, powers the CPU on and runs until it halts or the
//! instruction limit is reached.
//! Usage: nessan path/to/game.nes [instruction-limit] [--trace]

use std::env;
use std::process::ExitCode;

use ansi_term::Colour::{Blue, Green, Red, Yellow};
use ansi_term::Style;
use log::{Level, LevelFilter, Log, Metadata, Record};
use nessan::{cartridge::cartridge::Cartridge, cpu::cpu::RunOutcome};

/// Writes `[LEVEL] message` lines to stderr with a coloured banner.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let banner = match record.level() {
            Level::Error => Red.bold().paint("[ERROR]"),
            Level::Warn => Yellow.bold().paint("[WARN]"),
            Level::Info => Green.bold().paint("[INFO]"),
            Level::Debug => Blue.paint("[DEBUG]"),
            Level::Trace => Style::new().dimmed().paint("[TRACE]"),
        };
        eprintln!("{} {}", banner, record.args());
    }

    fn flush(&self) {}
}

struct Args {
    path: String,
    limit: Option<u64>,
    trace: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut path = None;
    let mut limit = None;
    let mut trace = false;

    for arg in env::args().skip(1) {
        if arg == "--trace" {
            trace = true;
        } else if path.is_none() {
            path = Some(arg);
        } else {
            let n = arg
                .parse::<u64>()
                .map_err(|_| format!("invalid instruction limit: {}", arg))?;
            limit = Some(n);
        }
    }

    let path = path.ok_or("usage: nessan <rom.nes> [instruction-limit] [--trace]")?;
    Ok(Args { path, limit, trace })
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}", msg);
            return ExitCode::FAILURE;
        }
    };

    let level = if args.trace {
        LevelFilter::Trace
    } else {
        LevelFilter::Info
    };
    if let Err(err) = log::set_logger(&LOGGER).map(|()| log::set_max_level(level)) {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    let cart = match Cartridge::load(&args.path) {
        Ok(cart) => cart,
        Err(err) => {
            log::error!("{}: {}", args.path, err);
            return ExitCode::FAILURE;
        }
    };

    let mut cpu = match nessan::boot(&cart) {
        Ok(cpu) => cpu,
        Err(err) => {
            log::error!("power on failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cpu.run(args.limit) {
        Ok(outcome) => outcome,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let regs = cpu.registers();
    match outcome {
        RunOutcome::Halted(err) => log::info!("halted at ${:04X}: {}", regs.pc, err),
        RunOutcome::LimitReached => log::info!("instruction limit reached"),
    }
    log::info!(
        "{} instructions  PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X}",
        cpu.executed_instructions(),
        regs.pc,
        regs.a,
        regs.x,
        regs.y,
        regs.p.bits(),
        regs.s
    );

    ExitCode::SUCCESS
}
