//! In-place terminal redraw of the token block.
//!
//! Every tick repaints exactly one line per token. After the first paint the
//! cursor is moved back up over the block so the next paint overwrites it.

use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossterm::cursor::MoveUp;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use tracing::{debug, trace};

use crate::token::{error_line, format_line, TokenSet};

/// Interval between repaints.
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Display options, fixed for the lifetime of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Leave out the `(Valid Ns)` countdown.
    pub omit_time: bool,
    /// Paint once and stop.
    pub one_shot: bool,
}

/// Source of the instant used to compute codes.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed-period scheduler. The first tick fires immediately; later ticks
/// land on `start + k * period`, skipping any deadline already missed.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    next: Option<Instant>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period, next: None }
    }

    /// Block until the next tick is due.
    pub fn wait(&mut self) {
        let now = Instant::now();
        let deadline = match self.next {
            None => now,
            Some(deadline) => deadline,
        };
        if deadline > now {
            thread::sleep(deadline - now);
        }

        let mut next = deadline + self.period;
        let after = Instant::now();
        while next <= after {
            next += self.period;
        }
        self.next = Some(next);
    }
}

/// Cursor rows to move up over a block of `count` lines, saturating at the
/// terminal protocol limit.
fn rows_up(count: usize) -> u16 {
    u16::try_from(count).unwrap_or(u16::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Nothing painted yet, write the block below the cursor.
    FirstPaint,
    /// Block already on screen, move up and overwrite it.
    Repaint,
    /// Loop finished.
    Done,
}

pub struct DisplayLoop<W, C> {
    tokens: TokenSet,
    config: DisplayConfig,
    out: W,
    clock: C,
    phase: Phase,
}

impl<W: Write, C: Clock> DisplayLoop<W, C> {
    pub fn new(tokens: TokenSet, config: DisplayConfig, out: W, clock: C) -> Self {
        Self {
            tokens,
            config,
            out,
            clock,
            phase: Phase::FirstPaint,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Tick on `ticker` until the loop is done. In continuous mode this only
    /// returns on a write error.
    pub fn run(&mut self, ticker: &mut Ticker) -> io::Result<()> {
        debug!(tokens = self.tokens.len(), config = ?self.config, "starting display loop");
        while self.phase != Phase::Done {
            ticker.wait();
            self.tick()?;
        }
        Ok(())
    }

    /// Paint the block once and advance the phase.
    pub fn tick(&mut self) -> io::Result<()> {
        let now = self.clock.now();
        let count = self.tokens.len();

        if self.phase == Phase::Repaint && count > 0 {
            queue!(self.out, MoveUp(rows_up(count)))?;
        }

        let show_name = self.tokens.show_names();
        let name_pad = self.tokens.longest_name_length();
        for token in self.tokens.tokens() {
            queue!(self.out, Clear(ClearType::CurrentLine))?;
            match format_line(token, show_name, name_pad, now, self.config.omit_time) {
                Ok(line) => writeln!(self.out, "{}", line)?,
                Err(e) => {
                    trace!(name = %token.name, error = %e, "code generation failed");
                    writeln!(self.out, "{}", error_line(token, &e))?
                }
            }
        }
        self.out.flush()?;

        self.phase = if self.config.one_shot {
            Phase::Done
        } else {
            Phase::Repaint
        };
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
