//! Early stop of an evolution from the terminal.
//!
//! The terminal stays in cooked mode, so typing `q` and pressing Enter sets the
//! evolution's cancel flag. The run then stops after the current generation and
//! still reports its hall of fame. Ctrl-C keeps its default behavior and kills
//! the process without a report.

use std::{
    io::{self, IsTerminal as _},
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use raidsplit_evolution::{Evolution, EvolutionError, EvolutionResult};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Runs `evolution`, watching the terminal for the stop key while it runs.
///
/// Without a terminal on stdin the evolution simply runs to completion.
pub(crate) fn run_stoppable(evolution: &Evolution<'_>) -> Result<EvolutionResult, EvolutionError> {
    if !io::stdin().is_terminal() {
        return evolution.run();
    }

    let stop = evolution.cancel_handle();
    let done = AtomicBool::new(false);
    log::info!("Type q and press Enter to stop after the current generation");
    thread::scope(|s| {
        s.spawn(|| watch(&stop, &done));
        let result = evolution.run();
        done.store(true, Ordering::Relaxed);
        result
    })
}

fn watch(stop: &AtomicBool, done: &AtomicBool) {
    while !done.load(Ordering::Relaxed) {
        let event = match event::poll(POLL_INTERVAL) {
            Ok(false) => continue,
            Ok(true) => event::read(),
            Err(err) => Err(err),
        };
        match event {
            Ok(Event::Key(key)) if is_stop_key(key) => {
                log::info!("Stopping after the current generation");
                stop.store(true, Ordering::Relaxed);
                return;
            }
            Ok(_) => {}
            Err(err) => {
                log::warn!("Stop key disabled: {err}");
                return;
            }
        }
    }
}

fn is_stop_key(key: KeyEvent) -> bool {
    key.kind == KeyEventKind::Press && matches!(key.code, KeyCode::Char('q' | 'Q'))
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    #[test]
    fn test_stop_key() {
        assert!(is_stop_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_stop_key(KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT)));
        assert!(!is_stop_key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE)));
        assert!(!is_stop_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(!is_stop_key(KeyEvent::new_with_kind(
            KeyCode::Char('q'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        )));
    }

    #[test]
    fn test_watch_returns_once_done() {
        let stop = AtomicBool::new(false);
        let done = AtomicBool::new(true);
        watch(&stop, &done);
        assert!(!stop.load(Ordering::Relaxed));
    }
}
