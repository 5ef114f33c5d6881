use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use crate::application::store::{PostStore, Subscription};
use crate::util::lock::{rw_read, rw_write};

use super::views;

const SOURCE: &str = "presentation::terminal";

/// Keeps the most recent frame drawn from store notifications.
#[derive(Clone)]
pub struct TerminalView {
    frame: Arc<RwLock<String>>,
    renders: Arc<AtomicUsize>,
}

impl TerminalView {
    /// Subscribe to `store`, redrawing on every notification.
    pub fn attach(store: &PostStore) -> (Self, Subscription) {
        let view = Self {
            frame: Arc::new(RwLock::new(views::render(&store.state()))),
            renders: Arc::new(AtomicUsize::new(0)),
        };

        let target = view.clone();
        let subscription = store.subscribe(move |state| {
            *rw_write(&target.frame, SOURCE, "redraw") = views::render(state);
            target.renders.fetch_add(1, Ordering::SeqCst);
        });

        (view, subscription)
    }

    pub fn frame(&self) -> String {
        rw_read(&self.frame, SOURCE, "frame").clone()
    }

    /// Number of redraws triggered by the store.
    pub fn renders(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

/// Ask a yes/no question; only `y` or `yes` (any case) confirms.
///
/// End of input counts as a refusal.
pub fn confirm<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<bool> {
    write!(output, "{prompt} [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    if input.read_line(&mut answer)? == 0 {
        return Ok(false);
    }
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
