use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use ipseek_core::scan::Progress;

const POLL_INTERVAL: Duration = Duration::from_millis(150);

pub struct ProgressHandle {
    bar: ProgressBar,
    running: Arc<AtomicBool>,
    poller: Option<JoinHandle<()>>,
}

impl ProgressHandle {
    pub fn finish(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(poller) = self.poller.take() {
            let _ = poller.join();
        }
        self.bar.finish_and_clear();
    }
}

/// Draws a bar over the total candidate volume, fed from the shared
/// examined-counter on a background thread. Purely advisory; the search
/// never waits on it.
pub fn start(total: u64, progress: Progress) -> ProgressHandle {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::with_template(
        "{bar:40.blue} {human_pos}/{human_len} ({percent}%) [{elapsed_precise}]",
    )
    .unwrap();
    bar.set_style(style);

    let running = Arc::new(AtomicBool::new(true));
    let poller = {
        let bar = bar.clone();
        let running = running.clone();
        thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                bar.set_position(progress.examined().min(total));
                thread::sleep(POLL_INTERVAL);
            }
        })
    };

    ProgressHandle {
        bar,
        running,
        poller: Some(poller),
    }
}
