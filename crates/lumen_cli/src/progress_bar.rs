//! Terminal progress bar.

use std::io::Write;

use lumen_render::Progress;

const BAR_WIDTH: usize = 70;

/// Draws a `[===>---] NN%` bar on stderr, redrawn in place with a
/// carriage return.
pub struct ProgressBar;

impl ProgressBar {
    fn draw(&self, done: usize, total: usize) {
        let fraction = if total == 0 {
            1.0
        } else {
            done as f64 / total as f64
        };
        let filled = (BAR_WIDTH as f64 * fraction) as usize;

        let mut line = String::with_capacity(BAR_WIDTH + 8);
        line.push('[');
        for i in 0..BAR_WIDTH {
            if i < filled {
                line.push('=');
            } else if i == filled {
                line.push('>');
            } else {
                line.push('-');
            }
        }
        line.push_str(&format!("] {}%\r", (fraction * 100.0) as usize));

        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

impl Progress for ProgressBar {
    fn indicate(&mut self, done: usize, total: usize) {
        self.draw(done, total);
    }

    fn done(&mut self) {
        self.draw(1, 1);
        let _ = writeln!(std::io::stderr());
    }
}
