use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::display::{ProgressDisplay, ProgressFrame, ProgressRenderer};

const BAR_TEMPLATE: &str = "{prefix}|{wide_bar}|{percent:>3}% {msg}";
const BAR_CHARS: &str = "\u{2588}\u{2589}\u{258a}\u{258b}\u{258c}\u{258d}\u{258e}\u{258f} ";

/// Ticks per bar. Progress is fractional, indicatif counts in integers.
const BAR_RESOLUTION: u64 = 10_000;

/// One indicatif bar per axis, stacked in a `MultiProgress`.
pub struct TerminalRenderer {
    multi: MultiProgress,
    style: ProgressStyle,
}

impl TerminalRenderer {
    pub fn new() -> anyhow::Result<Self> {
        Self::with_draw_target(ProgressDrawTarget::stderr())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> anyhow::Result<Self> {
        let style = ProgressStyle::with_template(BAR_TEMPLATE)?.progress_chars(BAR_CHARS);
        Ok(Self {
            multi: MultiProgress::with_draw_target(target),
            style,
        })
    }
}

impl ProgressRenderer for TerminalRenderer {
    fn create(&self, label: &str, _index: usize) -> Box<dyn ProgressDisplay> {
        let bar = self.multi.add(ProgressBar::new(BAR_RESOLUTION));
        bar.set_style(self.style.clone());
        bar.set_prefix(format!("{}=", label));
        Box::new(TerminalDisplay { bar })
    }
}

pub struct TerminalDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay for TerminalDisplay {
    fn render(&mut self, frame: &ProgressFrame) {
        let ticks = (frame.fraction.clamp(0.0, 1.0) * BAR_RESOLUTION as f64).round() as u64;
        self.bar.set_prefix(frame.description.clone());
        self.bar.set_position(ticks);
        self.bar.set_message(frame.summary());
    }

    fn close(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish();
        }
    }
}
