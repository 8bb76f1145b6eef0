use std::sync::{Arc, Mutex};

use motionbar::progress::display::{ProgressDisplay, ProgressFrame, ProgressRenderer};

#[derive(Debug, Default)]
pub struct Track {
    pub label: String,
    pub frames: Vec<ProgressFrame>,
    pub closes: usize,
}

/// Keeps every frame each display receives.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    tracks: Arc<Mutex<Vec<Arc<Mutex<Track>>>>>,
}

impl RecordingRenderer {
    pub fn track(&self, index: usize) -> Arc<Mutex<Track>> {
        self.tracks.lock().unwrap()[index].clone()
    }

    pub fn len(&self) -> usize {
        self.tracks.lock().unwrap().len()
    }
}

impl ProgressRenderer for RecordingRenderer {
    fn create(&self, label: &str, _index: usize) -> Box<dyn ProgressDisplay> {
        let track = Arc::new(Mutex::new(Track {
            label: label.to_string(),
            ..Track::default()
        }));
        self.tracks.lock().unwrap().push(track.clone());
        Box::new(RecordingDisplay { track })
    }
}

struct RecordingDisplay {
    track: Arc<Mutex<Track>>,
}

impl ProgressDisplay for RecordingDisplay {
    fn render(&mut self, frame: &ProgressFrame) {
        self.track.lock().unwrap().frames.push(frame.clone());
    }

    fn close(&mut self) {
        self.track.lock().unwrap().closes += 1;
    }
}
