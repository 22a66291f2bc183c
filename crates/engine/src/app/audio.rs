/// Output seam for game audio. The simulation queues `SoundCommand`s on the
/// world; the frame driver drains them into whichever sink is installed.
pub trait AudioSink {
    fn play_once(&mut self, name: &str);
    fn start_loop(&mut self, name: &str);
    fn stop_loop(&mut self, name: &str);
}

/// Discards every cue. Device playback is a host concern; the default build
/// only traces drained commands in the frame driver.
#[derive(Debug, Default)]
pub struct NullAudioSink;

impl AudioSink for NullAudioSink {
    fn play_once(&mut self, _name: &str) {}

    fn start_loop(&mut self, _name: &str) {}

    fn stop_loop(&mut self, _name: &str) {}
}
