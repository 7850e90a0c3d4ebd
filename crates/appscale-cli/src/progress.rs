use appscale_wizard::{ProgressEvent, ProgressSink};

/// Prints wizard progress for the user: status lines to stderr, results to
/// stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Started(message) => eprintln!("{message}"),
            ProgressEvent::Succeeded(message) => println!("✓ {message}"),
            ProgressEvent::Failed(message) => eprintln!("✗ {message}"),
        }
    }
}
