//! Terminal rendering of queue notices.

use std::io::{self, Write};

use formq_core::notice::{Notice, SubmissionNotifier};

/// Prints notices as status lines; errors go to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl SubmissionNotifier for TerminalNotifier {
    fn notify(&self, notice: &Notice) {
        if notice.is_error() {
            eprintln!("{}", notice.message());
        } else {
            println!("{}", notice.message());
        }

        if notice.haptic {
            // Terminal bell stands in for a haptic cue
            let mut stdout = io::stdout();
            let _ = stdout.write_all(b"\x07");
            let _ = stdout.flush();
        }
    }
}
