//! Interactive review harness
//!
//! Stand-in for the host event loop: every stdin line is spoken through the
//! installed hook, and `:`-prefixed commands drive review, recording,
//! search and export. Appends drain after each dispatch, the way the host's
//! function queue would run them.

use anyhow::Result;
use retrace::gestures::GestureMap;
use retrace::host::{DesktopHost, HostVersion, SpeakFn, SpeakHook, SpeechHost};
use retrace::preferences;
use retrace::sequence::SpeechSequence;
use retrace::session::SpeechSession;
use std::io::{self, BufRead};
use std::sync::{Arc, Mutex};
use tracing::info;

/// Host version the harness emulates; new enough for the namespaced hook
const HARNESS_HOST_VERSION: HostVersion = HostVersion {
    year: 2025,
    major: 1,
};

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let prefs = preferences::load_preferences();
    let host = Arc::new(DesktopHost);
    let session = Arc::new(Mutex::new(SpeechSession::new(host.clone(), prefs)));

    let mut hook = SpeakHook::new(HARNESS_HOST_VERSION.hook_style());
    let original: SpeakFn = Arc::new(|sequence: &SpeechSequence| {
        println!("(speaks) {}", sequence.flatten());
    });
    let speak = hook.install(original, &session);

    let gestures = GestureMap::defaults()?;
    for (hotkey, command) in gestures.iter() {
        info!("Gesture {:?} -> {}", hotkey, command);
    }

    println!("retrace review harness; lines are spoken, :help lists commands");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(command) = trimmed.strip_prefix(':') {
            if !run_command(command, &session, host.as_ref()) {
                break;
            }
        } else {
            speak(&SpeechSequence::from_text(trimmed));
            // the host function queue drains once the dispatch completes
            if let Ok(mut session) = session.lock() {
                session.pump();
            }
        }
    }

    if let Ok(mut session) = session.lock() {
        session.shutdown();
    }
    hook.uninstall();
    Ok(())
}

/// Run one `:`-command; returns false when the harness should exit
fn run_command(input: &str, session: &Arc<Mutex<SpeechSession>>, host: &DesktopHost) -> bool {
    let (name, arg) = match input.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (input, ""),
    };
    let Ok(mut session) = session.lock() else {
        return true;
    };
    match name {
        "prev" => session.review_prev(),
        "next" => session.review_next(),
        "first" => session.review_first(),
        "last" => session.review_last(),
        "copy" => session.copy_current(),
        "record" => session.start_recording(),
        "stop" => session.stop_recording(),
        "policy" => session.toggle_cursor_policy(),
        "search" => match session.search(arg) {
            Ok(matches) if matches.is_empty() => println!("No matches"),
            Ok(matches) => {
                for m in &matches {
                    println!("{:>4}  {}", m.index + 1, m.text);
                }
            }
            Err(e) => host.show_message(&e.to_string(), "Search"),
        },
        "export" => match session.export_named(arg) {
            Ok(path) => println!("Exported to {}", path.display()),
            Err(e) => host.show_message(&e.to_string(), "Export"),
        },
        "quit" | "q" => return false,
        _ => {
            println!(
                "Commands: :prev :next :first :last :copy :record :stop :policy \
                 :search <query> :export <name> :quit"
            );
        }
    }
    true
}
