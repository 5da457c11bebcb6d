//! Headless demo: a simulated platform replays a typing session and the
//! coordinator drives the (simulated) floating indicator.
//!
//! Run with `cargo run -p quill-app --example demo`.

use quill_app::{OverlayConfig, Quill};
use quill_platform::{SimPlatform, SimSignal};
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let platform = SimPlatform::new();
    let quill = Quill::with_hide_delay(
        platform.clone(),
        OverlayConfig::default(),
        Duration::from_millis(800),
    );

    let report = quill.quick_setup();
    println!("quick setup: {report:?}");

    let _focus_sub = quill.focused().subscribe(|| println!("-> text field focused"));
    let _unfocus_sub = quill.unfocused().subscribe(|| println!("-> text field left"));

    let (feed, dispatcher) = platform.signal_feed();

    // A short typing session: focus, a few keystroke-driven refocus
    // signals inside the debounce window, a pause long enough for the
    // auto-hide, then one more visit.
    let script = [
        SimSignal::Focus,
        SimSignal::Pause(Duration::from_millis(300)),
        SimSignal::Focus,
        SimSignal::Pause(Duration::from_millis(300)),
        SimSignal::Focus,
        SimSignal::Unfocus,
        SimSignal::Pause(Duration::from_millis(1200)),
        SimSignal::Focus,
        SimSignal::Pause(Duration::from_millis(1000)),
    ];
    for signal in script {
        feed.send(signal)?;
    }
    drop(feed);
    dispatcher.join().ok();

    println!("status: {:?}", quill.get_status());
    quill.dispose();
    Ok(())
}
