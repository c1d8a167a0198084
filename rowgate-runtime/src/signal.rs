use crate::cancel::CancellationSignal;
use crate::error::Result;
use signal_hook::consts::*;
use signal_hook::iterator::Signals;
use std::thread;

/// Cancel given signal when the process receives SIGTERM, SIGINT or SIGQUIT.
/// A dedicated thread waits for the first OS signal.
#[inline]
pub fn subscribe_stop_signal(cancel: CancellationSignal) -> Result<()> {
    let mut signals = Signals::new([SIGTERM, SIGINT, SIGQUIT])?;
    thread::Builder::new()
        .name("stop-signal".to_string())
        .spawn(move || {
            let handle = signals.handle();
            if let Some(sig) = signals.forever().next() {
                log::info!("received stop signal {}, canceling", sig);
                cancel.cancel();
            }
            handle.close();
        })?;
    Ok(())
}
