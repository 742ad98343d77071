use termon_core::{Control, Result};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::debug;

/// Signal number a control was raised by, for the on-screen notice.
pub fn signal_number(control: Control) -> i32 {
    match control {
        Control::Suspend   => libc::SIGTSTP,
        Control::Interrupt => libc::SIGINT,
    }
}

/// Install SIGINT and SIGTSTP handlers and forward them as [`Control`]s.
///
/// Installing the handlers replaces the default terminate/stop actions for
/// the rest of the process. The task stops when the receiver is dropped.
pub fn spawn_signal_listener() -> Result<mpsc::Receiver<Control>> {
    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut suspend   = signal(SignalKind::from_raw(libc::SIGTSTP))?;
    let (tx, rx) = mpsc::channel(8);

    tokio::spawn(async move {
        loop {
            let control = tokio::select! {
                Some(()) = interrupt.recv() => Control::Interrupt,
                Some(()) = suspend.recv()   => Control::Suspend,
                else => break,
            };
            debug!(?control, "signal received");
            if tx.send(control).await.is_err() {
                break; // receiver dropped
            }
        }
    });

    Ok(rx)
}
