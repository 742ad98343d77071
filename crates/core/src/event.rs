/// Out-of-band requests delivered to the main loop.
///
/// Sources:
/// - SIGTSTP listener → `Suspend`
/// - SIGINT listener  → `Interrupt`
///
/// The loop only looks at these between ticks, never while a collection
/// round is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Advisory stop request. Reported and ignored.
    Suspend,
    /// Quit request. The loop asks for confirmation before ending the run.
    Interrupt,
}
