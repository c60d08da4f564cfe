/// Electrical configuration of the 1-Wire signal pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// High impedance input; the pull-up resistor holds the line high.
    Input,
    /// Push-pull output, used to supply strong power to parasitically powered devices.
    Output,
    /// Open-drain output: writing low pulls the line down, writing high releases it.
    OpenDrainOutput,
}

/// Timing and GPIO capabilities a platform must provide to bit-bang the 1-Wire protocol.
///
/// One value of this trait stands for one physical signal line. The protocol code never
/// names a pin itself; it only talks to the platform it has been handed.
pub trait Platform {
    /// Error reported by the pin operations.
    type Error;

    /// Switches the signal pin to the given mode.
    fn set_pin_mode(&mut self, mode: PinMode) -> Result<(), Self::Error>;

    /// Drives the signal pin low (`false`) or high/released (`true`).
    fn write_pin(&mut self, high: bool) -> Result<(), Self::Error>;

    /// Samples the level of the signal line.
    fn read_pin(&mut self) -> Result<bool, Self::Error>;

    /// Busy-waits for at least `us` microseconds.
    fn delay_us(&mut self, us: u32);

    /// Runs `f` with interrupts and preemption suppressed.
    ///
    /// Time slots sample the line a few microseconds after driving it, so the work inside
    /// must be short and bounded. The default runs `f` directly, which suits hosts where
    /// nothing can preempt the caller.
    fn critical_section<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        f(self)
    }
}
