//! GPIO and expander port assignments for the reference board.
//!
//! Single source of truth: every task references this module rather than
//! hard-coding pin or port numbers.

// ---------------------------------------------------------------------------
// I2C bus
// ---------------------------------------------------------------------------

/// I2C data line.
pub const I2C_SDA_GPIO: i32 = 25;
/// I2C clock line.
pub const I2C_SCL_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Expander logical ports (device = port / 8, bit = port % 8)
// ---------------------------------------------------------------------------

/// Push buttons, active low through the expander's weak pull-ups.
pub const BUTTON0_PORT: u8 = 12;
pub const BUTTON1_PORT: u8 = 5;
pub const BUTTON2_PORT: u8 = 4;

/// LEDs mirroring the buttons.
pub const LED0_PORT: u8 = 1;
pub const LED1_PORT: u8 = 2;
pub const LED2_PORT: u8 = 3;

/// Free-running blink LED.
pub const LED3_PORT: u8 = 9;
