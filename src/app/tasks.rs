//! Application tasks built on the client facade.
//!
//! - **mirror**: copy each button's level onto its paired LED.
//! - **blink**: invert an LED on every call.

use crate::error::Result;
use crate::gatekeeper::Client;
use crate::pins;

/// A button input and the LED output that follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonLed {
    pub button: u8,
    pub led: u8,
}

/// Board wiring for the mirror task.
pub const BUTTON_LEDS: [ButtonLed; 3] = [
    ButtonLed {
        button: pins::BUTTON0_PORT,
        led: pins::LED0_PORT,
    },
    ButtonLed {
        button: pins::BUTTON1_PORT,
        led: pins::LED1_PORT,
    },
    ButtonLed {
        button: pins::BUTTON2_PORT,
        led: pins::LED2_PORT,
    },
];

/// Drive every paired LED high.
pub fn light_all(client: &mut Client<'_>, pairs: &[ButtonLed]) -> Result<()> {
    for pair in pairs {
        client.put(pair.led, true)?;
    }
    Ok(())
}

/// One pass over `pairs`: read each button, write its level to the LED.
/// Stops at the first failed transaction.
pub fn mirror_once(client: &mut Client<'_>, pairs: &[ButtonLed]) -> Result<()> {
    for pair in pairs {
        let level = client.get(pair.button)?;
        client.put(pair.led, level)?;
    }
    Ok(())
}

/// Read `port` and write back its inverse.  Returns the new level.
pub fn toggle(client: &mut Client<'_>, port: u8) -> Result<bool> {
    let level = client.get(port)?;
    client.put(port, !level)
}
