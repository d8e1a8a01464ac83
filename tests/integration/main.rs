//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises the gatekeeper against
//! a simulated PCF8574 bus.  All tests run on the host with no real
//! hardware required.

mod mock_bus;
mod startup_tests;
