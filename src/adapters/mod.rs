//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements    | Connects to                    |
//! |-------------|---------------|--------------------------------|
//! | `i2c`       | BusTransport  | any `embedded_hal::i2c::I2c`   |
//! | `esp_i2c`   | BusTransport  | ESP-IDF I2C master (cmd link)  |
//! | `log_sink`  | EventSink     | Serial log output              |

pub mod esp_i2c;
pub mod i2c;
pub mod log_sink;
