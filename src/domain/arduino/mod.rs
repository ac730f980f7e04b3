//! Arduino aggregate

pub mod model;
pub mod repository;

pub use model::{Arduino, ArduinoFilter, ArduinoPatch, NewArduino};
pub use repository::ArduinoRepository;
