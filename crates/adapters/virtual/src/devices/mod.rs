mod indicator;
mod microphone;
mod thermometer;

pub use indicator::VirtualIndicator;
pub use microphone::VirtualMicrophone;
pub use thermometer::VirtualThermometer;
