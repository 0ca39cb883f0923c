pub mod driver;
#[cfg(feature = "hal")]
pub mod hal;
pub mod sim;
