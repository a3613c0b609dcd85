//! Text rendering of quantized audio.

pub mod hex;

pub use self::hex::encode;
