pub mod buffer;
pub mod peak;
pub mod ring;
pub mod window;
