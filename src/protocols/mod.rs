pub mod loopback;
pub mod serial;
pub mod tcp;

pub use self::loopback::Loopback;
pub use self::serial::Serial;
pub use self::tcp::Tcp;

/// A way of reaching an instrument, yielding a raw byte stream once connected.
pub trait Protocol {
    type Address;
    type IO: std::io::Read + std::io::Write;
    fn connect(self, address: Self::Address) -> crate::error::Result<Self::IO>;
}
