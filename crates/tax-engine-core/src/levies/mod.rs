pub mod consumption;

#[cfg(feature = "invoice")]
pub mod invoice;
