#[cfg(feature = "core")]
#[doc(inline)]
pub use flatseq_core as core;

#[cfg(feature = "io")]
#[doc(inline)]
pub use flatseq_io as io;
