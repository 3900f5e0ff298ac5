mod codec;
mod framer;

pub use codec::*;
pub use framer::*;
