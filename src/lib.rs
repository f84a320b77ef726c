pub use {self::util::*, clap::Parser};

pub mod burrow;
pub mod util;
