//! Version command

use crate::error::Result;

pub fn run() -> Result<()> {
    println!("glacial {}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
