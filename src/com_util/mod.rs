#[cfg(windows)]
mod async_op;
mod str;

#[cfg(windows)]
pub use self::async_op::{Operation, ProgressOperation};
#[cfg_attr(not(windows), allow(unused_imports))]
pub use self::str::{from_wide_ptr, to_wide_nul};
