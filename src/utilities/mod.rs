pub mod boundary;
pub mod enums;
pub mod helpers;
pub mod sample;
