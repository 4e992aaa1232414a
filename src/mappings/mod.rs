pub mod key_name_to_code;

pub use key_name_to_code::KeyNameToCode;
