pub mod parser;
pub mod response;

pub use parser::{parse_frame, RespParser, RespValue};
pub use response::RespResponse;
