#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate htp1;

use htp1::{Callbacks, MessageType, Parser, ParserConfig};

struct NoopCallbacks;
impl Callbacks for NoopCallbacks {}

fuzz_target!(|data: &[u8]| {
    let mut parser = Parser::new(MessageType::Either, ParserConfig::default(), NoopCallbacks);
    let _ = parser.execute(data);
    let _ = parser.execute(&[]);
});
