use slotwise_core::classify_response;

use crate::common::CliResult;

pub fn run(text: &str) -> CliResult {
    println!("{}", classify_response(text).as_str());
    Ok(())
}
