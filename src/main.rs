use std::env::args_os;

use bitmap_codec::{parse_bitmap, write_sample_bitmap, Arguments, CLIParser};

fn write_and_verify(arguments: &Arguments) -> bitmap_codec::Result<bool> {
    let written = write_sample_bitmap(arguments)?;
    let parsed = parse_bitmap(arguments.output_file())?;
    Ok(written == parsed)
}

fn main() {
    let mut cli_parser = CLIParser::default();
    let arguments = cli_parser.parse(args_os());
    match write_and_verify(&arguments) {
        Ok(true) => println!("Round trip successful"),
        Ok(false) => eprintln!("Round trip failed: parsed image differs from written image"),
        Err(e) => eprintln!("Round trip failed because of: {}", e),
    }
}
