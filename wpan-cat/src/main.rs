use clap::Parser;
use colored::*;
use wpan_cat::FrameParser;

/// `cat` for received IEEE 802.15.4 frames.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The PSDU followed by the LQI and RSSI octets, in hex.
    #[clap(value_parser(clap::builder::NonEmptyStringValueParser::new()))]
    input: String,

    /// The PHY frame length field. Defaults to the input length minus the
    /// LQI and RSSI octets.
    #[arg(short, long)]
    length: Option<u8>,
}

fn main() {
    let args = Args::parse();

    match FrameParser::parse_hex(&args.input, args.length) {
        Ok(output) => print!("{output}"),
        Err(err) => {
            eprintln!("{}: {err}", "error".red().bold());
            std::process::exit(1);
        }
    }
}
