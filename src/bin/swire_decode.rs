//! swire-decode: Parse a hex dump of an SNMP v1/v2c datagram.
//!
//! Part of the snmp-wire debugging utilities.

use clap::Parser;
use snmp_wire::{Message, Pdu};
use std::io::Read;
use std::process::ExitCode;

/// Parse an SNMP v1/v2c datagram from a hex dump and print its fields.
#[derive(Debug, Parser)]
#[command(name = "swire-decode", version, about)]
struct Args {
    /// Hex dump of the datagram (whitespace ignored). Reads stdin when omitted.
    #[arg(value_name = "HEX")]
    hex: Option<String>,

    /// Increase log verbosity (also honors RUST_LOG).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let hex = match args.hex {
        Some(hex) => hex,
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
            buf
        }
    };

    let bytes = match parse_hex(&hex) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let message = match Message::from_bytes(&bytes) {
        Ok(message) => message,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    print_message(&message);
    ExitCode::SUCCESS
}

fn parse_hex(input: &str) -> Result<Vec<u8>, String> {
    let digits: Vec<char> = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != ',')
        .collect();
    if digits.len() % 2 != 0 {
        return Err("odd number of hex digits".into());
    }

    digits
        .chunks(2)
        .map(|pair| {
            let hi = pair[0].to_digit(16).ok_or_else(|| format!("not hex: {}", pair[0]))?;
            let lo = pair[1].to_digit(16).ok_or_else(|| format!("not hex: {}", pair[1]))?;
            Ok((hi * 16 + lo) as u8)
        })
        .collect()
}

fn print_message(message: &Message) {
    println!("version:    {}", message.version());
    println!(
        "community:  {}",
        String::from_utf8_lossy(message.community())
    );
    println!("pdu-type:   {}", message.pdu_type());

    match message.pdu() {
        Pdu::Trap(fields) => {
            println!("enterprise: {}", fields.enterprise);
            println!(
                "agent-addr: {}.{}.{}.{}",
                fields.agent_addr[0], fields.agent_addr[1], fields.agent_addr[2], fields.agent_addr[3]
            );
            println!("generic:    {}", fields.generic_trap);
            println!("specific:   {}", fields.specific_trap);
            println!("timestamp:  {}", fields.timestamp);
        }
        Pdu::Bulk {
            non_repeaters,
            max_repetitions,
        } => {
            println!("request-id: {}", message.request_id());
            println!("non-rep:    {}", non_repeaters);
            println!("max-rep:    {}", max_repetitions);
        }
        Pdu::Generic {
            error_status,
            error_index,
        } => {
            println!("request-id: {}", message.request_id());
            println!("status:     {}", error_status);
            println!("index:      {}", error_index);
        }
    }

    for varbind in message.varbinds() {
        println!("  {}", varbind);
    }
}
