use std::thread::sleep;
use std::time::Duration;

use clap::Parser;

use cn0552::{ad7746, adpd410x, iio, InitParams};

fn parse_addr(text: &str) -> Result<u16, String> {
    let parsed = match text.strip_prefix("0x") {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => text.parse(),
    };
    parsed.map_err(|error| format!("invalid address {:?}: {}", text, error))
}

/// Print every readable attribute of a CN0552 board's capacitance converter.
#[derive(Parser, Debug)]
#[command(name = "cn0552")]
#[command(about = "Sweep the AD7746 attributes on a CN0552 board", long_about = None)]
struct Args {
    /// I2C bus device
    #[arg(short, long, default_value = "/dev/i2c-0")]
    bus: String,

    /// 7-bit address of the capacitance converter
    #[arg(short, long, value_parser = parse_addr, default_value = "0x48")]
    address: u16,

    /// Also bring up an ADPD410x optical front-end at this address
    #[arg(long, value_parser = parse_addr, value_name = "ADDRESS")]
    optical: Option<u16>,

    /// Time slot rate of the optical front-end, in Hz
    #[arg(long, default_value_t = 100)]
    optical_rate: u32,

    /// Number of passes over the attribute namespace
    #[arg(short, long, default_value_t = 1)]
    sweeps: u32,

    /// Pause between passes, in milliseconds
    #[arg(short, long, default_value_t = 1000)]
    interval: u64,
}

fn start_optical(bus: &str, address: u16, rate: u32) -> cn0552::Result<()> {
    let mut device = adpd410x::Device::open(bus, address, &adpd410x::InitParams::default())?;
    iio::write_device_attr(&mut device, "sampling_frequency", &rate.to_string())?;
    iio::write_device_attr(&mut device, "last_timeslot", "0")?;
    iio::write_device_attr(&mut device, "operation_mode", "1")?;
    log::info!("optical front-end at {:#04x} running at {} Hz", address, rate);
    Ok(())
}

fn main() -> cn0552::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if let Some(address) = args.optical {
        start_optical(&args.bus, address, args.optical_rate)?;
    }

    let mut device = ad7746::Device::open(&args.bus, args.address, &InitParams::default())?;
    let exposed = ad7746::DESCRIPTOR.exposed_attributes();
    for sweep in 0..args.sweeps {
        if sweep > 0 {
            sleep(Duration::from_millis(args.interval));
        }
        for attribute in &exposed {
            let Some(channel) = attribute.channel else { continue };
            if attribute.attribute.show.is_none() {
                continue
            }
            match iio::read_channel_attr(&mut device, channel, attribute.attribute.name) {
                Ok(value) => println!("{} = {}", attribute.path, value),
                Err(error) => log::warn!("{}: {}", attribute.path, error),
            }
        }
    }
    Ok(())
}
