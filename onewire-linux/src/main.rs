use clap::Parser;
use embedded_hal::delay::DelayNs;
use linux_embedded_hal::{
    CdevPin, CdevPinError,
    gpio_cdev::{Chip, LineRequestFlags},
};
use onewire_bitbang::{HalPlatform, OneWire, OneWireBus, OneWireResult, RomAddress, SearchState};
use std::time::{Duration, Instant};

/// Scan a bit-banged 1-Wire bus on a Linux GPIO line
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the GPIO character device (e.g., /dev/gpiochip0)
    #[arg(short, long, default_value = "/dev/gpiochip0")]
    chip: String,
    /// Offset of the 1-Wire data line on the chip
    #[arg(short, long)]
    line: u32,
    /// Only list devices of this family code, in hex (e.g., 28)
    #[arg(short, long, value_parser = parse_hex_u8)]
    family: Option<u8>,
    /// Check for a single device by ROM code, in hex with the family code in the low byte
    #[arg(short, long, value_parser = parse_hex_u64)]
    verify: Option<u64>,
}

fn parse_hex_u8(s: &str) -> Result<u8, std::num::ParseIntError> {
    u8::from_str_radix(s.trim_start_matches("0x"), 16)
}

fn parse_hex_u64(s: &str) -> Result<u64, std::num::ParseIntError> {
    u64::from_str_radix(s.trim_start_matches("0x"), 16)
}

/// Busy-waiting delay. Sleeping through the kernel overshoots 1-Wire slots by far too much.
struct SpinDelay;

impl DelayNs for SpinDelay {
    fn delay_ns(&mut self, ns: u32) {
        let until = Instant::now() + Duration::from_nanos(ns as u64);
        while Instant::now() < until {
            std::hint::spin_loop();
        }
    }
}

fn main() {
    // Initialize the logger
    env_logger::init();
    // Parse command line arguments
    let args = Args::parse();
    // Request the data line as an open-drain output, released
    let mut chip = Chip::new(&args.chip).expect("Failed to open GPIO chip");
    let handle = chip
        .get_line(args.line)
        .expect("Failed to get GPIO line")
        .request(
            LineRequestFlags::OUTPUT | LineRequestFlags::OPEN_DRAIN,
            1,
            "onewire-linux",
        )
        .expect("Failed to request GPIO line");
    let pin = CdevPin::new(handle).expect("Failed to create GPIO pin");
    let mut bus = OneWireBus::new(HalPlatform::new(pin, SpinDelay));

    if !bus.reset().expect("Failed to reset the 1-Wire bus") {
        log::warn!("No presence pulse on {} line {}", args.chip, args.line);
        return;
    }

    let mut search = SearchState::new();
    if let Some(rom) = args.verify {
        let rom = RomAddress::from(rom);
        let present = search
            .verify(&mut bus, &rom)
            .expect("Failed to verify device");
        log::info!("ROM {rom}: {}", if present { "present" } else { "absent" });
        return;
    }

    let devices: Box<dyn Iterator<Item = OneWireResult<RomAddress, CdevPinError>>> = match args.family {
        Some(family) => Box::new(search.devices_of_family(&mut bus, family)),
        None => Box::new(search.devices(&mut bus)),
    };
    let mut count = 0;
    for rom in devices {
        let rom = rom.expect("Failed to search the 1-Wire bus");
        if rom.is_valid() {
            log::info!("ROM: {rom} ({rom:x})");
        } else {
            log::warn!("ROM: {rom} ({rom:x}) has an invalid CRC");
        }
        count += 1;
    }
    log::info!("Found {} devices", count);
}
