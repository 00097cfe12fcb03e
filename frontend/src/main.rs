use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use chip_8_core::{Chip8, Chip8Builder, Chip8Color, Palette, SCREEN_HEIGHT, SCREEN_WIDTH};
use clap::Parser;

/// Headless CHIP-8 runner
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Filepath to Chip-8 ROM file that will be executed
    #[clap(index = 1)]
    rom: PathBuf,

    /// Filepath to font file
    #[clap(long)]
    font: Option<PathBuf>,

    /// Number of instructions to execute
    #[clap(short, long, default_value_t = 700)]
    cycles: u32,

    /// Instructions per timer tick
    #[clap(short, long, default_value_t = 12)]
    timer_every: u32,

    /// PRNG seed
    #[clap(long)]
    seed: Option<u64>,

    /// Background Color as HEX 0xAABBFF [default: 0x000000]
    #[clap(long)]
    background: Option<Chip8Color>,

    /// Foreground Color as HEX 0xAABBFF [default: 0xFFFFFF]
    #[clap(long)]
    foreground: Option<Chip8Color>,

    /// Write the final frame as a binary PPM image
    #[clap(long)]
    ppm: Option<PathBuf>,

    /// Print debug information
    #[clap(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.timer_every == 0 {
        eprintln!("--timer-every must be at least 1");
        return ExitCode::FAILURE;
    }

    let mut chip = match build(&args) {
        Ok(chip) => chip,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut status = ExitCode::SUCCESS;
    for cycle in 0..args.cycles {
        if let Err(e) = chip.step() {
            eprintln!("halted after {} instructions: {}", cycle, e);
            status = ExitCode::FAILURE;
            break;
        }

        if (cycle + 1) % args.timer_every == 0 {
            chip.step_timer();
        }
    }

    print_frame(&chip);
    println!(
        "pc=0x{:03x} I=0x{:03x} sp={} DT={} ST={}",
        chip.pc(),
        chip.index(),
        chip.sp(),
        chip.delay_timer(),
        chip.sound_timer()
    );

    if let Some(path) = &args.ppm {
        let mut palette = Palette::default();
        if let Some(foreground) = args.foreground {
            palette.foreground = foreground;
        }
        if let Some(background) = args.background {
            palette.background = background;
        }

        if let Err(e) = write_ppm(path, &chip, &palette) {
            eprintln!("failed to write {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
        println!("wrote {}", path.display());
    }

    status
}

fn build(args: &Args) -> Result<Chip8, Box<dyn std::error::Error>> {
    let rom_data = std::fs::read(&args.rom)
        .map_err(|e| format!("failed to read ROM file {}: {}", args.rom.display(), e))?;
    let mut builder = Chip8Builder::new()
        .with_rom(rom_data)
        .with_debug(args.debug);

    if let Some(font) = &args.font {
        let font_data = std::fs::read(font)
            .map_err(|e| format!("failed to read font file {}: {}", font.display(), e))?;
        builder = builder.with_font(font_data);
    }

    if let Some(seed) = args.seed {
        builder = builder.with_rng_seed(seed);
    }

    Ok(builder.build()?)
}

fn print_frame(chip: &Chip8) {
    let display = chip.display();
    for y in 0..SCREEN_HEIGHT {
        let row: String = (0..SCREEN_WIDTH)
            .map(|x| if display.pixel(x, y) { '█' } else { ' ' })
            .collect();
        println!("{}", row);
    }
}

fn write_ppm(path: &Path, chip: &Chip8, palette: &Palette) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write!(out, "P6\n{} {}\n255\n", SCREEN_WIDTH, SCREEN_HEIGHT)?;
    for pixel in chip.display().render(palette) {
        out.write_all(&pixel.rgb())?;
    }
    out.flush()
}
