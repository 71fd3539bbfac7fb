use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use log::{error, info};
use minifb::{Key, Scale, Window, WindowOptions};

use chip8vm::{Config, Interpreter, KeyWait};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The path of the rom to load
    #[arg(short, long, value_name = "FILE")]
    rom_path: PathBuf,

    /// Instructions executed per frame
    #[arg(short, long, default_value_t = 10)]
    cycles: usize,

    /// Frames per second; the timers tick once per frame
    #[arg(short, long, default_value_t = 60.0)]
    fps: f64,

    /// Seed for the RND instruction
    #[arg(short, long)]
    seed: Option<u64>,

    /// Make LD Vx, K wait until a key is pressed
    #[arg(long)]
    block_on_key_wait: bool,

    /// Make LD [I], Vx and LD Vx, [I] include Vx itself
    #[arg(long)]
    inclusive_register_transfer: bool,
}

impl Cli {
    fn config(&self) -> Config {
        let key_wait = if self.block_on_key_wait { KeyWait::Block } else { KeyWait::Poll };

        let config = Config::default()
            .with_key_wait(key_wait)
            .with_inclusive_register_transfer(self.inclusive_register_transfer);

        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }
}

/// Window keys and the raw codes the default keymap expects for them.
const KEYS: [(Key, u8); 16] = [
    (Key::Key1, b'1'),
    (Key::Key2, b'2'),
    (Key::Key3, b'3'),
    (Key::Key4, b'4'),
    (Key::Q, b'q'),
    (Key::W, b'w'),
    (Key::E, b'e'),
    (Key::R, b'r'),
    (Key::A, b'a'),
    (Key::S, b's'),
    (Key::D, b'd'),
    (Key::F, b'f'),
    (Key::Z, b'z'),
    (Key::X, b'x'),
    (Key::C, b'c'),
    (Key::V, b'v'),
];

fn run_rom(interpreter: &mut Interpreter, cycles: usize, fps: f64) -> anyhow::Result<()> {
    let width = interpreter.display().width();
    let height = interpreter.display().height();
    let mut buffer: Vec<u32> = vec![0; width * height];

    let mut opts = WindowOptions::default();
    opts.scale = Scale::FitScreen;

    let mut window = Window::new("Chip-8 - ESC to exit", width, height, opts).context("could not open window")?;

    window.limit_update_rate(Some(Duration::from_secs_f64(1.0 / fps)));
    window.topmost(true);

    while window.is_open() && !window.is_key_down(Key::Escape) {
        for (key, code) in KEYS {
            interpreter.set_key(code.into(), window.is_key_down(key));
        }

        if let Err(e) = interpreter.run_frame(cycles) {
            error!("Halting: {}", e);
            return Err(e.into());
        }

        for (i, p) in buffer.iter_mut().zip(interpreter.display().pixels()) {
            *i = if *p == 1 { 0xFFFFFF } else { 0 };
        }

        window.update_with_buffer(&buffer, width, height)?;
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    anyhow::ensure!(cli.fps > 0.0, "fps must be positive");

    let mut interpreter = Interpreter::new(cli.config());
    interpreter.reset();
    interpreter.load_rom_file(&cli.rom_path)?;
    info!("Running {} at {} cycles per frame", cli.rom_path.display(), cli.cycles);

    run_rom(&mut interpreter, cli.cycles, cli.fps)?;

    Ok(())
}
