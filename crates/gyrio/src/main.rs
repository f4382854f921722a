use clap::{Parser, Subcommand};
use gyrio::iio;
use gyrio::{DeviceName, TiltSample};
use std::io::Write;
use std::os::unix::net::UnixStream;
use std::time::Duration;

const SOCKET_PATH: &str = "/tmp/tiltglass.sock";

#[derive(Parser, Debug)]
#[command(name = "gyrio", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// List gyroscopes found on the IIO bus
    List,
    /// Print samples from a gyroscope
    Watch {
        /// IIO device to read; the first gyroscope found when unset
        #[arg(short, long)]
        device: Option<String>,

        /// Poll period in milliseconds
        #[arg(short, long, default_value_t = 60)]
        period: u64,
    },
    /// Send a synthetic tilt sample to the running app
    Tilt { x: f64, y: f64 },
    /// Re-center the water in the running app
    Center,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::List => list(),
        Commands::Watch { device, period } => watch(device, Duration::from_millis(period)),
        Commands::Tilt { x, y } => {
            anyhow::ensure!(
                TiltSample::new(x, y).is_finite(),
                "tilt components must be finite"
            );
            send_command(&format!("tilt {x} {y}"))
        }
        Commands::Center => send_command("center"),
    }
}

fn list() -> anyhow::Result<()> {
    let devices = iio::list();
    if devices.is_empty() {
        println!("no gyroscopes found");
        return Ok(());
    }
    for gyro in devices {
        println!("{}", gyro.name());
    }
    Ok(())
}

fn watch(device: Option<String>, period: Duration) -> anyhow::Result<()> {
    let wanted = device.map(DeviceName::new);
    let gyro = iio::Gyroscope::discover(wanted.as_ref())
        .ok_or_else(|| anyhow::anyhow!("no matching gyroscope on the IIO bus"))?;

    log::info!("reading '{}' every {:?}", gyro.name(), period);
    loop {
        let sample = gyro.read()?;
        println!("{:+.4} {:+.4}", sample.x, sample.y);
        std::thread::sleep(period);
    }
}

fn send_command(cmd: &str) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to tiltglass at {}: {}. Is tiltglass running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", cmd)?;
    Ok(())
}
