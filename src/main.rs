use std::{error::Error, path::PathBuf, time::Instant};

use aq6370d::{
    config::{Config, ConnectionConfig},
    instruments::aq6370d::CONTROL_NAMES,
    Analyzer, Scpi,
};
use clap::{Parser, Subcommand};
use log::info;

/// Remote control of a Yokogawa AQ6370D optical spectrum analyzer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// TOML file with a [connection] section
    #[arg(short, long, conflicts_with_all = ["tcp", "serial"])]
    config: Option<PathBuf>,
    /// Raw socket address, e.g. 192.168.1.20:10001
    #[arg(long, conflicts_with = "serial")]
    tcp: Option<String>,
    /// Serial port name, e.g. /dev/ttyUSB0 or COM3
    #[arg(long)]
    serial: Option<String>,
    /// Baud rate for --serial
    #[arg(long, default_value_t = 9600)]
    baud_rate: usize,
    /// I/O timeout in milliseconds
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,
    #[command(subcommand)]
    command: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Print the identification string
    Idn,
    /// Read a control
    Get { control: String },
    /// Validate and write a control
    Set { control: String, value: String },
    /// Run a single sweep and wait for it to finish
    Sweep,
    /// Print a trace as wavelength,level CSV
    Trace {
        #[arg(default_value = "TRA")]
        trace: String,
    },
    /// Drain and print the device error queue
    Errors,
    /// List the control names accepted by get/set
    Controls,
}

impl Cli {
    fn connection(&self) -> Result<ConnectionConfig, Box<dyn Error>> {
        if let Some(path) = &self.config {
            return Ok(Config::from_file(path)?.connection);
        }
        match (&self.tcp, &self.serial) {
            (Some(address), _) => Ok(ConnectionConfig::Tcp {
                address: address.clone(),
                timeout_ms: self.timeout_ms,
            }),
            (None, Some(port)) => Ok(ConnectionConfig::Serial {
                port: port.clone(),
                baud_rate: self.baud_rate,
                timeout_ms: self.timeout_ms,
            }),
            (None, None) => Err("one of --config, --tcp or --serial is required".into()),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if let Action::Controls = cli.command {
        for name in CONTROL_NAMES {
            println!("{}", name);
        }
        return Ok(());
    }

    let connection = cli.connection()?;
    let mut osa = Analyzer::new(connection.connect()?);
    match &cli.command {
        Action::Idn => println!("{}", osa.id()?),
        Action::Get { control } => println!("{}", osa.get_by_name(control)?),
        Action::Set { control, value } => {
            osa.set_by_name(control, value)?;
            osa.check_errors()?;
        }
        Action::Sweep => {
            let started = Instant::now();
            osa.single_sweep()?;
            info!("sweep took {:?}", started.elapsed());
        }
        Action::Trace { trace } => {
            for (wavelength, level) in osa.get_trace(trace)? {
                println!("{:e},{}", wavelength, level);
            }
        }
        Action::Errors => {
            while let Some(err) = osa.next_error()? {
                println!("{}", err);
            }
        }
        Action::Controls => {}
    }
    Ok(())
}
