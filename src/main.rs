use clap::{Parser, error::ErrorKind};
use erp_headless::{Credentials, Envelope, Mode, config::ErpConfig, runner};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "erp_headless")]
#[command(about = "Fetch attendance and today's timetable from the college ERP portal", long_about = None)]
#[command(version)]
struct Args {
	/// Roll number used as the ERP username
	roll_no: String,

	/// ERP password; may start with `-`
	#[arg(allow_hyphen_values = true)]
	password: String,

	/// "attendance" (default), "timetable", or "plan"
	#[arg(allow_hyphen_values = true)]
	mode: Option<String>,
}

fn emit(envelope: &Envelope) -> ! {
	println!("{}", envelope.to_json_line());
	std::process::exit(envelope.exit_code());
}

#[tokio::main]
async fn main() {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
		.with_writer(std::io::stderr)
		.init();

	if let Err(e) = color_eyre::install() {
		emit(&Envelope::error(format!("{e:#}")));
	}

	let args = match Args::try_parse() {
		Ok(args) => args,
		Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
		Err(e) => emit(&Envelope::error(e.to_string().trim())),
	};

	let mode = Mode::from_arg(args.mode.as_deref());
	let credentials = Credentials::new(args.roll_no, args.password);
	let config = ErpConfig::default();

	let result = runner::run(&config, &credentials, mode).await;
	if let Err(e) = &result {
		tracing::warn!("Run failed: {e:?}");
	}
	emit(&Envelope::from(result));
}
