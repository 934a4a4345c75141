//! Form-side client: submits a registration to every enabled sink, or
//! looks up a returning customer to pre-fill the form.

use std::process::ExitCode;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use log::debug;

use customer_registration_lib::config::ClientConfig;
use customer_registration_lib::registration_backend::{
    dispatch::dispatcher::DualWriteDispatcher,
    dispatch::submit::{RegistrationForm, SubmitControl},
    lookup::autofill::{Autofill, AutofillState, AutofillView},
    lookup::client::CustomerLookupClient,
    record::capture::{
        Coordinates, DeviceContext, FixedPosition, FormFields, GeolocationProvider, NoGeolocation,
    },
    sinks::registration::RegistrationApiSink,
    sinks::spreadsheet::SpreadsheetWebhookSink,
};
use customer_registration_lib::utils::logging::init_logging;

#[derive(Parser)]
#[command(name = "registration-client", version, about = "Customer registration form client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a registration to the enabled sinks
    Submit(SubmitArgs),
    /// Look up the latest registration for a phone number
    Autofill(AutofillArgs),
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long)]
    full_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    gender: String,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    dob: NaiveDate,
    #[arg(long)]
    address: String,
    #[arg(long, env = "REGISTRATION_PASSWORD", hide_env_values = true)]
    password: String,
    #[arg(long, env = "REGISTRATION_CONFIRM_PASSWORD", hide_env_values = true)]
    confirm_password: String,
    #[arg(long, requires = "lng", allow_hyphen_values = true)]
    lat: Option<f64>,
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lng: Option<f64>,
    #[arg(long, default_value_t = 1920)]
    screen_width: u32,
    #[arg(long, default_value_t = 1080)]
    screen_height: u32,
}

#[derive(Args)]
struct AutofillArgs {
    phone: String,
}

struct TerminalControl;

impl SubmitControl for TerminalControl {
    fn set_enabled(&self, enabled: bool, label: &str) {
        debug!("submit control: enabled={} label={:?}", enabled, label);
    }

    fn notify(&self, message: &str) {
        println!("{}", message);
    }
}

struct TerminalView;

impl AutofillView for TerminalView {
    fn show(&self, state: &AutofillState) {
        match state {
            AutofillState::Idle => debug!("autofill idle"),
            AutofillState::Searching => println!("{}", state.label()),
            AutofillState::Filled(prefill) => {
                println!("Full name:     {}", prefill.full_name);
                println!("Email:         {}", prefill.email);
                println!("Gender:        {}", prefill.gender);
                if let Some(dob) = prefill.dob {
                    println!("Date of birth: {}", dob);
                }
            }
            AutofillState::NotFound => println!("No customer found with this phone number"),
            AutofillState::Error(e) => eprintln!("Auto fill failed: {}", e),
        }
    }
}

async fn submit(args: SubmitArgs, config: &ClientConfig) -> Result<bool, String> {
    config.validate_sinks()?;

    let registration = Arc::new(RegistrationApiSink::new(
        &config.api_base_url,
        config.http_timeouts,
    )?);
    let spreadsheet = Arc::new(SpreadsheetWebhookSink::new(
        config.spreadsheet_webhook_url.clone(),
        config.http_timeouts,
    )?);
    let dispatcher = DualWriteDispatcher::new(config.sinks, registration, spreadsheet);
    let device = DeviceContext::current(args.screen_width, args.screen_height);
    let form = RegistrationForm::new(dispatcher, device);

    let mut fields = FormFields {
        full_name: args.full_name,
        email: args.email,
        phone: args.phone,
        gender: args.gender,
        dob: args.dob,
        address: args.address,
        password: args.password,
        confirm_password: args.confirm_password,
        position: None,
    };

    let geolocation: Box<dyn GeolocationProvider> = match (args.lat, args.lng) {
        (Some(latitude), Some(longitude)) => {
            Box::new(FixedPosition(Coordinates { latitude, longitude }))
        }
        _ => Box::new(NoGeolocation),
    };
    fields.apply_position(geolocation.as_ref()).await;

    match form.submit(&fields, &TerminalControl).await {
        Ok(submission) => Ok(submission.outcome.is_success()),
        Err(_) => Ok(false),
    }
}

async fn autofill(args: AutofillArgs, config: &ClientConfig) -> Result<bool, String> {
    let lookup = Arc::new(CustomerLookupClient::new(
        config.api_base_url.clone(),
        config.http_timeouts,
    )?);
    let autofill = Autofill::new(lookup, config.autofill_display);

    let settled = autofill.run(&args.phone, &TerminalView).await;
    Ok(!matches!(settled, AutofillState::Error(_)))
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging();

    let cli = Cli::parse();
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Submit(args) => submit(args, &config).await,
        Commands::Autofill(args) => autofill(args, &config).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
